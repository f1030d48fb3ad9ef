//! Terminal front-end for the West Africa ports dashboard.
//!
//! Probes the backend, prints the dashboard views as JSON, then reads chat
//! questions from stdin and streams the revealed replies.

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use wa_ports_dashboard::adapters::HttpBackend;
use wa_ports_dashboard::application::{
    ChatController, ChatSnapshot, ConnectivityGate, DatasetAggregator, TurnOutcome,
};
use wa_ports_dashboard::config::AppConfig;
use wa_ports_dashboard::domain::chat::TurnState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init()?;

    tracing::info!(base_url = %config.api.base_url, "Starting ports dashboard");

    let backend = Arc::new(HttpBackend::new(config.api.backend_config())?);
    let gate = ConnectivityGate::new(backend.clone(), config.api.probe_policy());
    let aggregator = DatasetAggregator::new(backend.clone());

    match aggregator.load_when_connected(&gate).await {
        Ok(Some(dataset)) => println!("{}", serde_json::to_string_pretty(&*dataset)?),
        Ok(None) => {
            let status = gate.status();
            println!("Backend unreachable at {}", config.api.base_url);
            if let Some(hint) = status.remediation() {
                println!("{}", hint);
            }
            return Ok(());
        }
        Err(err) => eprintln!("Dashboard data unavailable: {}", err),
    }

    let chat = ChatController::spawn(backend, config.chat.controller_config());
    run_chat(&chat).await?;
    Ok(())
}

async fn run_chat(chat: &ChatController) -> std::io::Result<()> {
    println!();
    println!("Ask about the ports (/reset clears the session, /quit exits). Try:");
    for question in chat.suggested_questions() {
        println!("  - {}", question);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/reset" => {
                if let Err(err) = chat.reset().await {
                    eprintln!("{}", err);
                }
                println!("(session cleared)");
                continue;
            }
            _ => {}
        }

        let before = chat.snapshot().messages.len();
        let printer = tokio::spawn(stream_reply(chat.subscribe(), before + 1));
        match chat.send_turn(&line).await {
            Ok(TurnOutcome::Completed { .. }) | Ok(TurnOutcome::Failed { .. }) => {
                // The printer exits once the turn is back to idle.
                let _ = printer.await;
            }
            Ok(TurnOutcome::Ignored) | Ok(TurnOutcome::Cancelled) => printer.abort(),
            Err(err) => {
                printer.abort();
                eprintln!("{}", err);
            }
        }
    }
    Ok(())
}

/// Prints the reply at `index` as it grows.
async fn stream_reply(mut rx: watch::Receiver<ChatSnapshot>, index: usize) {
    let mut stdout = std::io::stdout();
    let mut shown = 0;
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        let Some(reply) = snapshot.messages.get(index).filter(|m| m.is_assistant()) else {
            continue;
        };
        if reply.content.len() > shown {
            let _ = write!(stdout, "{}", &reply.content[shown..]);
            let _ = stdout.flush();
            shown = reply.content.len();
        }
        if snapshot.state == TurnState::Idle {
            println!();
            break;
        }
    }
}
