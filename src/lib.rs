//! West Africa Ports Dashboard - client core.
//!
//! Talks to the port statistics backend for five Gulf of Guinea ports (PAC,
//! Lomé, Abidjan, Tema, Lagos): gates on backend reachability, loads and
//! reshapes the statistics into chart-ready views, and runs a chat session
//! with the backend's assistant whose replies are revealed progressively.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
