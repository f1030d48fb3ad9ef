//! The five tracked ports and their reference data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Code of one of the five tracked ports. Join key across every dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PortCode {
    #[serde(rename = "PAC")]
    Pac,
    #[serde(rename = "LOME")]
    Lome,
    #[serde(rename = "ABIDJAN")]
    Abidjan,
    #[serde(rename = "TEMA")]
    Tema,
    #[serde(rename = "LAGOS")]
    Lagos,
}

impl PortCode {
    /// All ports, in display order.
    pub const ALL: [PortCode; 5] = [
        PortCode::Pac,
        PortCode::Lome,
        PortCode::Abidjan,
        PortCode::Tema,
        PortCode::Lagos,
    ];

    /// Returns the wire code (`"PAC"`, `"LOME"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PortCode::Pac => "PAC",
            PortCode::Lome => "LOME",
            PortCode::Abidjan => "ABIDJAN",
            PortCode::Tema => "TEMA",
            PortCode::Lagos => "LAGOS",
        }
    }

    /// Returns the reference entry for this port.
    pub fn info(&self) -> PortInfo {
        match self {
            PortCode::Pac => PortInfo::new(*self, "Port Autonome de Cotonou", "Bénin", 4),
            PortCode::Lome => PortInfo::new(*self, "Port Autonome de Lomé", "Togo", 1),
            PortCode::Abidjan => {
                PortInfo::new(*self, "Port Autonome d'Abidjan", "Côte d'Ivoire", 2)
            }
            PortCode::Tema => PortInfo::new(*self, "Port of Tema", "Ghana", 3),
            PortCode::Lagos => PortInfo::new(*self, "Lagos Port Complex", "Nigeria", 5),
        }
    }

    /// Position of this port in [`PortCode::ALL`].
    pub fn index(&self) -> usize {
        match self {
            PortCode::Pac => 0,
            PortCode::Lome => 1,
            PortCode::Abidjan => 2,
            PortCode::Tema => 3,
            PortCode::Lagos => 4,
        }
    }
}

impl fmt::Display for PortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortCode {
    type Err = ValidationError;

    /// Parses a wire code. Surrounding whitespace is ignored, case is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        PortCode::ALL
            .into_iter()
            .find(|port| port.as_str() == code)
            .ok_or_else(|| {
                ValidationError::invalid_format("port_code", format!("unknown port code '{}'", code))
            })
    }
}

/// Immutable reference entry for a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortInfo {
    pub code: PortCode,
    pub display_name: &'static str,
    pub country: &'static str,
    /// Regional rank by volume (1 = largest).
    pub rank: u8,
}

impl PortInfo {
    const fn new(
        code: PortCode,
        display_name: &'static str,
        country: &'static str,
        rank: u8,
    ) -> Self {
        Self {
            code,
            display_name,
            country,
            rank,
        }
    }
}
