//! Core data types and enums for transit data.

use std::fmt;
use std::str::FromStr;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Which services stop at a station
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StationKind {
    Tramway,
    Bus,
    Mixed,
}

/// Mode of a transport line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineKind {
    Tramway,
    Bus,
}

impl StationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tramway => "tramway",
            Self::Bus => "bus",
            Self::Mixed => "mixed",
        }
    }

    /// Whether a line of the given kind may stop at a station of this kind.
    pub fn serves(&self, line: LineKind) -> bool {
        match (self, line) {
            (Self::Mixed, _) => true,
            (Self::Tramway, LineKind::Tramway) | (Self::Bus, LineKind::Bus) => true,
            _ => false,
        }
    }
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tramway => "tramway",
            Self::Bus => "bus",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StationKind {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tramway" | "tram" => Ok(Self::Tramway),
            "bus" => Ok(Self::Bus),
            "mixed" => Ok(Self::Mixed),
            other => Err(TransitError::InvalidData(format!("Unknown station kind: {}", other))),
        }
    }
}

impl FromStr for LineKind {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tramway" | "tram" => Ok(Self::Tramway),
            "bus" => Ok(Self::Bus),
            other => Err(TransitError::InvalidData(format!("Unknown line kind: {}", other))),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitError {
    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Line not found: {0}")]
    LineNotFound(LineIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Routing unavailable: {0}")]
    RoutingUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
