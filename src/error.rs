//! Error types for the simulation core and the tuning loader.
//!
//! Normal gameplay outcomes (a spawn rejected by the safe zone, the projectile
//! cap being reached, a cooldown still running) are not errors and never show
//! up here.

use std::fmt;
use std::io;

/// Invalid arguments reaching the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Asteroid levels start at 1; level 0 would break split termination.
    InvalidLevel { level: u32 },
    /// Attempted to normalize a zero-length vector.
    ZeroVector { context: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { level } => {
                write!(f, "invalid asteroid level {level}: levels start at 1")
            }
            Self::ZeroVector { context } => {
                write!(f, "cannot normalize a zero vector ({context})")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Failure to load or validate a [`crate::Tuning`]
#[derive(Debug)]
pub enum TuningError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse tuning JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for TuningError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
