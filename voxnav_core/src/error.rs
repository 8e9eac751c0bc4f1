// Error types for voxnav_core.
//
// Only configuration loading and the protection collaborator can fail.
// Cost and heuristic queries are total and never return these.

use thiserror::Error;

/// Configuration error.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tunable `{name}`: {reason}")]
    InvalidTunable { name: &'static str, reason: String },
}

/// A protection policy could not answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Protection policy unreachable: {0}")]
    Unreachable(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
