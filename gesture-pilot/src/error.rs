//! Boundary errors
//!
//! Per-frame paths never fail. These cover the edges where untrusted input
//! enters the crate: command names, sensitivity levels, landmark buffers and
//! configuration.

use thiserror::Error;

/// Errors raised at the crate boundary
#[derive(Debug, Error)]
pub enum PilotError {
    #[error("command '{0}' not recognized")]
    UnknownCommand(String),

    #[error("invalid sensitivity level '{0}' (expected low, medium or high)")]
    InvalidSensitivity(String),

    #[error("invalid landmark data length: {len} (expected {expected})")]
    InvalidLandmarks { len: usize, expected: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PilotError>;
