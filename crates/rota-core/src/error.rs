//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Validation failures for the primitive types in this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("at least {min} waypoints are required, got {got}")]
    TooFewWaypoints { min: usize, got: usize },

    #[error("unknown travel profile {0:?}: expected driving, walking, or cycling")]
    UnknownProfile(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `rota-core`.
pub type CoreResult<T> = Result<T, CoreError>;
