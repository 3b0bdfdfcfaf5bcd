//! External-provider error type.
//!
//! Every variant is a reported failure for one request, never a panic.  The
//! `Display` text is what callers show verbatim.

use thiserror::Error;

use rota_core::CoreError;

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("too many waypoints: {count} given, at most {max} (origin + 5 stops + destination)")]
    TooManyWaypoints { count: usize, max: usize },

    #[error("network error calling routing provider: {0}")]
    Transport(String),

    #[error("routing provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("routing provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("malformed routing provider response: {0}")]
    Malformed(String),

    #[error("no routes returned")]
    NoRoutes,
}

pub type OsrmResult<T> = Result<T, OsrmError>;
