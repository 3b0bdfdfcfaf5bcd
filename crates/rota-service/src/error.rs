//! Service-level error types.

use std::path::PathBuf;

use thiserror::Error;

use rota_network::NetworkError;
use rota_osrm::OsrmError;
use rota_routing::RouteError;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value {value:?} for {var}: {message}")]
    EnvVar { var: String, value: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Upstream(#[from] OsrmError),

    #[error("no network loaded")]
    NoNetwork,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
