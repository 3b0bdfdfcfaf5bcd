//! Routing error type.
//!
//! Every variant is a per-request failure.  Provider failures keep the
//! provider's message verbatim.

use thiserror::Error;

use rota_core::{CoreError, GeoPoint, NodeId};
use rota_network::NetworkError;
use rota_osrm::OsrmError;

#[derive(Debug, Error)]
pub enum RouteError {
    /// No path between the snapped nodes of one leg.
    #[error("no route found for leg {leg} ({from} -> {to})")]
    NoPath { leg: usize, from: NodeId, to: NodeId },

    #[error("no network node near {point} (leg {leg})")]
    SnapFailure { leg: usize, point: GeoPoint },

    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error(transparent)]
    Upstream(#[from] OsrmError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Every coordinate of the path failed validation.
    #[error("route geometry is unusable: no valid coordinates")]
    UnusableGeometry,
}

pub type RoutingResult<T> = Result<T, RouteError>;
