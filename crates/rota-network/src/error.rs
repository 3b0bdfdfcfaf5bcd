//! Network-subsystem error type.

use thiserror::Error;

use rota_core::NodeId;

/// Errors produced by `rota-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {from} -> {to} references a node that does not exist")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} has invalid length {length_m}: must be finite and > 0")]
    InvalidLength { from: NodeId, to: NodeId, length_m: f64 },

    #[error("edge {from} -> {to} has invalid travel time {travel_secs}: must be finite and > 0")]
    InvalidTravelTime { from: NodeId, to: NodeId, travel_secs: f64 },

    #[error("disable proportion {0} outside [0, 1]")]
    InvalidProportion(f64),

    #[error("edge weights were already randomized; reload the network to re-apply")]
    AlreadyRandomized,

    #[error("edges were already disabled; reload the network to re-apply")]
    AlreadyDisabled,

    #[error("edge references unknown node key {0}")]
    UnknownNodeKey(i64),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
