//! `rota-service` — configuration and the service facade consumers call.
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`config`]      | `ServiceConfig`, `ConfigBuilder` (defaults < TOML < env)  |
//! | [`service`]     | `RoutingService` — lifecycle, routing, deviation, reports |
//! | [`report`]      | `AlgorithmReport`, `HealthReport`, landmark table         |
//! | [`response`]    | `ApiResponse<T>` envelope                                 |
//! | [`error`]       | `ServiceError`, `ConfigError`                             |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                        |
//! |-------|-----------------------------------------------|
//! | `osm` | Allows `network.pbf` sources.                 |

pub mod config;
pub mod error;
pub mod report;
pub mod response;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{ConfigBuilder, NetworkConfig, ServiceConfig};
pub use error::{ConfigError, ServiceError, ServiceResult};
pub use report::{AlgorithmReport, HealthReport, MARICA_POINTS_OF_INTEREST, PointOfInterest};
pub use response::ApiResponse;
pub use service::RoutingService;
