//! `rota-osrm` — external routing fallback over an OSRM-compatible HTTP API.
//!
//! # Crate layout
//!
//! | Module             | Contents                                              |
//! |--------------------|-------------------------------------------------------|
//! | [`client`]         | `OsrmClient`, `OsrmConfig`, `ExternalRoute`           |
//! | [`transport`]      | `HttpTransport` seam, `ReqwestTransport`              |
//! | [`response`]       | wire types, `GeoJsonLineString`                       |
//! | [`instructions`]   | `RouteStep`, maneuver → instruction table             |
//! | [`error`]          | `OsrmError`, `OsrmResult<T>`                          |

pub mod client;
pub mod error;
pub mod instructions;
pub mod response;
pub mod transport;

#[cfg(test)]
mod tests;

pub use client::{ExternalRoute, OsrmClient, OsrmConfig, check_ceiling};
pub use error::{OsrmError, OsrmResult};
pub use instructions::{RouteStep, describe, instruction};
pub use response::GeoJsonLineString;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
