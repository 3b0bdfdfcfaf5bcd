//! `rota-routing` — route computation on top of the network and provider
//! crates.
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`multi`]       | `MultiWaypointRouter` — sequential, fail-fast legs       |
//! | [`strategy`]    | `RoutingStrategy` (local graph / external fallback)      |
//! | [`deviation`]   | `DeviationEvaluator`, `DeviationReport`                  |
//! | [`result`]      | `RouteResult`, `RouteSource`                             |
//! | [`error`]       | `RouteError`, `RoutingResult<T>`                         |

pub mod deviation;
pub mod error;
pub mod multi;
pub mod result;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use deviation::{DeviationEvaluator, DeviationReport};
pub use error::{RouteError, RoutingResult};
pub use multi::MultiWaypointRouter;
pub use result::{RouteResult, RouteSource};
pub use strategy::{RoutingStrategy, route_external};
