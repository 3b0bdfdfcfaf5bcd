//! `rota-core` — foundational types for the `rota` routing workspace.
//!
//! This crate is a dependency of every other `rota-*` crate.  It has no
//! `rota-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint`, `LonLat`, haversine distance              |
//! | [`polyline`]    | `Polyline` with join and epsilon deduplication        |
//! | [`waypoints`]   | `Waypoints` — validated ordered trip points           |
//! | [`profile`]     | `TravelProfile` enum and duration helpers             |
//! | [`rng`]         | `NetworkRng` (seedable, for load-time randomization)  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod polyline;
pub mod profile;
pub mod rng;
pub mod waypoints;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, LonLat};
pub use ids::{EdgeId, NodeId};
pub use polyline::{DEDUP_EPSILON_DEG, Polyline};
pub use profile::{TravelProfile, format_duration};
pub use rng::NetworkRng;
pub use waypoints::{MAX_EXTERNAL_WAYPOINTS, MIN_WAYPOINTS, Waypoints};
