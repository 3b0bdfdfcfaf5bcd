//! `rota-network` — road network, load-time randomization, and shortest paths.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`network`]     | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`        |
//! | [`router`]      | `Router` trait, `PathResult`, `Weight`, `DijkstraRouter`  |
//! | [`geometry`]    | node path → `Polyline` reconstruction                     |
//! | [`randomize`]   | `WeightRandomizer` (perturbation + structural disabling)  |
//! | [`project`]     | `LocalProjection`, `ProjectedIndex`                       |
//! | [`snapshot`]    | `NetworkSnapshot` — frozen, `Arc`-shared network          |
//! | [`loader`]      | CSV loading, `NetworkSource`, `load_network`              |
//! | [`osm`]         | `load_from_pbf` (feature = `"osm"` only)                  |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod geometry;
pub mod loader;
pub mod network;
pub mod project;
pub mod randomize;
pub mod router;
pub mod snapshot;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{NetworkError, NetworkResult};
pub use geometry::reconstruct;
pub use loader::{NetworkSource, load_csv, load_csv_readers, load_network, parse_wkt_linestring};
pub use network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
pub use project::{LocalProjection, ProjectedIndex};
pub use randomize::{RandomizationReport, WeightRandomizer};
pub use router::{DijkstraRouter, PathResult, Router, Weight};
pub use snapshot::{NetworkSnapshot, NetworkStats};
