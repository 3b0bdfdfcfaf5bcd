//! Caller-ordered trip points.
//!
//! Order is supplied by the caller and never changed: the first point is the
//! origin, the last the destination, anything between is an intermediate
//! stop visited in sequence.

use crate::{CoreError, CoreResult, GeoPoint};

/// Minimum points for any route.
pub const MIN_WAYPOINTS: usize = 2;

/// Provider ceiling: origin + up to 5 stops + destination.
pub const MAX_EXTERNAL_WAYPOINTS: usize = 7;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Waypoints(Vec<GeoPoint>);

impl Waypoints {
    /// Validate every coordinate and the minimum count.
    ///
    /// The upper bound is a provider constraint and is checked where the
    /// provider is called, not here.
    pub fn new(points: Vec<GeoPoint>) -> CoreResult<Self> {
        if points.len() < MIN_WAYPOINTS {
            return Err(CoreError::TooFewWaypoints { min: MIN_WAYPOINTS, got: points.len() });
        }
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(CoreError::InvalidCoordinate { lat: bad.lat, lon: bad.lon });
        }
        Ok(Self(points))
    }

    /// Build from origin, intermediate stops, and destination.
    pub fn from_parts(origin: GeoPoint, stops: &[GeoPoint], destination: GeoPoint) -> CoreResult<Self> {
        let mut points = Vec::with_capacity(stops.len() + 2);
        points.push(origin);
        points.extend_from_slice(stops);
        points.push(destination);
        Self::new(points)
    }

    pub fn origin(&self) -> GeoPoint {
        self.0[0]
    }

    pub fn destination(&self) -> GeoPoint {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Consecutive `(from, to)` pairs, one per leg.
    pub fn legs(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// A copy with `stop` inserted immediately before the destination.
    pub fn with_stop_before_destination(&self, stop: GeoPoint) -> CoreResult<Self> {
        let mut points = self.0.clone();
        points.insert(points.len() - 1, stop);
        Self::new(points)
    }
}
