//! Ordered coordinate sequences for display and consumption.
//!
//! A `Polyline` runs in travel direction, origin first.  Two rules keep it
//! free of repeated points:
//!
//! - **Join dedup** ([`Polyline::extend_joined`]): when a segment is appended,
//!   its leading point is dropped if it matches the current last point.
//! - **Normalisation** ([`Polyline::normalize`]): a full pass that drops
//!   non-finite points and any point within [`DEDUP_EPSILON_DEG`] of the
//!   previous kept point.

use crate::{GeoPoint, LonLat};

/// Per-axis tolerance, in degrees, below which two points are the same.
pub const DEDUP_EPSILON_DEG: f64 = 1e-6;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Polyline(Vec<GeoPoint>);

impl Polyline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Wrap points as-is, without deduplication.
    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    /// Convert GeoJSON-ordered pairs, swapping to `(lat, lon)`.
    pub fn from_lon_lat(pairs: &[LonLat]) -> Self {
        Self(pairs.iter().map(|&p| GeoPoint::from_lon_lat(p)).collect())
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.0.last().copied()
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.0
    }

    /// Append one point unconditionally.
    #[inline]
    pub fn push(&mut self, p: GeoPoint) {
        self.0.push(p);
    }

    /// Append `segment`, dropping its leading point if it duplicates the
    /// current last point.
    pub fn extend_joined<I>(&mut self, segment: I)
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = segment.into_iter().peekable();
        if let (Some(last), Some(head)) = (self.last(), iter.peek()) {
            if last.approx_eq(*head, DEDUP_EPSILON_DEG) {
                iter.next();
            }
        }
        self.0.extend(iter);
    }

    /// Drop non-finite points and near-duplicates of the previous kept point.
    ///
    /// Returns the number of non-finite points discarded.
    pub fn normalize(&mut self) -> usize {
        let mut invalid = 0;
        let mut kept: Vec<GeoPoint> = Vec::with_capacity(self.0.len());
        for &p in &self.0 {
            if !p.is_finite() {
                invalid += 1;
                continue;
            }
            if let Some(prev) = kept.last() {
                if prev.approx_eq(p, DEDUP_EPSILON_DEG) {
                    continue;
                }
            }
            kept.push(p);
        }
        self.0 = kept;
        invalid
    }

    /// `true` if no two consecutive points are within the dedup tolerance.
    pub fn is_deduplicated(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| !w[0].approx_eq(w[1], DEDUP_EPSILON_DEG))
    }

    /// `[lat, lon]` pairs, the shape map front-ends consume.
    pub fn to_lat_lon_pairs(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|p| [p.lat, p.lon]).collect()
    }

    /// `[lon, lat]` pairs for GeoJSON output.
    pub fn to_lon_lat_pairs(&self) -> Vec<LonLat> {
        self.0.iter().map(|p| p.to_lon_lat()).collect()
    }
}

impl FromIterator<GeoPoint> for Polyline {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
