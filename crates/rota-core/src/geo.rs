//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Polyline deduplication works at
//! a 1e-6 degree tolerance, which single precision cannot resolve at
//! municipal latitudes.

use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// A `[lon, lat]` pair in GeoJSON axis order, as stored in edge geometry and
/// returned by external routing providers.
pub type LonLat = [f64; 2];

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting non-finite or out-of-range values.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let p = Self { lat, lon };
        if p.is_valid() {
            Ok(p)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Build from a GeoJSON-ordered `[lon, lat]` pair.
    #[inline]
    pub fn from_lon_lat(pair: LonLat) -> Self {
        Self { lat: pair[1], lon: pair[0] }
    }

    #[inline]
    pub fn to_lon_lat(self) -> LonLat {
        [self.lon, self.lat]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Finite and inside the WGS-84 domain.
    pub fn is_valid(self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// `true` when both axes differ by less than `eps` degrees.
    #[inline]
    pub fn approx_eq(self, other: GeoPoint, eps: f64) -> bool {
        (self.lat - other.lat).abs() < eps && (self.lon - other.lon).abs() < eps
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid latitude {lat:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid longitude {lon:?}")))?;
        GeoPoint::try_new(lat, lon)
    }
}
