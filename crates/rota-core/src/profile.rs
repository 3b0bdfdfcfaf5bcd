//! Travel profile shared by local and external routing.
//!
//! The profile selects the external provider's routing profile and the
//! nominal speed used to estimate durations for local-graph routes, which
//! carry distance only.

use std::str::FromStr;

use crate::CoreError;

/// How the trip is travelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    /// Provider path segment (`/route/v1/{profile}/...`).
    pub fn as_str(self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }

    /// Urban average speed in km/h.
    pub fn nominal_speed_kmh(self) -> f64 {
        match self {
            TravelProfile::Driving => 30.0,
            TravelProfile::Walking => 5.0,
            TravelProfile::Cycling => 15.0,
        }
    }

    /// Estimated travel time in seconds for `distance_m` at the nominal speed.
    pub fn estimate_duration_secs(self, distance_m: f64) -> f64 {
        distance_m / (self.nominal_speed_kmh() / 3.6)
    }
}

impl std::fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(TravelProfile::Driving),
            "walking" | "foot" => Ok(TravelProfile::Walking),
            "cycling" | "bike" => Ok(TravelProfile::Cycling),
            other => Err(CoreError::UnknownProfile(other.to_string())),
        }
    }
}

/// Render seconds as `"N min"` below one hour, otherwise `"H h M min"`.
pub fn format_duration(secs: f64) -> String {
    let minutes = (secs.max(0.0) / 60.0).round() as u64;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}
