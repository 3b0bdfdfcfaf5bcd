//! Maneuver → human-readable instruction.
//!
//! OSRM spells compound values with spaces (`slight left`, `on ramp`); some
//! providers use underscores.  Both are accepted.

use serde::{Deserialize, Serialize};

/// One turn-by-turn step of an external route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m:  f64,
    pub duration_s:  f64,
    /// Street name; empty when the provider has none.
    pub street:      String,
    pub maneuver:    String,
    pub modifier:    Option<String>,
}

impl RouteStep {
    pub fn new(
        maneuver: &str,
        modifier: Option<&str>,
        street: &str,
        distance_m: f64,
        duration_s: f64,
    ) -> Self {
        Self {
            instruction: describe(maneuver, modifier, street),
            distance_m,
            duration_s,
            street: street.to_string(),
            maneuver: maneuver.to_string(),
            modifier: modifier.map(str::to_string),
        }
    }
}

/// Base phrase for a maneuver type and optional modifier.
pub fn instruction(maneuver: &str, modifier: Option<&str>) -> &'static str {
    let maneuver = canonical(maneuver);
    let modifier = modifier.map(canonical);
    match (maneuver.as_str(), modifier.as_deref()) {
        ("depart", _) => "Depart",
        ("arrive", _) => "Arrive at destination",
        ("turn", Some("left")) => "Turn left",
        ("turn", Some("right")) => "Turn right",
        ("turn", Some("slight_left")) => "Slight left",
        ("turn", Some("slight_right")) => "Slight right",
        ("turn", Some("straight")) => "Continue straight",
        ("turn", _) => "Turn",
        ("roundabout", _) => "Enter the roundabout",
        ("merge", _) => "Merge onto the road",
        ("fork", _) => "Keep at the fork",
        ("on_ramp", _) => "Take the ramp",
        ("off_ramp", _) => "Take the exit",
        _ => "Continue",
    }
}

/// Full instruction: the base phrase plus `" on {street}"` when named.
pub fn describe(maneuver: &str, modifier: Option<&str>, street: &str) -> String {
    let base = instruction(maneuver, modifier);
    let street = street.trim();
    if street.is_empty() {
        base.to_string()
    } else {
        format!("{base} on {street}")
    }
}

fn canonical(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(' ', "_")
}
