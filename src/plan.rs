//! Waypoint and timing derivation for a computed sea route.
//!
//! Per-waypoint distances use a crude flat-plane approximation (Euclidean
//! distance in degrees scaled by 60 to rough nautical miles) and exist only
//! for timing display. The reported totals come from the routing engine's
//! authoritative length; the two may disagree and that is expected.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::routing::SeaRoute;

/// Kilometres to nautical miles.
pub const NM_PER_KM: f64 = 0.539957;

/// Degrees to rough nautical miles for the per-waypoint approximation.
const DEG_TO_NM: f64 = 60.0;

/// A timed, distance-annotated point along the route geometry.
#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub estimated_time: String,
    /// Cumulative rough nautical miles from the first waypoint.
    pub distance_from_start: f64,
    pub segment_index: usize,
}

/// The full plan: one waypoint per geometry point plus aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub waypoints: Vec<Waypoint>,
    pub total_distance_nm: f64,
    pub total_distance_km: f64,
    pub estimated_duration_hours: f64,
    pub estimated_arrival: String,
    pub vessel_speed: f64,
    pub waypoint_count: usize,
}

/// Derive waypoints and aggregates from a route.
///
/// Vessel speed at or below zero yields zero elapsed time everywhere.
pub fn build_plan(route: &SeaRoute, speed_knots: f64, departure: DateTime<Utc>) -> RoutePlan {
    let mut waypoints = Vec::with_capacity(route.coordinates.len());
    let mut cumulative_nm = 0.0;

    for (i, &(lng, lat)) in route.coordinates.iter().enumerate() {
        if i > 0 {
            let (prev_lng, prev_lat) = route.coordinates[i - 1];
            let segment =
                ((lat - prev_lat).powi(2) + (lng - prev_lng).powi(2)).sqrt() * DEG_TO_NM;
            cumulative_nm += segment;
        }

        let hours = elapsed_hours(cumulative_nm, speed_knots);
        waypoints.push(Waypoint {
            lat,
            lng,
            estimated_time: (departure + hours_delta(hours)).to_rfc3339(),
            distance_from_start: cumulative_nm,
            segment_index: i,
        });
    }

    let total_nm = route.length_km * NM_PER_KM;
    let duration_hours = elapsed_hours(total_nm, speed_knots);

    RoutePlan {
        waypoint_count: waypoints.len(),
        waypoints,
        total_distance_nm: round2(total_nm),
        total_distance_km: round2(route.length_km),
        estimated_duration_hours: round2(duration_hours),
        estimated_arrival: (departure + hours_delta(duration_hours)).to_rfc3339(),
        vessel_speed: speed_knots,
    }
}

fn elapsed_hours(distance_nm: f64, speed_knots: f64) -> f64 {
    if speed_knots > 0.0 {
        distance_nm / speed_knots
    } else {
        0.0
    }
}

fn hours_delta(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0) as i64)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
