use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::plan::{self, NM_PER_KM};
use crate::ports::fallback;

use super::state::AppState;

const DEFAULT_SPEED_KNOTS: f64 = 15.0;
const DATA_SOURCE_NOTE: &str =
    "Destination lookup uses the remote port dataset with a built-in fallback table";

fn error_json(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(json!({ "error": msg.into() }))).into_response()
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "mariner-routes" }))
}

// ─── GET /ports ──────────────────────────────────────────────────

/// The static in-process table, not the remote dataset.
pub async fn list_ports() -> Json<serde_json::Value> {
    let ports: Vec<serde_json::Value> = fallback::FALLBACK_PORTS
        .iter()
        .map(|&(name, lat, lng)| json!({ "name": name, "coordinates": [lat, lng] }))
        .collect();
    Json(json!({ "ports": ports }))
}

// ─── POST /route ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RouteRequest {
    start_lat: Option<f64>,
    start_lng: Option<f64>,
    #[serde(default)]
    end_lat: Option<f64>,
    #[serde(default)]
    end_lng: Option<f64>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
}

pub async fn calculate_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteRequest>,
) -> Response {
    let started = Instant::now();

    let (start_lat, start_lng) = match (req.start_lat, req.start_lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return error_json(StatusCode::BAD_REQUEST, "start_lat and start_lng are required"),
    };

    let mut end_lat = req.end_lat.unwrap_or(0.0);
    let mut end_lng = req.end_lng.unwrap_or(0.0);
    let destination = req.destination.unwrap_or_default();
    let speed = req.speed.unwrap_or(DEFAULT_SPEED_KNOTS);

    // Resolve the destination name when no usable end coordinates came in.
    if end_lat == 0.0 && end_lng == 0.0 && !destination.is_empty() {
        let resolver = state.resolver.clone();
        let query = destination.clone();
        let resolved =
            tokio::task::spawn_blocking(move || resolver.resolve(&query)).await;

        match resolved {
            Ok(Ok(port)) => {
                end_lat = port.lat;
                end_lng = port.lng;
            }
            outcome => {
                // A join error means the resolver task died, not a bad query.
                if let Err(e) = outcome {
                    eprintln!(
                        "[{}] POST /route -> destination resolution task failed: {}",
                        Utc::now().format("%H:%M:%S"),
                        e,
                    );
                }
                let body = json!({
                    "error": format!("Could not find coordinates for destination: {}", destination),
                    "available_ports": state.resolver.available_sample(),
                    "note": DATA_SOURCE_NOTE,
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        }
    }

    if end_lat == 0.0 && end_lng == 0.0 {
        return error_json(
            StatusCode::BAD_REQUEST,
            "End coordinates or valid destination required",
        );
    }

    let router = state.router.clone();
    let routed = tokio::task::spawn_blocking(move || {
        router.route((start_lat, start_lng), (end_lat, end_lng))
    })
    .await;

    let route = match routed {
        Ok(Ok(route)) => route,
        Ok(Err(e)) => {
            eprintln!(
                "[{}] POST /route -> engine failure: {}",
                Utc::now().format("%H:%M:%S"),
                e,
            );
            let body = json!({
                "error": format!("Route calculation failed: {}", e),
                "fallback_needed": true,
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
        Err(e) => {
            let body = json!({
                "error": format!("Route calculation failed: {}", e),
                "fallback_needed": true,
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    let now = Utc::now();
    let route_plan = plan::build_plan(&route, speed, now);

    eprintln!(
        "[{}] POST /route [{}, {}] -> [{}, {}] {} waypoints ({:.1}ms)",
        now.format("%H:%M:%S"),
        start_lat,
        start_lng,
        end_lat,
        end_lng,
        route_plan.waypoint_count,
        started.elapsed().as_secs_f64() * 1000.0,
    );

    let body = json!({
        "success": true,
        "route": route_plan,
        "origin": { "lat": start_lat, "lng": start_lng },
        "destination": { "lat": end_lat, "lng": end_lng, "name": destination },
        "metadata": {
            "route_type": "maritime",
            "calculation_method": "searoute",
            "timestamp": now.to_rfc3339(),
        },
    });
    Json(body).into_response()
}

// ─── POST /distance ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceRequest {
    start_lat: Option<f64>,
    start_lng: Option<f64>,
    end_lat: Option<f64>,
    end_lng: Option<f64>,
}

pub async fn calculate_distance(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DistanceRequest>,
) -> Response {
    let started = Instant::now();

    let (start_lat, start_lng, end_lat, end_lng) =
        match (req.start_lat, req.start_lng, req.end_lat, req.end_lng) {
            (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
            _ => {
                return error_json(
                    StatusCode::BAD_REQUEST,
                    "start_lat, start_lng, end_lat and end_lng are required",
                )
            }
        };

    let router = state.router.clone();
    let routed = tokio::task::spawn_blocking(move || {
        router.route((start_lat, start_lng), (end_lat, end_lng))
    })
    .await;

    match routed {
        Ok(Ok(route)) => {
            eprintln!(
                "[{}] POST /distance -> {:.2} km ({:.1}ms)",
                Utc::now().format("%H:%M:%S"),
                route.length_km,
                started.elapsed().as_secs_f64() * 1000.0,
            );
            Json(json!({
                "distance_km": plan::round2(route.length_km),
                "distance_nm": plan::round2(route.length_km * NM_PER_KM),
                "success": true,
            }))
            .into_response()
        }
        Ok(Err(e)) => error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Distance calculation failed: {}", e),
        ),
        Err(e) => error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Distance calculation failed: {}", e),
        ),
    }
}
