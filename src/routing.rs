//! External sea-routing collaborator.
//!
//! The route geometry is computed entirely by an external engine; this
//! module only carries the contract: origin/destination go out in
//! (longitude, latitude) order with unit "km", and a GeoJSON-feature-shaped
//! body comes back with the geometry and the authoritative total length.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A computed sea route.
#[derive(Debug, Clone)]
pub struct SeaRoute {
    /// Geometry points in (lng, lat) order, as returned by the engine.
    pub coordinates: Vec<(f64, f64)>,
    /// Authoritative total route length in kilometres.
    pub length_km: f64,
}

#[derive(Debug)]
pub enum RouteError {
    Network(String),
    InvalidResponse(String),
    NoRoute,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Routing engine unreachable: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid routing response: {}", msg),
            Self::NoRoute => write!(f, "No valid route found between the specified points"),
        }
    }
}

impl std::error::Error for RouteError {}

/// The routing engine seam. Coordinates are (lat, lng) on this side; the
/// axis flip happens at the wire.
pub trait SeaRouter: Send + Sync {
    fn route(&self, origin: (f64, f64), destination: (f64, f64)) -> Result<SeaRoute, RouteError>;
}

// ─── HTTP-backed implementation ─────────────────────────────────

const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:5001/route";

#[derive(Serialize)]
struct EngineRequest {
    origin: [f64; 2],
    destination: [f64; 2],
    units: &'static str,
}

#[derive(Deserialize)]
struct EngineFeature {
    geometry: EngineGeometry,
    properties: EngineProperties,
}

#[derive(Deserialize)]
struct EngineGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct EngineProperties {
    length: f64,
}

/// `ureq` client for a searoute engine sidecar.
pub struct SearouteClient {
    url: String,
}

impl SearouteClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Engine URL from `SEAROUTE_URL`, defaulting to a local sidecar.
    pub fn from_env() -> Self {
        Self::new(std::env::var("SEAROUTE_URL").unwrap_or_else(|_| DEFAULT_ENGINE_URL.into()))
    }
}

impl SeaRouter for SearouteClient {
    fn route(&self, origin: (f64, f64), destination: (f64, f64)) -> Result<SeaRoute, RouteError> {
        let (start_lat, start_lng) = origin;
        let (end_lat, end_lng) = destination;

        let body = EngineRequest {
            // The engine expects (lng, lat).
            origin: [start_lng, start_lat],
            destination: [end_lng, end_lat],
            units: "km",
        };

        let response = ureq::post(&self.url)
            .set("User-Agent", "MarinerRoutes/0.3 (route-service)")
            .send_json(body)
            .map_err(|e| RouteError::Network(e.to_string()))?;

        let feature: EngineFeature = response
            .into_json()
            .map_err(|e| RouteError::InvalidResponse(e.to_string()))?;

        if feature.geometry.coordinates.is_empty() {
            return Err(RouteError::NoRoute);
        }

        Ok(SeaRoute {
            coordinates: feature
                .geometry
                .coordinates
                .iter()
                .map(|&[lng, lat]| (lng, lat))
                .collect(),
            length_km: feature.properties.length,
        })
    }
}
