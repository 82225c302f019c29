//! Mariner Routes — maritime route service.
//!
//! Resolves free-text port names and UN/LOCODEs to coordinates through a
//! layered lookup (alias translation → remote dataset → built-in fallback
//! table → last-resort retry), then delegates the actual sea-route geometry
//! to an external routing engine and derives timed waypoints from it.

pub mod import;
pub mod plan;
pub mod ports;
pub mod routing;
pub mod server;
