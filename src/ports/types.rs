//! Core types for the port resolution subsystem.

use serde::Serialize;
use std::fmt;

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortSource {
    Remote,
    Fallback,
}

impl fmt::Display for PortSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "Remote dataset"),
            Self::Fallback => write!(f, "Built-in"),
        }
    }
}

/// A resolved port with coordinates and provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPort {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub source: PortSource,
    /// The UN/LOCODE the query was translated from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocode: Option<String>,
}

/// Port resolution errors. A missing match is a signal, never a panic.
#[derive(Debug)]
pub enum ResolveError {
    NotFound(String),
    EmptyQuery,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(q) => write!(f, "Port not found: '{}'", q),
            Self::EmptyQuery => write!(f, "No destination specified"),
        }
    }
}

impl std::error::Error for ResolveError {}
