//! Port resolution subsystem.
//!
//! Provides UN/LOCODE alias translation, a remote structured lookup against
//! the external port dataset, and a built-in fallback table, orchestrated by
//! [`PortResolver`].

pub mod countries;
pub mod directory;
pub mod fallback;
pub mod resolver;
pub mod types;

pub use resolver::PortResolver;
pub use types::{PortSource, ResolveError, ResolvedPort};
