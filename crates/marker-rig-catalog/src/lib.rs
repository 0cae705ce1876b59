//! Marker configurations and the session catalog.
//!
//! A *configuration* is a named group of marker IDs with fixed 3D offsets
//! to a common logical reference point. The catalog maps identifiers to
//! configurations and preserves insertion order, because first-match lookup
//! order is an observable property of [`match_configuration`].

mod catalog;
mod configuration;
mod matcher;

pub use catalog::{CatalogIoError, ConfigurationCatalog};
pub use configuration::{Configuration, ConfigurationError};
pub use matcher::match_configuration;
