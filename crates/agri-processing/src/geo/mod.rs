//! Country to continent resolution.
//!
//! The pipeline only depends on the [`ContinentResolver`] trait; the built-in
//! [`CountryCatalog`] implements it from a static ISO-3166 table, and tests
//! swap in fakes.

mod catalog;
mod continent;

pub use catalog::{CountryCatalog, CountryRecord};
pub use continent::Continent;

use std::sync::Arc;

/// Resolves a free-text country name to its continent.
///
/// Implementations must not fail: a name that cannot be resolved is `None`.
pub trait ContinentResolver: Send + Sync {
    fn resolve_continent(&self, country: &str) -> Option<Continent>;
}

/// The shared built-in catalog as a resolver handle.
pub fn default_resolver() -> Arc<dyn ContinentResolver> {
    CountryCatalog::shared()
}
