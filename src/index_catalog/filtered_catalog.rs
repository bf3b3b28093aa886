//! Visibility filtering over a catalog
//!
//! The filter is supplied by the host (typically an authorization layer) and
//! may hide or invalidate tables. It can only ever downgrade a result: a valid
//! table it did not receive (an upgraded `Invalid`/`NotFound`, or a rewritten
//! table) is discarded and the original result is kept.

use std::sync::Arc;

use log::warn;

use super::catalog::Catalog;
use super::es_index::{EsIndex, GetIndexResult};

/// Host supplied visibility rule
pub trait CatalogFilter: Send + Sync {
    fn filter_index(&self, result: GetIndexResult) -> GetIndexResult;
}

impl<F> CatalogFilter for F
where
    F: Fn(GetIndexResult) -> GetIndexResult + Send + Sync,
{
    fn filter_index(&self, result: GetIndexResult) -> GetIndexResult {
        self(result)
    }
}

/// Run `filter` on `result`, keeping the original when the filter hands back a
/// valid table it was not given.
pub fn apply_filter(filter: &dyn CatalogFilter, result: GetIndexResult) -> GetIndexResult {
    let original = result.clone();
    let filtered = filter.filter_index(result);
    if filtered.is_valid() && filtered != original {
        warn!(
            "Catalog filter tried to replace {:?} with a different valid table, keeping the original result",
            original
        );
        return original;
    }
    filtered
}

/// Catalog decorator applying a [`CatalogFilter`] on every lookup
pub struct FilteredCatalog<C> {
    delegate: C,
    filter: Arc<dyn CatalogFilter>,
}

impl<C: Catalog> FilteredCatalog<C> {
    pub fn new(delegate: C, filter: Arc<dyn CatalogFilter>) -> Self {
        Self { delegate, filter }
    }

    /// The wrapped, unfiltered catalog
    pub fn inner(&self) -> &C {
        &self.delegate
    }
}

impl<C: Catalog> Catalog for FilteredCatalog<C> {
    fn lookup(&self, name: &str) -> GetIndexResult {
        apply_filter(self.filter.as_ref(), self.delegate.lookup(name))
    }

    fn list(&self) -> Vec<EsIndex> {
        self.delegate
            .list()
            .into_iter()
            .filter_map(|index| {
                apply_filter(self.filter.as_ref(), GetIndexResult::valid(index)).into_index()
            })
            .collect()
    }
}
