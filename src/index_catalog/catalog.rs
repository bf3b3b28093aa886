//! Request-scoped table catalogs
//!
//! A catalog is built once per resolution call from the results the resolver
//! computed and is read-only afterwards. Decorators such as
//! [`FilteredCatalog`](super::filtered_catalog::FilteredCatalog) wrap another
//! catalog instead of extending it.

use std::collections::BTreeMap;

use super::es_index::{EsIndex, GetIndexResult};

/// Lookup surface handed to the analyzer
pub trait Catalog: Send + Sync {
    /// Result for `name`; names the catalog knows nothing about are `NotFound`.
    fn lookup(&self, name: &str) -> GetIndexResult;

    /// Every valid table, ascending by name
    fn list(&self) -> Vec<EsIndex>;
}

/// Catalog over results computed up front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreloadedCatalog {
    results: BTreeMap<String, GetIndexResult>,
}

impl PreloadedCatalog {
    pub fn new(results: BTreeMap<String, GetIndexResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether the catalog holds an entry (of any variant) under `name`
    ///
    /// Hidden names, such as internal indices, are stored as `NotFound`
    /// entries, so this is `true` for them even though `lookup` reports them
    /// as missing and `list` leaves them out.
    pub fn contains(&self, name: &str) -> bool {
        self.results.contains_key(name)
    }
}

impl FromIterator<(String, GetIndexResult)> for PreloadedCatalog {
    fn from_iter<I: IntoIterator<Item = (String, GetIndexResult)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Catalog for PreloadedCatalog {
    fn lookup(&self, name: &str) -> GetIndexResult {
        self.results
            .get(name)
            .cloned()
            .unwrap_or_else(|| GetIndexResult::not_found(name))
    }

    fn list(&self) -> Vec<EsIndex> {
        // BTreeMap iteration is already ordered by name
        self.results
            .values()
            .filter_map(GetIndexResult::index)
            .cloned()
            .collect()
    }
}
