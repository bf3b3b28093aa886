//! Resolution of index names and patterns into SQL tables
//!
//! The resolver issues a single metadata request per call and turns what comes
//! back into tables, one per concrete index, applying the single-table rules:
//!
//! - internal indices (concrete name starting with the internal prefix) are
//!   reported as `NotFound`, never as broken
//! - the `_default_` template type is ignored
//! - an index needs exactly one remaining type to be a table
//! - an alias spanning several indices is not a table
//!
//! Two entry points exist. [`IndexResolver::resolve_one`] keeps the caller's
//! name as the table name, so a table reached through an alias is queried
//! through that alias again. [`IndexResolver::resolve_many`] expands wildcards
//! and reports concrete index names.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use super::catalog::{Catalog, PreloadedCatalog};
use super::es_index::{EsIndex, GetIndexResult};
use super::filtered_catalog::{apply_filter, CatalogFilter, FilteredCatalog};
use super::type_mapping::{DefaultTypeMapper, TypeMapper};
use crate::config::CatalogConfig;
use crate::metadata::{
    Feature, GetIndexRequest, IndexMetadataClient, IndicesOptions, TypeMappings,
};

/// Resolves names against an [`IndexMetadataClient`]
///
/// Holds no mutable state: concurrent calls on a shared resolver are
/// independent of each other.
pub struct IndexResolver<C> {
    client: C,
    filter: Option<Arc<dyn CatalogFilter>>,
    type_mapper: Arc<dyn TypeMapper>,
    internal_index_prefix: String,
    default_mapping_type: String,
}

impl<C: IndexMetadataClient> IndexResolver<C> {
    pub fn new(client: C, filter: Option<Arc<dyn CatalogFilter>>) -> Self {
        let defaults = CatalogConfig::default();
        Self {
            client,
            filter,
            type_mapper: Arc::new(DefaultTypeMapper),
            internal_index_prefix: defaults.internal_index_prefix,
            default_mapping_type: defaults.default_mapping_type,
        }
    }

    pub fn with_config(mut self, config: &CatalogConfig) -> Self {
        self.internal_index_prefix = config.internal_index_prefix.clone();
        self.default_mapping_type = config.default_mapping_type.clone();
        self
    }

    pub fn with_type_mapper(mut self, type_mapper: Arc<dyn TypeMapper>) -> Self {
        self.type_mapper = type_mapper;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolve a single index or alias name into a catalog
    ///
    /// The catalog holds at most one entry, keyed by `name` as given. When
    /// `name` matches nothing the catalog is empty. Metadata failures are
    /// returned unchanged.
    pub async fn resolve_one(&self, name: &str) -> Result<Box<dyn Catalog>, C::Error> {
        let response = self.client.get_index(create_request(&[name])).await?;

        let mut results = BTreeMap::new();
        let mut mappings = response.mappings.into_iter();
        match (mappings.next(), mappings.next()) {
            (None, _) => {
                debug!("[{}] did not match any index", name);
            }
            (Some((concrete_index, types)), None) => {
                // Keyed by the requested name, not the concrete index
                debug!("[{}] resolved to concrete index [{}]", name, concrete_index);
                results.insert(
                    name.to_string(),
                    self.build_result(&concrete_index, name, &types),
                );
            }
            (Some(_), Some(_)) => {
                debug!("[{}] resolved to several concrete indices", name);
                results.insert(
                    name.to_string(),
                    GetIndexResult::invalid(format!(
                        "[{}] is an alias pointing to more than one index which is currently incompatible with sql",
                        name
                    )),
                );
            }
        }

        let catalog = PreloadedCatalog::new(results);
        let catalog: Box<dyn Catalog> = match &self.filter {
            Some(filter) => Box::new(FilteredCatalog::new(catalog, Arc::clone(filter))),
            None => Box::new(catalog),
        };
        Ok(catalog)
    }

    /// Discover every valid table matching `patterns`, ascending by name
    ///
    /// Tables are named after their concrete index. Indices that are not
    /// valid tables, or that the filter rejects, are left out.
    pub async fn resolve_many<S: AsRef<str>>(
        &self,
        patterns: &[S],
    ) -> Result<Vec<EsIndex>, C::Error> {
        let response = self.client.get_index(create_request(patterns)).await?;
        debug!(
            "{} concrete indices matched {} patterns",
            response.len(),
            patterns.len()
        );

        // The response is keyed by concrete index, so an index reached through
        // several patterns is validated once.
        let mut indices: Vec<EsIndex> = response
            .mappings
            .iter()
            .map(|(concrete_index, types)| self.build_result(concrete_index, concrete_index, types))
            .filter(GetIndexResult::is_valid)
            .filter_map(|result| match &self.filter {
                Some(filter) => apply_filter(filter.as_ref(), result).into_index(),
                None => result.into_index(),
            })
            .collect();

        indices.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(indices)
    }

    /// Single-table validation of one concrete index, reported under `requested_name`
    pub fn build_result(
        &self,
        concrete_index: &str,
        requested_name: &str,
        types: &TypeMappings,
    ) -> GetIndexResult {
        if concrete_index.starts_with(&self.internal_index_prefix) {
            debug!("[{}] is an internal index, hiding it", concrete_index);
            return GetIndexResult::not_found(requested_name);
        }

        // The default type is a template applied to every real type
        let mut real_types = types
            .iter()
            .filter(|(type_name, _)| **type_name != self.default_mapping_type);

        match (real_types.next(), real_types.next()) {
            (None, _) => GetIndexResult::invalid(format!(
                "[{}] doesn't have any types so it is incompatible with sql",
                requested_name
            )),
            (Some((_, mapping)), None) => match self.type_mapper.map_columns(&mapping.source) {
                Ok(columns) => GetIndexResult::valid(EsIndex::new(requested_name, columns)),
                Err(e) => GetIndexResult::invalid(format!(
                    "[{}] has an unsupported mapping: {}",
                    requested_name, e
                )),
            },
            (Some(_), Some(_)) => {
                // BTreeMap keys are already sorted
                let type_names: Vec<&str> = types
                    .keys()
                    .map(String::as_str)
                    .filter(|type_name| *type_name != self.default_mapping_type)
                    .collect();
                GetIndexResult::invalid(format!(
                    "[{}] contains more than one type: [{}] so it is incompatible with sql",
                    requested_name,
                    type_names.join(", ")
                ))
            }
        }
    }
}

/// Local, lenient, mappings-only request for `indices`
///
/// Unmatched names come back as missing entries rather than errors.
fn create_request<S: AsRef<str>>(indices: &[S]) -> GetIndexRequest {
    GetIndexRequest::new(indices.iter().map(|index| index.as_ref().to_string()))
        .local(true)
        .features(&[Feature::Mappings])
        .indices_options(IndicesOptions::lenient_expand_open())
}
