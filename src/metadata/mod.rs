//! Index metadata clients
//!
//! The resolver never talks to the document store directly. It issues one
//! [`GetIndexRequest`] per call through an [`IndexMetadataClient`] and works on
//! the [`GetIndexResponse`] it gets back: concrete index name to declared types
//! to raw mapping.
//!
//! Two clients ship with the crate:
//! - [`InMemoryIndexMetadata`]: serves a [`ClusterMetadata`] snapshot
//! - [`HttpIndexMetadataClient`]: queries the `_mapping` REST endpoint

pub mod errors;
pub mod http_client;
pub mod in_memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use errors::MetadataError;
pub use http_client::HttpIndexMetadataClient;
pub use in_memory::{ClusterMetadata, IndexMetadata, IndexState, InMemoryIndexMetadata};

/// Parts of the index metadata a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Aliases,
    Mappings,
    Settings,
}

/// How names and wildcards in a request are expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicesOptions {
    /// Missing or unavailable concrete names are skipped instead of failing
    pub ignore_unavailable: bool,
    /// A wildcard matching nothing is not an error
    pub allow_no_indices: bool,
    pub expand_wildcards_open: bool,
    pub expand_wildcards_closed: bool,
}

impl IndicesOptions {
    /// Skip anything missing, expand wildcards to open indices only
    pub fn lenient_expand_open() -> Self {
        Self {
            ignore_unavailable: true,
            allow_no_indices: true,
            expand_wildcards_open: true,
            expand_wildcards_closed: false,
        }
    }

    pub fn strict_expand_open() -> Self {
        Self {
            ignore_unavailable: false,
            allow_no_indices: true,
            expand_wildcards_open: true,
            expand_wildcards_closed: false,
        }
    }

    /// Value of the `expand_wildcards` REST parameter
    pub fn expand_wildcards(&self) -> &'static str {
        match (self.expand_wildcards_open, self.expand_wildcards_closed) {
            (true, true) => "open,closed",
            (true, false) => "open",
            (false, true) => "closed",
            (false, false) => "none",
        }
    }
}

impl Default for IndicesOptions {
    fn default() -> Self {
        Self::strict_expand_open()
    }
}

/// Metadata request for a set of names and patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetIndexRequest {
    pub indices: Vec<String>,
    /// Answer from the local cluster state only, never from remote clusters
    pub local: bool,
    pub features: Vec<Feature>,
    pub indices_options: IndicesOptions,
}

impl GetIndexRequest {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            local: false,
            features: vec![Feature::Aliases, Feature::Mappings, Feature::Settings],
            indices_options: IndicesOptions::default(),
        }
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn features(mut self, features: &[Feature]) -> Self {
        self.features = features.to_vec();
        self
    }

    pub fn indices_options(mut self, options: IndicesOptions) -> Self {
        self.indices_options = options;
        self
    }

    pub fn wants(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// Raw mapping of one type inside an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingMetadata {
    pub type_name: String,
    /// Type body without the type-name wrapper, e.g. `{"properties": {...}}`
    pub source: Value,
}

impl MappingMetadata {
    pub fn new(type_name: impl Into<String>, source: Value) -> Self {
        Self {
            type_name: type_name.into(),
            source,
        }
    }
}

/// Type name to mapping, for one concrete index
pub type TypeMappings = BTreeMap<String, MappingMetadata>;

/// Answer to a [`GetIndexRequest`], keyed by concrete index name
///
/// A concrete index reached through several names or patterns appears once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetIndexResponse {
    pub mappings: BTreeMap<String, TypeMappings>,
}

impl GetIndexResponse {
    pub fn new(mappings: BTreeMap<String, TypeMappings>) -> Self {
        Self { mappings }
    }

    /// Add every type of `index`, merging with what is already there
    pub fn insert_index(&mut self, index: impl Into<String>, types: TypeMappings) {
        self.mappings.entry(index.into()).or_default().extend(types);
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Source of index metadata for the resolver
///
/// Implementations must expand wildcards and aliases, stay local when
/// `request.local` is set and honour `ignore_unavailable` by leaving missing
/// names out of the response. Failures are handed to the resolver's caller
/// as-is, so `Error` is whatever the transport naturally produces.
#[async_trait]
pub trait IndexMetadataClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_index(&self, request: GetIndexRequest) -> Result<GetIndexResponse, Self::Error>;
}
