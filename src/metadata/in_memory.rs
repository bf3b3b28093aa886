//! Snapshot-backed metadata client
//!
//! Serves index metadata from a [`ClusterMetadata`] snapshot held in memory.
//! The snapshot can be built in code or loaded from YAML/JSON:
//!
//! ```yaml
//! indices:
//!   emp_2024:
//!     aliases: [emp]
//!     mappings:
//!       doc:
//!         properties:
//!           name: { type: keyword }
//!   emp_2023:
//!     state: close
//!     aliases: [emp]
//! ```
//!
//! Name expansion follows the rules in [`crate::utils::index_pattern`].

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::errors::MetadataError;
use super::{
    Feature, GetIndexRequest, GetIndexResponse, IndexMetadataClient, IndicesOptions,
    MappingMetadata, TypeMappings,
};
use crate::utils::index_pattern;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    #[default]
    Open,
    Close,
}

/// One concrete index in a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    #[serde(default)]
    pub state: IndexState,
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    /// Type name to raw type body
    #[serde(default)]
    pub mappings: BTreeMap<String, Value>,
}

impl IndexMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: impl Into<String>, mapping: Value) -> Self {
        self.mappings.insert(type_name.into(), mapping);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn closed(mut self) -> Self {
        self.state = IndexState::Close;
        self
    }

    pub fn is_open(&self) -> bool {
        self.state == IndexState::Open
    }
}

/// Point-in-time view of every index in a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    #[serde(default)]
    pub indices: BTreeMap<String, IndexMetadata>,
}

impl ClusterMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, name: impl Into<String>, index: IndexMetadata) -> Self {
        self.indices.insert(name.into(), index);
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, MetadataError> {
        serde_yaml::from_str(content).map_err(|e| MetadataError::SnapshotParse {
            error: e.to_string(),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(content).map_err(|e| MetadataError::SnapshotParse {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MetadataError::SnapshotParse {
            error: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Concrete indices carrying `alias`
    fn indices_with_alias<'a>(&'a self, alias: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.indices
            .iter()
            .filter(move |(_, index)| index.aliases.contains(alias))
            .map(|(name, _)| name)
    }

    fn has_alias(&self, alias: &str) -> bool {
        self.indices_with_alias(alias).next().is_some()
    }
}

/// [`IndexMetadataClient`] answering from a [`ClusterMetadata`] snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndexMetadata {
    metadata: Arc<ClusterMetadata>,
}

impl InMemoryIndexMetadata {
    pub fn new(metadata: ClusterMetadata) -> Self {
        Self {
            metadata: Arc::new(metadata),
        }
    }

    pub fn metadata(&self) -> &ClusterMetadata {
        &self.metadata
    }

    /// Concrete index names selected by the request's expressions
    pub fn resolve_indices(
        &self,
        request: &GetIndexRequest,
    ) -> Result<BTreeSet<String>, MetadataError> {
        let options = &request.indices_options;

        if request.indices.is_empty() {
            return self.expand_wildcard(index_pattern::ALL, options);
        }

        let mut selected = BTreeSet::new();
        let mut has_inclusion = false;

        for expression in &request.indices {
            if request.local && index_pattern::is_remote(expression) {
                debug!("Skipping remote index expression [{}] in local request", expression);
                continue;
            }

            // A leading `-` only excludes once something has been included
            if let Some(excluded) = expression.strip_prefix('-').filter(|_| has_inclusion) {
                let removed = if index_pattern::is_wildcard(excluded) {
                    self.expand_wildcard(excluded, options)?
                } else {
                    self.expand_name(excluded).unwrap_or_default()
                };
                selected.retain(|name| !removed.contains(name));
                continue;
            }
            has_inclusion = true;

            if index_pattern::is_wildcard(expression) || index_pattern::is_match_all(expression) {
                let matched = self.expand_wildcard(expression, options)?;
                if matched.is_empty() && !options.allow_no_indices {
                    return Err(MetadataError::IndexNotFound {
                        name: expression.clone(),
                    });
                }
                selected.extend(matched);
                continue;
            }

            match self.expand_name(expression) {
                Some(matched) => selected.extend(matched),
                None if options.ignore_unavailable => {
                    debug!("Ignoring unavailable index [{}]", expression);
                }
                None => {
                    return Err(MetadataError::IndexNotFound {
                        name: expression.clone(),
                    })
                }
            }
        }

        Ok(selected)
    }

    /// Expand a concrete index or alias name; `None` when nothing usable matches
    fn expand_name(&self, name: &str) -> Option<BTreeSet<String>> {
        if let Some(index) = self.metadata.indices.get(name) {
            return index.is_open().then(|| BTreeSet::from([name.to_string()]));
        }

        if self.metadata.has_alias(name) {
            let open: BTreeSet<String> = self
                .metadata
                .indices_with_alias(name)
                .filter(|index| self.metadata.indices[*index].is_open())
                .cloned()
                .collect();
            return (!open.is_empty()).then_some(open);
        }

        None
    }

    fn expand_wildcard(
        &self,
        pattern: &str,
        options: &IndicesOptions,
    ) -> Result<BTreeSet<String>, MetadataError> {
        let pattern = if pattern == index_pattern::ALL { "*" } else { pattern };
        let regex = index_pattern::compile(pattern).map_err(|source| {
            MetadataError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let state_matches = |index: &IndexMetadata| match index.state {
            IndexState::Open => options.expand_wildcards_open,
            IndexState::Close => options.expand_wildcards_closed,
        };

        let matched = self
            .metadata
            .indices
            .iter()
            .filter(|(name, index)| {
                state_matches(index)
                    && (regex.is_match(name) || index.aliases.iter().any(|a| regex.is_match(a)))
            })
            .map(|(name, _)| name.clone())
            .collect();
        Ok(matched)
    }
}

#[async_trait]
impl IndexMetadataClient for InMemoryIndexMetadata {
    type Error = MetadataError;

    async fn get_index(&self, request: GetIndexRequest) -> Result<GetIndexResponse, Self::Error> {
        let selected = self.resolve_indices(&request)?;
        debug!(
            "Resolved {:?} to {} concrete indices",
            request.indices,
            selected.len()
        );

        let mut response = GetIndexResponse::default();
        if !request.wants(Feature::Mappings) {
            return Ok(response);
        }

        for name in selected {
            let types: TypeMappings = self.metadata.indices[&name]
                .mappings
                .iter()
                .map(|(type_name, source)| {
                    (
                        type_name.clone(),
                        MappingMetadata::new(type_name.clone(), source.clone()),
                    )
                })
                .collect();
            response.insert_index(name, types);
        }
        Ok(response)
    }
}
