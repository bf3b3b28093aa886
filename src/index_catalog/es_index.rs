//! Resolved tables and the outcome of resolving a name

use serde::{Deserialize, Serialize};

use super::data_type::DataType;
use super::type_mapping::Columns;

/// A queryable table backed by exactly one index type
///
/// `name` is the name the caller asked for, which may be an alias rather than
/// the concrete index behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsIndex {
    name: String,
    columns: Columns,
}

impl EsIndex {
    pub fn new(name: impl Into<String>, columns: Columns) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&DataType> {
        self.columns.get(name)
    }
}

/// Outcome of resolving one name
///
/// `Invalid` carries a human readable reason and means the schema exists but
/// cannot be exposed as a single table. `NotFound` means the name is absent or
/// deliberately hidden (internal indices, filtered out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GetIndexResult {
    Valid(EsIndex),
    Invalid(String),
    NotFound(String),
}

impl GetIndexResult {
    pub fn valid(index: EsIndex) -> Self {
        GetIndexResult::Valid(index)
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        GetIndexResult::Invalid(reason.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        GetIndexResult::NotFound(name.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, GetIndexResult::Valid(_))
    }

    /// The resolved table, if this result is valid
    pub fn index(&self) -> Option<&EsIndex> {
        match self {
            GetIndexResult::Valid(index) => Some(index),
            GetIndexResult::Invalid(_) | GetIndexResult::NotFound(_) => None,
        }
    }

    pub fn into_index(self) -> Option<EsIndex> {
        match self {
            GetIndexResult::Valid(index) => Some(index),
            GetIndexResult::Invalid(_) | GetIndexResult::NotFound(_) => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        match self {
            GetIndexResult::Invalid(reason) => Some(reason),
            GetIndexResult::Valid(_) | GetIndexResult::NotFound(_) => None,
        }
    }
}
