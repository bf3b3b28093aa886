//! # Index Catalog Error Types
//!
//! Errors raised while turning raw index metadata into SQL tables.
//!
//! - **Mapping Errors**: a type mapping that cannot be translated into columns
//!
//! Metadata client failures live next to the clients in `crate::metadata`.
//!
//! Schema incompatibilities (multi-type indices, aliases over several indices)
//! are *not* errors. They are reported as [`GetIndexResult::Invalid`] data so a
//! batch resolution can return a mix of tables and diagnostics.
//!
//! [`GetIndexResult::Invalid`]: super::es_index::GetIndexResult::Invalid

use thiserror::Error;

/// Failures of the type-mapping translator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("field `{field}` has unsupported type `{es_type}`")]
    UnsupportedFieldType { field: String, es_type: String },
    #[error("field `{field}` has a malformed definition: {message}")]
    Malformed { field: String, message: String },
}

impl MappingError {
    /// Prefix the field path with its parent, so nested failures point at the
    /// full dotted path (`address.geo.lat`).
    pub fn under(self, parent: &str) -> Self {
        match self {
            MappingError::UnsupportedFieldType { field, es_type } => {
                MappingError::UnsupportedFieldType {
                    field: format!("{}.{}", parent, field),
                    es_type,
                }
            }
            MappingError::Malformed { field, message } => MappingError::Malformed {
                field: format!("{}.{}", parent, field),
                message,
            },
        }
    }
}
