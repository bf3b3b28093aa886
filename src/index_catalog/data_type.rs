//! SQL-facing type system for index columns
//!
//! Every field declared in a document-store mapping is translated into one of
//! these types before the SQL layer sees it.
//!
//! # Supported Types
//!
//! - scalar numerics: `byte`, `short`, `integer`, `long`, `half_float`,
//!   `float`, `double`, `scaled_float`
//! - strings: `keyword`, `text`
//! - `boolean`, `date`, `ip`, `binary`, `null`
//! - composites: `object` (inline sub-document) and `nested` (array of
//!   independently indexed sub-documents)
//!
//! # Example
//!
//! ```yaml
//! properties:
//!   name:    { type: text }
//!   age:     { type: integer }
//!   address:
//!     properties:
//!       city: { type: keyword }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column type exposed to the SQL layer
///
/// Composite variants keep their sub-properties ordered by name so rendering a
/// table twice always yields the same output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "properties")]
pub enum DataType {
    Null,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    HalfFloat,
    Float,
    Double,
    ScaledFloat,
    Keyword,
    Text,
    Date,
    Ip,
    Binary,
    Object(BTreeMap<String, DataType>),
    Nested(BTreeMap<String, DataType>),
}

impl DataType {
    /// Translate a scalar mapping type name (`"long"`, `"keyword"`, ...)
    ///
    /// Returns `None` for composite types and for anything the SQL layer
    /// cannot represent (`geo_point`, `completion`, ...).
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(DataType::from_es_type("long"), Some(DataType::Long));
    /// assert_eq!(DataType::from_es_type("geo_shape"), None);
    /// ```
    pub fn from_es_type(es_type: &str) -> Option<Self> {
        let data_type = match es_type {
            "null" => DataType::Null,
            "boolean" => DataType::Boolean,
            "byte" => DataType::Byte,
            "short" => DataType::Short,
            "integer" => DataType::Integer,
            "long" => DataType::Long,
            "half_float" => DataType::HalfFloat,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "scaled_float" => DataType::ScaledFloat,
            "keyword" => DataType::Keyword,
            "text" => DataType::Text,
            "date" => DataType::Date,
            "ip" => DataType::Ip,
            "binary" => DataType::Binary,
            _ => return None,
        };
        Some(data_type)
    }

    /// SQL type name used in `DESCRIBE`-style output
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Boolean => "BOOLEAN",
            DataType::Byte => "TINYINT",
            DataType::Short => "SMALLINT",
            DataType::Integer => "INTEGER",
            DataType::Long => "BIGINT",
            DataType::HalfFloat | DataType::Float => "REAL",
            DataType::Double | DataType::ScaledFloat => "DOUBLE",
            DataType::Keyword | DataType::Text | DataType::Ip => "VARCHAR",
            DataType::Date => "TIMESTAMP",
            DataType::Binary => "VARBINARY",
            DataType::Object(_) => "STRUCT",
            DataType::Nested(_) => "ARRAY",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::Short
                | DataType::Integer
                | DataType::Long
                | DataType::HalfFloat
                | DataType::Float
                | DataType::Double
                | DataType::ScaledFloat
        )
    }

    /// Sub-properties of a composite type, `None` for scalars
    pub fn properties(&self) -> Option<&BTreeMap<String, DataType>> {
        match self {
            DataType::Object(props) | DataType::Nested(props) => Some(props),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
