//! Translation of raw type mappings into SQL columns
//!
//! A type mapping looks like:
//!
//! ```json
//! { "properties": { "name": { "type": "text" }, "address": { "properties": { ... } } } }
//! ```
//!
//! The translator is a pure function of its input. The resolver calls it once
//! per valid index and turns any failure into an `Invalid` result.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::data_type::DataType;
use super::errors::MappingError;

pub type Result<T> = std::result::Result<T, MappingError>;

/// Column name to type, ordered by column name
pub type Columns = BTreeMap<String, DataType>;

/// Turns the raw mapping of a single type into columns.
pub trait TypeMapper: Send + Sync {
    fn map_columns(&self, mapping: &Value) -> Result<Columns>;
}

/// Plain functions work as translators too, which keeps test doubles small.
impl<F> TypeMapper for F
where
    F: Fn(&Value) -> Result<Columns> + Send + Sync,
{
    fn map_columns(&self, mapping: &Value) -> Result<Columns> {
        self(mapping)
    }
}

/// Translator for the core document-store field types
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeMapper;

impl TypeMapper for DefaultTypeMapper {
    fn map_columns(&self, mapping: &Value) -> Result<Columns> {
        match mapping.get("properties") {
            // A type without properties has no columns yet; it still maps to a table
            None | Some(Value::Null) => Ok(Columns::new()),
            Some(Value::Object(properties)) => map_properties(properties),
            Some(other) => Err(MappingError::Malformed {
                field: "properties".to_string(),
                message: format!("expected an object, found {}", json_kind(other)),
            }),
        }
    }
}

fn map_properties(properties: &Map<String, Value>) -> Result<Columns> {
    let mut columns = Columns::new();
    for (name, definition) in properties {
        let data_type = map_field(name, definition)?;
        columns.insert(name.clone(), data_type);
    }
    Ok(columns)
}

fn map_field(name: &str, definition: &Value) -> Result<DataType> {
    let Value::Object(definition) = definition else {
        return Err(MappingError::Malformed {
            field: name.to_string(),
            message: format!("expected an object, found {}", json_kind(definition)),
        });
    };

    let sub_properties = match definition.get("properties") {
        None => Columns::new(),
        Some(Value::Object(props)) => map_properties(props).map_err(|e| e.under(name))?,
        Some(other) => {
            return Err(MappingError::Malformed {
                field: name.to_string(),
                message: format!("properties must be an object, found {}", json_kind(other)),
            })
        }
    };

    match definition.get("type") {
        // Fields declared only through `properties` are implicit objects
        None => Ok(DataType::Object(sub_properties)),
        Some(Value::String(es_type)) => match es_type.as_str() {
            "object" => Ok(DataType::Object(sub_properties)),
            "nested" => Ok(DataType::Nested(sub_properties)),
            other => DataType::from_es_type(other).ok_or_else(|| {
                MappingError::UnsupportedFieldType {
                    field: name.to_string(),
                    es_type: other.to_string(),
                }
            }),
        },
        Some(other) => Err(MappingError::Malformed {
            field: name.to_string(),
            message: format!("type must be a string, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
