//! Consent record domain model
//!
//! The consent API returns loosely-typed objects; the formatter needs to see
//! the difference between a missing field, a JSON `null` and a nested object,
//! so the record keeps the raw JSON object instead of a fixed struct.
//!
//! Pages are decoded as plain JSON values and each item is turned into a
//! record only when it is about to be written, so a malformed item fails the
//! run after the rows before it are on disk.

use super::errors::ExporterError;
use serde_json::{Map, Value};

/// One user's recorded consent decision plus whatever metadata the server sent
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentRecord {
    fields: Map<String, Value>,
}

impl ConsentRecord {
    /// Raw value of a field, `None` when the field is absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl TryFrom<Value> for ConsentRecord {
    type Error = ExporterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(ExporterError::InvalidArgument(
                "consent record is required".to_string(),
            )),
            other => Err(ExporterError::InvalidArgument(format!(
                "consent record must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
