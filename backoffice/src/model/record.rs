//! Typed access to raw database records.

use serde_json::{Map, Value};

use super::localized::LocalizedText;

/// Error produced while mapping a raw record into a view row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    /// The record is not a JSON object.
    #[error("{entity} record is not an object (got {actual})")]
    NotAnObject { entity: &'static str, actual: &'static str },

    /// A required field is absent or null.
    #[error("{entity} record is missing field '{field}'")]
    Missing { entity: &'static str, field: String },

    /// The field exists but has a different type than expected.
    #[error("{entity} field '{field}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        entity: &'static str,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A localized field has no usable translation.
    #[error("{entity} field '{field}' has no non-empty translation")]
    EmptyTranslation { entity: &'static str, field: String },
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A raw record borrowed from a fetch result.
///
/// Optional getters treat a missing field and `null` alike and return
/// `Ok(None)`; only a value of the wrong type is an error. `require_*`
/// getters additionally reject missing and `null` values.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    pub fn new(entity: &'static str, value: &'a Value) -> Result<Self, MappingError> {
        match value {
            Value::Object(fields) => Ok(Self { entity, fields }),
            other => Err(MappingError::NotAnObject {
                entity,
                actual: json_type_name(other),
            }),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn mismatch(&self, field: &str, expected: &'static str, actual: &Value) -> MappingError {
        MappingError::TypeMismatch {
            entity: self.entity,
            field: field.to_string(),
            expected,
            actual: json_type_name(actual),
        }
    }

    fn missing(&self, field: &str) -> MappingError {
        MappingError::Missing {
            entity: self.entity,
            field: field.to_string(),
        }
    }

    // =========================================================================
    // Optional getters
    // =========================================================================

    pub fn string(&self, field: &str) -> Result<Option<&'a str>, MappingError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.mismatch(field, "string", other)),
        }
    }

    pub fn number(&self, field: &str) -> Result<Option<f64>, MappingError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(self.mismatch(field, "number", other)),
        }
    }

    pub fn integer(&self, field: &str) -> Result<Option<i64>, MappingError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                // Whole floats are accepted, anything else is not an integer.
                None => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| Some(f as i64))
                    .ok_or_else(|| MappingError::TypeMismatch {
                        entity: self.entity,
                        field: field.to_string(),
                        expected: "integer",
                        actual: "number",
                    }),
            },
            Some(other) => Err(self.mismatch(field, "integer", other)),
        }
    }

    pub fn bool(&self, field: &str) -> Result<Option<bool>, MappingError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(field, "bool", other)),
        }
    }

    /// Array field; missing or null is an empty slice.
    pub fn array(&self, field: &str) -> Result<&'a [Value], MappingError> {
        match self.present(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(self.mismatch(field, "array", other)),
        }
    }

    /// Array of strings; non-string items are skipped.
    pub fn strings(&self, field: &str) -> Result<Vec<String>, MappingError> {
        Ok(self
            .array(field)?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    /// Embedded relation, either an object or a one-element array of objects
    /// depending on how the join was expressed.
    pub fn relation(&self, field: &str) -> Result<Option<RawRecord<'a>>, MappingError> {
        let value = match self.present(field) {
            None => return Ok(None),
            Some(Value::Array(items)) => match items.first() {
                Some(first) => first,
                None => return Ok(None),
            },
            Some(value) => value,
        };
        RawRecord::new(self.entity, value).map(Some)
    }

    pub fn localized(&self, field: &str) -> Result<Option<LocalizedText>, MappingError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(
                map.iter()
                    .filter_map(|(locale, text)| text.as_str().map(|t| (locale.clone(), t.to_string())))
                    .collect(),
            )),
            Some(other) => Err(self.mismatch(field, "object", other)),
        }
    }

    // =========================================================================
    // Required getters
    // =========================================================================

    /// Identifier as a string; numeric ids are stringified.
    pub fn require_id(&self, field: &str) -> Result<String, MappingError> {
        match self.present(field) {
            None => Err(self.missing(field)),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(self.missing(field)),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(self.mismatch(field, "string", other)),
        }
    }

    pub fn require_string(&self, field: &str) -> Result<&'a str, MappingError> {
        self.string(field)?.ok_or_else(|| self.missing(field))
    }

    /// Localized field with at least one non-blank translation.
    pub fn require_localized(&self, field: &str) -> Result<LocalizedText, MappingError> {
        let text = self.localized(field)?.ok_or_else(|| self.missing(field))?;
        if text.is_blank() {
            return Err(MappingError::EmptyTranslation {
                entity: self.entity,
                field: field.to_string(),
            });
        }
        Ok(text)
    }
}
