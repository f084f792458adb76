use crate::Dict;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// One of the five primitive field types a schema can declare.
///
/// A closed set: the schema's field table maps names to these tags, so an
/// unsupported field type is unrepresentable rather than a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text
    String,
    /// `true` / `false`
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float,
}

impl FieldType {
    /// The type's name as used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Int => "int",
            FieldType::Int64 => "int64",
            FieldType::Float => "float",
        }
    }

    /// Interpret one raw value as this type.
    ///
    /// With `coerce` disabled the value must already have the target type.
    /// With `coerce` enabled, string-typed sources are parsed (an empty
    /// string maps to the type's zero value) and numeric widths are
    /// converted, truncating floats toward zero.
    pub fn parse(self, value: &Value, coerce: bool) -> Result<Value, FieldError> {
        match self {
            FieldType::String => parse_string(value, coerce),
            FieldType::Boolean => parse_boolean(value, coerce),
            FieldType::Int => parse_int(value, coerce),
            FieldType::Int64 => parse_int64(value, coerce),
            FieldType::Float => parse_float(value, coerce),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field type rejected a value under the current coercion mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value's type cannot satisfy the target type in this mode.
    TypeMismatch {
        /// Target type name
        expected: &'static str,
        /// JSON type of the rejected value
        actual: &'static str,
    },
    /// The value had an acceptable type but its content failed to parse
    /// (malformed number, out-of-range integer, unrecognized boolean).
    Parse {
        /// Target type name
        expected: &'static str,
        /// The offending input, rendered as text
        input: String,
    },
}

impl FieldError {
    fn mismatch(expected: &'static str, value: &Value) -> Self {
        FieldError::TypeMismatch {
            expected,
            actual: json_type_name(value),
        }
    }

    fn parse(expected: &'static str, input: impl Into<String>) -> Self {
        FieldError::Parse {
            expected,
            input: input.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            FieldError::Parse { expected, input } => {
                write!(f, "cannot parse '{input}' as {expected}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Schema validation failed on one field.
///
/// Validation is fail-fast: the error names the first offending field and
/// wraps the underlying cause; remaining fields are not attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    field: String,
    source: FieldError,
}

impl SchemaError {
    /// Name of the field that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The underlying field-type failure.
    #[must_use]
    pub fn cause(&self) -> &FieldError {
        &self.source
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed for field '{}': {}", self.field, self.source)
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// An immutable table of declared fields, reusable across many validations.
///
/// The constructor copies the caller's pairs into its own table, so later
/// mutation of the caller's collection never affects the schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<String, FieldType>,
}

impl Schema {
    /// Build a schema from `(name, type)` pairs.
    pub fn new<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldType)>,
    {
        Schema {
            fields: fields
                .into_iter()
                .map(|(name, field_type)| (name.into(), field_type))
                .collect(),
        }
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate `data` against the declared fields.
    ///
    /// Iterates the schema's fields, not the input's keys. A declared field
    /// absent from the input is substituted with an empty-string placeholder
    /// before type parsing, so a missing numeric field coerces to its zero
    /// value while a missing string field round-trips the empty string.
    /// Extra input keys never appear in the result.
    ///
    /// Fail-fast: the first field failure aborts with a [`SchemaError`]
    /// naming the field; no partial result is produced.
    pub fn parse(&self, data: &Dict, coerce: bool) -> Result<Dict, SchemaError> {
        let placeholder = Value::String(String::new());
        let mut result = Dict::new();
        for (name, field_type) in &self.fields {
            let value = data.get(name).unwrap_or(&placeholder);
            match field_type.parse(value, coerce) {
                Ok(parsed) => {
                    result.insert(name.clone(), parsed);
                }
                Err(source) => {
                    debug!(field = %name, error = %source, "field validation failed");
                    return Err(SchemaError {
                        field: name.clone(),
                        source,
                    });
                }
            }
        }
        Ok(result)
    }
}

/// JSON type of a value, for error messages.
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

/// Text form of a value: strings pass through, everything else uses its
/// JSON representation. Shared with bag construction.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_string(value: &Value, coerce: bool) -> Result<Value, FieldError> {
    if matches!(value, Value::String(_)) {
        return Ok(value.clone());
    }
    if coerce {
        return Ok(Value::String(display_value(value)));
    }
    Err(FieldError::mismatch("string", value))
}

fn parse_boolean(value: &Value, coerce: bool) -> Result<Value, FieldError> {
    if let Value::Bool(flag) = value {
        return Ok(Value::Bool(*flag));
    }
    if coerce {
        if let Value::String(text) = value {
            if text.is_empty() {
                return Ok(Value::Bool(false));
            }
            return match text.as_str() {
                "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
                "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
                _ => Err(FieldError::parse("boolean", text.as_str())),
            };
        }
        return Err(FieldError::mismatch("boolean", value));
    }
    Err(FieldError::mismatch("boolean", value))
}

fn parse_int(value: &Value, coerce: bool) -> Result<Value, FieldError> {
    if let Value::Number(number) = value {
        if let Some(integral) = number.as_i64() {
            return i32::try_from(integral)
                .map(Value::from)
                .map_err(|_| FieldError::parse("int", number.to_string()));
        }
        if coerce {
            let integral = truncate_float(number, "int")?;
            return i32::try_from(integral)
                .map(Value::from)
                .map_err(|_| FieldError::parse("int", number.to_string()));
        }
    }
    if coerce {
        if let Value::String(text) = value {
            if text.is_empty() {
                return Ok(Value::from(0));
            }
            return text
                .parse::<i32>()
                .map(Value::from)
                .map_err(|_| FieldError::parse("int", text.as_str()));
        }
    }
    Err(FieldError::mismatch("int", value))
}

fn parse_int64(value: &Value, coerce: bool) -> Result<Value, FieldError> {
    if let Value::Number(number) = value {
        if let Some(integral) = number.as_i64() {
            return Ok(Value::from(integral));
        }
        if coerce {
            return truncate_float(number, "int64").map(Value::from);
        }
    }
    if coerce {
        if let Value::String(text) = value {
            if text.is_empty() {
                return Ok(Value::from(0i64));
            }
            return text
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FieldError::parse("int64", text.as_str()));
        }
    }
    Err(FieldError::mismatch("int64", value))
}

fn parse_float(value: &Value, coerce: bool) -> Result<Value, FieldError> {
    if let Value::Number(number) = value {
        if let Some(float) = number.as_f64() {
            return Ok(Value::from(float));
        }
    }
    if coerce {
        if let Value::String(text) = value {
            if text.is_empty() {
                return Ok(Value::from(0.0));
            }
            let parsed = text
                .parse::<f64>()
                .map_err(|_| FieldError::parse("float", text.as_str()))?;
            return Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| FieldError::parse("float", text.as_str()));
        }
    }
    Err(FieldError::mismatch("float", value))
}

/// Truncate a float-valued number toward zero, rejecting values outside the
/// 64-bit integer range.
fn truncate_float(number: &Number, target: &'static str) -> Result<i64, FieldError> {
    let float = number
        .as_f64()
        .ok_or_else(|| FieldError::parse(target, number.to_string()))?;
    let truncated = float.trunc();
    if truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        Ok(truncated as i64)
    } else {
        Err(FieldError::parse(target, number.to_string()))
    }
}
