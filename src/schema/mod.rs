//! # Schema Module
//!
//! The schema module validates and coerces loosely-typed mappings against a
//! declared table of primitive field types.
//!
//! ## Overview
//!
//! A [`FieldType`] is one of five primitives: string, boolean, int (32-bit),
//! int64, or float. Each knows how to interpret one raw JSON value, either
//! strictly (the value must already have the target type) or with coercion
//! (numeric strings from query parameters become integers, `"true"` becomes
//! a boolean, and so on) without silently corrupting or losing precision.
//!
//! A [`Schema`] maps field names to field types. Validation iterates the
//! DECLARED fields, not the input's keys: a missing field is substituted
//! with an empty-string placeholder before type parsing (so a missing
//! numeric field coerces to zero), and extra input keys are silently
//! ignored. The first failing field aborts the whole parse.
//!
//! ## Example
//!
//! ```rust
//! use portico::{Dict, FieldType, Schema};
//! use serde_json::Value;
//!
//! let schema = Schema::new([
//!     ("name", FieldType::String),
//!     ("age", FieldType::Int),
//!     ("active", FieldType::Boolean),
//! ]);
//!
//! let mut data = Dict::new();
//! data.insert("name".into(), Value::from("Ada"));
//! data.insert("age".into(), Value::from("36"));
//! data.insert("active".into(), Value::from("true"));
//!
//! let parsed = schema.parse(&data, true).unwrap();
//! assert_eq!(parsed["age"], 36);
//! assert_eq!(parsed["active"], true);
//! ```

mod core;

pub(crate) use core::display_value;
pub use core::{FieldError, FieldType, Schema, SchemaError};
