//! # Bag Module
//!
//! Immutable, named string→string bags over already-decoded request data:
//! path captures, query parameters, headers, and cookies.
//!
//! A bag is built once from a raw loosely-typed mapping: null values are
//! dropped entirely (not stored as empty strings), string values are kept
//! as-is, and anything else is stringified. The name is carried into error
//! messages so a failed lookup says which bag it missed. Since every stored
//! value is a string, [`Bag::parse`] is the primary path by which
//! string-only sources get coerced into richer types.

use crate::schema::{display_value, Schema, SchemaError};
use crate::Dict;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Required lookup on a bag found no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BagError {
    /// The key is absent; carries the bag's name for diagnostics.
    KeyNotFound {
        /// Name of the bag that was queried
        bag: String,
        /// The missing key
        key: String,
    },
}

impl fmt::Display for BagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BagError::KeyNotFound { bag, key } => {
                write!(f, "{bag} has no entry for key '{key}'")
            }
        }
    }
}

impl std::error::Error for BagError {}

/// An immutable string→string mapping with a human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    name: String,
    contents: HashMap<String, String>,
}

impl Bag {
    /// Build a bag from a raw mapping.
    ///
    /// Entries with a null value are dropped; every other value is
    /// stringified once, here, so lookups never see the original types.
    pub fn new(name: impl Into<String>, data: &Dict) -> Self {
        let contents = data
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect();
        Bag {
            name: name.into(),
            contents,
        }
    }

    /// The bag's name as used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the bag holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.contents.contains_key(key)
    }

    /// Required lookup. Fails with [`BagError::KeyNotFound`] naming this bag
    /// when the key is absent.
    pub fn get(&self, key: &str) -> Result<&str, BagError> {
        self.contents
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| BagError::KeyNotFound {
                bag: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Best-effort lookup: the value, or `""` when absent.
    #[must_use]
    pub fn try_get(&self, key: &str) -> &str {
        self.contents.get(key).map(String::as_str).unwrap_or("")
    }

    /// Validate the bag's contents against `schema`.
    ///
    /// Snapshots the stored strings into a [`Dict`] and delegates to
    /// [`Schema::parse`]; with coercion enabled this is how query
    /// parameters, headers, path captures, and cookies become typed values.
    pub fn parse(&self, schema: &Schema, coerce: bool) -> Result<Dict, SchemaError> {
        let data: Dict = self
            .contents
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        schema.parse(&data, coerce)
    }

    /// An independent copy of the contents; mutating it never affects the
    /// bag.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.contents.clone()
    }
}
