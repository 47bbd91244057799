//! Opaque per-passage metadata.
//!
//! The core treats metadata as an opaque mapping from string keys to a
//! small tagged union of scalar values; an HTTP boundary is expected to
//! serialize this to JSON, but this crate has no JSON dependency of its
//! own beyond the optional `serde` derives.

use std::collections::HashMap;

/// A single metadata value. Mirrors the `string | int | float | bool`
/// union used by the upstream document-management API.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetadataValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    /// Returns the value as a string slice, if it is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// A passage's metadata record: `filename`, `chunk_id`, `document_id`,
/// `upload_timestamp` and any caller-supplied keys.
pub type Metadata = HashMap<String, MetadataValue>;

/// Reads `document_id` off a metadata record, if present and a string.
pub fn document_id(metadata: &Metadata) -> Option<&str> {
    metadata.get("document_id").and_then(MetadataValue::as_str)
}
