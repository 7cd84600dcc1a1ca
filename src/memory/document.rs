//! Stored documents and the records returned by `find`

use super::filter::get_path;
use crate::query::Projection;
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Name of the identifier field
pub const ID_FIELD: &str = "_id";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a 24-hex-digit identifier: seconds since the epoch followed by
/// a process-wide counter, so ids sort in creation order
pub(crate) fn generate_id() -> String {
    let seconds = Utc::now().timestamp() as u32;
    let counter = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{seconds:08x}{counter:016x}")
}

/// A stored document with its store metadata
///
/// Serializes flat: the field data (including `_id`) followed by `__v` and
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip)]
    id: String,
    #[serde(flatten)]
    data: JsonObject,
    #[serde(rename = "__v")]
    version: u64,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

impl Document {
    /// Create a document; `data` must already carry `_id`
    pub(crate) fn new(id: String, data: JsonObject) -> Self {
        Self {
            id,
            data,
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Document identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Revision counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Insertion time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Field data, including `_id`
    pub fn data(&self) -> &JsonObject {
        &self.data
    }

    /// Value at a (dotted) field path
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        get_path(&self.data, path)
    }

    /// Same document metadata with different field data
    pub(crate) fn with_data(&self, data: JsonObject) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }
}

/// A document returned from a find
///
/// Hydrated documents keep their store metadata; lean records are plain
/// field data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// Store document with metadata
    Document(Document),
    /// Plain field data
    Lean(JsonObject),
}

impl Record {
    /// Field data
    pub fn data(&self) -> &JsonObject {
        match self {
            Self::Document(document) => document.data(),
            Self::Lean(data) => data,
        }
    }

    /// Value at a (dotted) field path
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        get_path(self.data(), path)
    }

    /// Identifier, if the projection kept it
    pub fn id(&self) -> Option<&str> {
        self.data().get(ID_FIELD).and_then(JsonValue::as_str)
    }

    /// Check if this is a lean record
    pub fn is_lean(&self) -> bool {
        matches!(self, Self::Lean(_))
    }

    /// Borrow the store document, if hydrated
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(document) => Some(document),
            Self::Lean(_) => None,
        }
    }

    /// Field data as a JSON object value
    pub fn into_value(self) -> JsonValue {
        match self {
            Self::Document(document) => JsonValue::Object(document.data),
            Self::Lean(data) => JsonValue::Object(data),
        }
    }
}

/// Apply a projection to top-level fields; `_id` is kept unless excluded
pub(crate) fn project(data: &JsonObject, projection: &Projection) -> JsonObject {
    match projection {
        Projection::Include(fields) => data
            .iter()
            .filter(|(key, _)| key.as_str() == ID_FIELD || fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        Projection::Exclude(fields) => data
            .iter()
            .filter(|(key, _)| !fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    }
}
