//! Common types used throughout mongo-pages
//!
//! Shared type aliases and small value types used by more than one module.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Sort Direction
// ============================================================================

/// Direction of a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction the way document stores spell it:
    /// `1`, `-1`, `asc`, `ascending`, `desc`, `descending`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "asc" | "ascending" => Some(Self::Asc),
            "-1" | "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Parse a direction from a JSON value (number or string)
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => match n.as_i64() {
                Some(1) => Some(Self::Asc),
                Some(-1) => Some(Self::Desc),
                _ => None,
            },
            JsonValue::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Apply this direction to an ascending ordering
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}
