//! Query building blocks
//!
//! Projection, sort and populate descriptions plus the chainable
//! [`FindQuery`] request handed to a collection's `find`.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, SortDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Split a field list written as `"a b,c"` into its non-empty tokens
fn split_fields(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Field list as it appears in JSON/YAML options: a string or an array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawFields {
    Text(String),
    List(Vec<String>),
}

// ============================================================================
// Projection
// ============================================================================

/// Which fields of a document to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFields", into = "String")]
pub enum Projection {
    /// Return only these fields (plus `_id`)
    Include(Vec<String>),
    /// Return everything except these fields
    Exclude(Vec<String>),
}

impl Projection {
    /// Create an inclusion projection
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(fields.into_iter().map(Into::into).collect())
    }

    /// Create an exclusion projection
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Parse a projection string such as `"title date"` or `"-date -child"`
    pub fn parse(raw: &str) -> Result<Self> {
        Self::from_tokens(split_fields(raw))
    }

    fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for token in tokens {
            if let Some(field) = token.strip_prefix('-') {
                exclude.push(field.to_string());
            } else {
                include.push(token.strip_prefix('+').unwrap_or(token).to_string());
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (false, true) => Ok(Self::Include(include)),
            (true, false) => Ok(Self::Exclude(exclude)),
            (true, true) => Err(Error::invalid_options("columns", "no fields given")),
            (false, false) => Err(Error::invalid_options(
                "columns",
                "cannot mix inclusion and exclusion",
            )),
        }
    }

    /// Field names named by this projection
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Include(fields) | Self::Exclude(fields) => fields,
        }
    }

    /// Check if this is an inclusion projection
    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include(_))
    }
}

impl TryFrom<RawFields> for Projection {
    type Error = Error;

    fn try_from(raw: RawFields) -> Result<Self> {
        match raw {
            RawFields::Text(text) => Self::parse(&text),
            RawFields::List(list) => Self::from_tokens(list.iter().map(|s| s.trim())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = match self {
            Self::Include(fields) => fields.clone(),
            Self::Exclude(fields) => fields.iter().map(|s| format!("-{s}")).collect(),
        };
        write!(f, "{}", rendered.join(" "))
    }
}

impl From<Projection> for String {
    fn from(projection: Projection) -> Self {
        projection.to_string()
    }
}

// ============================================================================
// Sort
// ============================================================================

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by (dotted paths allowed)
    pub field: String,
    /// Direction
    pub direction: SortDirection,
}

/// Sort as it appears in JSON/YAML options: `"title -date"` or `{title: -1}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSort {
    Text(String),
    Keys(JsonObject),
}

/// Ordered list of sort keys, applied left to right
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSort", into = "JsonObject")]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Create an empty sort spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ascending key
    #[must_use]
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Asc)
    }

    /// Add a descending key
    #[must_use]
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Desc)
    }

    /// Add a key with an explicit direction
    #[must_use]
    pub fn by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    /// Parse a sort string such as `"title -date"`
    pub fn parse(raw: &str) -> Result<Self> {
        let mut spec = Self::new();
        for token in split_fields(raw) {
            spec = match token.strip_prefix('-') {
                Some(field) => spec.desc(field),
                None => spec.asc(token.strip_prefix('+').unwrap_or(token)),
            };
        }
        if spec.is_empty() {
            return Err(Error::invalid_options("sort", "no sort keys given"));
        }
        Ok(spec)
    }

    /// Build a sort spec from an object such as `{"title": -1, "date": "asc"}`
    pub fn from_object(object: &JsonObject) -> Result<Self> {
        let mut spec = Self::new();
        for (field, direction) in object {
            let direction = SortDirection::from_json(direction).ok_or_else(|| {
                Error::invalid_options("sort", format!("invalid direction for '{field}'"))
            })?;
            spec = spec.by(field.clone(), direction);
        }
        Ok(spec)
    }

    /// Sort keys in application order
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Check if there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl TryFrom<RawSort> for SortSpec {
    type Error = Error;

    fn try_from(raw: RawSort) -> Result<Self> {
        match raw {
            RawSort::Text(text) => Self::parse(&text),
            RawSort::Keys(object) => Self::from_object(&object),
        }
    }
}

impl From<SortSpec> for JsonObject {
    fn from(spec: SortSpec) -> Self {
        spec.keys
            .into_iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                };
                (key.field, JsonValue::from(direction))
            })
            .collect()
    }
}

// ============================================================================
// Populate
// ============================================================================

/// Reference fields to resolve into embedded documents
///
/// A string names one field, or several when separated by spaces or commas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFields", into = "RawFields")]
pub enum Populate {
    /// A single field
    One(String),
    /// Several fields, resolved in order
    Many(Vec<String>),
}

impl Populate {
    /// Parse a comma or space separated field list
    pub fn parse(raw: &str) -> Result<Self> {
        let mut fields: Vec<String> = split_fields(raw).map(str::to_string).collect();
        match fields.len() {
            0 => Err(Error::invalid_options("populate", "no fields given")),
            1 => Ok(Self::One(fields.remove(0))),
            _ => Ok(Self::Many(fields)),
        }
    }

    /// Fields to populate, in order
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::One(field) => vec![field.as_str()],
            Self::Many(fields) => fields.iter().map(String::as_str).collect(),
        }
    }
}

impl TryFrom<RawFields> for Populate {
    type Error = Error;

    fn try_from(raw: RawFields) -> Result<Self> {
        match raw {
            RawFields::Text(text) => Self::parse(&text),
            RawFields::List(list) => Ok(Self::Many(
                list.iter()
                    .flat_map(|item| split_fields(item))
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

impl From<Populate> for RawFields {
    fn from(populate: Populate) -> Self {
        match populate {
            Populate::One(field) => Self::Text(field),
            Populate::Many(fields) => Self::List(fields),
        }
    }
}

impl From<&str> for Populate {
    fn from(field: &str) -> Self {
        Self::One(field.to_string())
    }
}

impl From<Vec<String>> for Populate {
    fn from(fields: Vec<String>) -> Self {
        Self::Many(fields)
    }
}

// ============================================================================
// Find Query
// ============================================================================

/// A bounded find request
///
/// This is the cursor a collection executes: a filter plus optional
/// projection, window, sort, populate fields and lean mode. Every builder
/// method returns the query so calls chain like a driver cursor:
///
/// ```rust,ignore
/// let query = FindQuery::new(&filter)
///     .select(Projection::include(["title"]))
///     .skip(10)
///     .limit(10)
///     .sort(SortSpec::new().desc("title"))
///     .populate("child")
///     .lean(true);
/// ```
#[derive(Debug)]
pub struct FindQuery<'a, F> {
    /// Filter to match
    pub filter: &'a F,
    /// Projection
    pub projection: Option<Projection>,
    /// Documents to skip
    pub skip: u64,
    /// Maximum documents to return (`None` = no limit)
    pub limit: Option<u64>,
    /// Sort applied before the window
    pub sort: Option<SortSpec>,
    /// Reference fields to resolve, in order
    pub populate: Vec<String>,
    /// Return plain records instead of store wrappers
    pub lean: bool,
}

impl<'a, F> FindQuery<'a, F> {
    /// Create a query matching `filter` with no window
    pub fn new(filter: &'a F) -> Self {
        Self {
            filter,
            projection: None,
            skip: 0,
            limit: None,
            sort: None,
            populate: Vec::new(),
            lean: false,
        }
    }

    /// Set the projection
    #[must_use]
    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the number of documents to skip
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the maximum number of documents
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the sort
    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Add a reference field to populate (repeatable)
    #[must_use]
    pub fn populate(mut self, field: impl Into<String>) -> Self {
        self.populate.push(field.into());
        self
    }

    /// Enable or disable lean mode
    #[must_use]
    pub fn lean(mut self, lean: bool) -> Self {
        self.lean = lean;
        self
    }
}
