//! Loading page options
//!
//! `PageOptions` can be written as JSON or YAML, read from a file, or taken
//! from URL query parameters such as
//! `?page=2&limit=20&sort=-title&populate=child,owner&lean=true`.

use crate::error::{Error, Result, ResultExt};
use crate::pagination::PageOptions;
use crate::query::{Populate, Projection, SortSpec};
use std::collections::HashMap;
use std::path::Path;

impl PageOptions {
    /// Parse options from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse options from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml" | "yml") => Self::from_yaml_str(&contents),
            _ => Err(Error::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Build options from URL query parameters
    ///
    /// Recognised keys are `page`, `limit`, `columns`, `sort`, `populate` and
    /// `lean`; anything else is ignored. Empty values count as absent.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        let param = |key: &str| non_empty(params, key);

        let mut options = Self::new();

        if let Some(page) = param("page") {
            options.page = Some(parse_number("page", page)?);
        }
        if let Some(limit) = param("limit") {
            options.limit = Some(parse_number("limit", limit)?);
        }
        if let Some(columns) = param("columns") {
            options.columns = Some(Projection::parse(columns)?);
        }
        if let Some(sort) = param("sort") {
            options.sort = Some(SortSpec::parse(sort)?);
        }
        if let Some(populate) = param("populate") {
            options.populate = Some(Populate::parse(populate)?);
        }
        if let Some(lean) = param("lean") {
            options.lean = parse_bool("lean", lean)?;
        }

        Ok(options)
    }
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_number(field: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|e| Error::invalid_options(field, format!("'{raw}' is not a page number: {e}")))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::invalid_options(
            field,
            format!("'{raw}' is not a boolean"),
        )),
    }
}
