//! JSON filter parsing and evaluation
//!
//! Supports the commonly used subset of MongoDB query syntax: field
//! equality, dotted paths, comparison and set operators, `$exists`, and the
//! logical `$and` / `$or` / `$nor` combinators.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use std::cmp::Ordering;

/// A parsed filter
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Filter {
    /// Matches every document
    All,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Nor(Vec<Filter>),
    /// Every condition must hold for the value at `path`
    Field {
        path: String,
        conditions: Vec<Condition>,
    },
}

/// A condition on a single field
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Eq(JsonValue),
    Ne(JsonValue),
    Gt(JsonValue),
    Gte(JsonValue),
    Lt(JsonValue),
    Lte(JsonValue),
    In(Vec<JsonValue>),
    Nin(Vec<JsonValue>),
    Exists(bool),
}

impl Filter {
    /// Parse a JSON filter; `null` and `{}` match everything
    pub(crate) fn parse(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(Self::All),
            JsonValue::Object(object) => Self::parse_object(object),
            other => Err(Error::invalid_filter(format!(
                "expected an object, got {}",
                type_name(other)
            ))),
        }
    }

    fn parse_object(object: &JsonObject) -> Result<Self> {
        let mut clauses = Vec::with_capacity(object.len());

        for (key, value) in object {
            let clause = match key.as_str() {
                "$and" => Self::And(Self::parse_list(key, value)?),
                "$or" => Self::Or(Self::parse_list(key, value)?),
                "$nor" => Self::Nor(Self::parse_list(key, value)?),
                op if op.starts_with('$') => {
                    return Err(Error::invalid_filter(format!(
                        "unknown top-level operator {op}"
                    )));
                }
                path => Self::Field {
                    path: path.to_string(),
                    conditions: parse_conditions(value)?,
                },
            };
            clauses.push(clause);
        }

        Ok(match clauses.len() {
            0 => Self::All,
            1 => clauses.remove(0),
            _ => Self::And(clauses),
        })
    }

    fn parse_list(op: &str, value: &JsonValue) -> Result<Vec<Self>> {
        let items = value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| Error::invalid_filter(format!("{op} expects a non-empty array")))?;
        items.iter().map(Self::parse).collect()
    }

    /// Check if a document matches
    pub(crate) fn matches(&self, document: &JsonObject) -> bool {
        match self {
            Self::All => true,
            Self::And(filters) => filters.iter().all(|f| f.matches(document)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(document)),
            Self::Nor(filters) => !filters.iter().any(|f| f.matches(document)),
            Self::Field { path, conditions } => {
                let value = get_path(document, path);
                conditions.iter().all(|c| c.matches(value))
            }
        }
    }
}

/// Parse the right-hand side of a field clause
fn parse_conditions(value: &JsonValue) -> Result<Vec<Condition>> {
    let operators = match value {
        JsonValue::Object(object)
            if !object.is_empty() && object.keys().all(|k| k.starts_with('$')) =>
        {
            object
        }
        other => return Ok(vec![Condition::Eq(other.clone())]),
    };

    operators
        .iter()
        .map(|(op, operand)| {
            Ok(match op.as_str() {
                "$eq" => Condition::Eq(operand.clone()),
                "$ne" => Condition::Ne(operand.clone()),
                "$gt" => Condition::Gt(operand.clone()),
                "$gte" => Condition::Gte(operand.clone()),
                "$lt" => Condition::Lt(operand.clone()),
                "$lte" => Condition::Lte(operand.clone()),
                "$in" => Condition::In(operand_list(op, operand)?),
                "$nin" => Condition::Nin(operand_list(op, operand)?),
                "$exists" => Condition::Exists(operand.as_bool().ok_or_else(|| {
                    Error::invalid_filter("$exists expects a boolean")
                })?),
                other => return Err(Error::invalid_filter(format!("unknown operator {other}"))),
            })
        })
        .collect()
}

fn operand_list(op: &str, operand: &JsonValue) -> Result<Vec<JsonValue>> {
    operand
        .as_array()
        .cloned()
        .ok_or_else(|| Error::invalid_filter(format!("{op} expects an array")))
}

impl Condition {
    fn matches(&self, value: Option<&JsonValue>) -> bool {
        match self {
            Self::Eq(expected) => equals(value, expected),
            Self::Ne(expected) => !equals(value, expected),
            Self::Gt(bound) => compare_with(value, bound, Ordering::is_gt),
            Self::Gte(bound) => compare_with(value, bound, Ordering::is_ge),
            Self::Lt(bound) => compare_with(value, bound, Ordering::is_lt),
            Self::Lte(bound) => compare_with(value, bound, Ordering::is_le),
            Self::In(candidates) => candidates.iter().any(|c| equals(value, c)),
            Self::Nin(candidates) => !candidates.iter().any(|c| equals(value, c)),
            Self::Exists(expected) => value.is_some() == *expected,
        }
    }
}

/// Equality with array membership: `{tags: "a"}` matches `tags: ["a", "b"]`.
/// A missing field equals `null`.
fn equals(value: Option<&JsonValue>, expected: &JsonValue) -> bool {
    match value {
        None => expected.is_null(),
        Some(actual) if actual == expected => true,
        Some(JsonValue::Array(items)) => items.contains(expected),
        Some(_) => false,
    }
}

/// Range comparison; only values of the same type are comparable
fn compare_with(
    value: Option<&JsonValue>,
    bound: &JsonValue,
    accept: fn(Ordering) -> bool,
) -> bool {
    let Some(actual) = value else {
        return false;
    };
    if let JsonValue::Array(items) = actual {
        if !bound.is_array() {
            return items.iter().any(|item| compare_with(Some(item), bound, accept));
        }
    }
    type_rank(actual) == type_rank(bound) && accept(compare_values(actual, bound))
}

// ============================================================================
// Value helpers
// ============================================================================

/// Resolve a dotted path such as `child.title`
pub(crate) fn get_path<'a>(document: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = match current {
            JsonValue::Object(map) => map.get(part)?,
            JsonValue::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable counterpart of [`get_path`]
pub(crate) fn get_path_mut<'a>(
    document: &'a mut JsonObject,
    path: &str,
) -> Option<&'a mut JsonValue> {
    let mut parts = path.split('.');
    let mut current = document.get_mut(parts.next()?)?;
    for part in parts {
        current = match current {
            JsonValue::Object(map) => map.get_mut(part)?,
            JsonValue::Array(items) => items.get_mut(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Sort order across JSON types: null < bool < number < string < array < object
fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

/// Total order over JSON values
pub(crate) fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.total_cmp(&y)
                }
            }
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Array(x), JsonValue::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(x, y)| compare_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (JsonValue::Object(x), JsonValue::Object(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare optional values; a missing value sorts as `null`
pub(crate) fn compare_optional(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    compare_values(a.unwrap_or(&JsonValue::Null), b.unwrap_or(&JsonValue::Null))
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
