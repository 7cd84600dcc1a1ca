//! Tests for query module

use super::*;
use crate::error::Error;
use crate::types::SortDirection;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_projection_parse_include() {
    let projection = Projection::parse("title date").unwrap();
    assert_eq!(projection, Projection::include(["title", "date"]));
    assert!(projection.is_include());
}

#[test]
fn test_projection_parse_exclude() {
    let projection = Projection::parse("-date, -child").unwrap();
    assert_eq!(projection, Projection::exclude(["date", "child"]));
    assert!(!projection.is_include());
}

#[test]
fn test_projection_parse_rejects_mixed() {
    let err = Projection::parse("title -date").unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { ref field, .. } if field == "columns"));
}

#[test]
fn test_projection_parse_rejects_empty() {
    assert!(Projection::parse("  ,  ").is_err());
}

#[test]
fn test_projection_deserialize_forms() {
    let from_text: Projection = serde_json::from_value(json!("title")).unwrap();
    assert_eq!(from_text, Projection::include(["title"]));

    let from_list: Projection = serde_json::from_value(json!(["title", "+date"])).unwrap();
    assert_eq!(from_list, Projection::include(["title", "date"]));

    assert!(serde_json::from_value::<Projection>(json!(["title", "-date"])).is_err());
}

#[test]
fn test_projection_serializes_as_string() {
    let value = serde_json::to_value(Projection::exclude(["date"])).unwrap();
    assert_eq!(value, json!("-date"));
}

// ============================================================================
// SortSpec Tests
// ============================================================================

#[test]
fn test_sort_parse_string() {
    let spec = SortSpec::parse("-title date").unwrap();
    assert_eq!(spec, SortSpec::new().desc("title").asc("date"));
}

#[test]
fn test_sort_parse_rejects_empty() {
    assert!(SortSpec::parse("").is_err());
}

#[test]
fn test_sort_from_object_keeps_key_order() {
    let spec: SortSpec =
        serde_json::from_value(json!({"title": -1, "date": "asc", "rank": "descending"}))
            .unwrap();

    let keys: Vec<(&str, SortDirection)> = spec
        .keys()
        .iter()
        .map(|k| (k.field.as_str(), k.direction))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("title", SortDirection::Desc),
            ("date", SortDirection::Asc),
            ("rank", SortDirection::Desc),
        ]
    );
}

#[test]
fn test_sort_from_object_rejects_bad_direction() {
    let err = serde_json::from_value::<SortSpec>(json!({"title": 0})).unwrap_err();
    assert!(err.to_string().contains("invalid direction for 'title'"));
}

#[test]
fn test_sort_serializes_as_object() {
    let value = serde_json::to_value(SortSpec::new().desc("title").asc("date")).unwrap();
    assert_eq!(value, json!({"title": -1, "date": 1}));
}

// ============================================================================
// Populate Tests
// ============================================================================

#[test]
fn test_populate_parse() {
    assert_eq!(Populate::parse("child").unwrap(), Populate::One("child".into()));
    assert_eq!(
        Populate::parse("child, owner").unwrap(),
        Populate::Many(vec!["child".into(), "owner".into()])
    );
    assert!(Populate::parse(" ").is_err());
}

#[test]
fn test_populate_fields() {
    assert_eq!(Populate::from("child").fields(), vec!["child"]);
    assert_eq!(
        Populate::from(vec!["a".to_string(), "b".to_string()]).fields(),
        vec!["a", "b"]
    );
}

#[test]
fn test_populate_deserialize_forms() {
    let one: Populate = serde_json::from_value(json!("child")).unwrap();
    assert_eq!(one, Populate::One("child".into()));

    let many: Populate = serde_json::from_value(json!(["child", "owner"])).unwrap();
    assert_eq!(many.fields(), vec!["child", "owner"]);

    let spaced: Populate = serde_json::from_value(json!("child owner")).unwrap();
    assert_eq!(spaced, Populate::Many(vec!["child".into(), "owner".into()]));

    let err = serde_json::from_value::<Populate>(json!("  ")).unwrap_err();
    assert!(err.to_string().contains("no fields given"));
}

#[test]
fn test_populate_serializes_in_input_form() {
    assert_eq!(serde_json::to_value(Populate::from("child")).unwrap(), json!("child"));
    assert_eq!(
        serde_json::to_value(Populate::Many(vec!["child".into(), "owner".into()])).unwrap(),
        json!(["child", "owner"])
    );
}

// ============================================================================
// FindQuery Tests
// ============================================================================

#[test]
fn test_find_query_defaults() {
    let filter = json!({});
    let query = FindQuery::new(&filter);

    assert_eq!(query.skip, 0);
    assert!(query.limit.is_none());
    assert!(query.projection.is_none());
    assert!(query.sort.is_none());
    assert!(query.populate.is_empty());
    assert!(!query.lean);
}

#[test]
fn test_find_query_chaining() {
    let filter = json!({"title": "Item #1"});
    let query = FindQuery::new(&filter)
        .select(Projection::include(["title"]))
        .skip(20)
        .limit(10)
        .sort(SortSpec::new().desc("title"))
        .populate("child")
        .populate("owner")
        .lean(true);

    assert_eq!(query.filter, &filter);
    assert_eq!(query.skip, 20);
    assert_eq!(query.limit, Some(10));
    assert_eq!(query.projection, Some(Projection::include(["title"])));
    assert_eq!(query.sort, Some(SortSpec::new().desc("title")));
    assert_eq!(query.populate, vec!["child".to_string(), "owner".to_string()]);
    assert!(query.lean);
}
