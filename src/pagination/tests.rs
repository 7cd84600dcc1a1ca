//! Tests for pagination module

use super::*;
use crate::collection::Collection;
use crate::query::{FindQuery, Populate, Projection, SortSpec};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use test_case::test_case;

// ============================================================================
// Window Tests
// ============================================================================

#[test_case(1, 10, 0 ; "first page")]
#[test_case(2, 10, 10 ; "second page")]
#[test_case(10, 10, 90 ; "tenth page")]
#[test_case(3, 25, 50 ; "custom limit")]
#[test_case(0, 10, 0 ; "page zero clamps to first")]
fn test_window_skip(page: u64, limit: u64, skip: u64) {
    assert_eq!(Window::new(page, limit).skip, skip);
}

#[test]
fn test_window_zero_limit_uses_default() {
    let window = Window::new(1, 0);
    assert_eq!(window.limit, DEFAULT_LIMIT);
}

#[test]
fn test_window_saturates() {
    let window = Window::new(u64::MAX, u64::MAX);
    assert_eq!(window.skip, u64::MAX);
}

#[test_case(0, 10, 1 ; "empty is one page")]
#[test_case(1, 10, 1 ; "single item")]
#[test_case(10, 10, 1 ; "exactly one page")]
#[test_case(11, 10, 2 ; "one over")]
#[test_case(100, 10, 10 ; "hundred items")]
#[test_case(101, 10, 11 ; "hundred and one items")]
#[test_case(7, 3, 3 ; "partial last page")]
fn test_window_page_count(item_count: u64, limit: u64, expected: u64) {
    assert_eq!(Window::new(1, limit).page_count(item_count), expected);
}

// ============================================================================
// PageOptions Tests
// ============================================================================

#[test]
fn test_page_options_defaults() {
    let options = PageOptions::new();
    assert_eq!(options.effective_page(), 1);
    assert_eq!(options.effective_limit(), 10);
    assert_eq!(options.window(), Window { skip: 0, limit: 10 });
    assert!(!options.lean);
}

#[test]
fn test_page_options_zero_values_fall_back() {
    let options = PageOptions::new().page(0).limit(0);
    assert_eq!(options.effective_page(), DEFAULT_PAGE);
    assert_eq!(options.effective_limit(), DEFAULT_LIMIT);
}

#[test]
fn test_page_options_find_query_defaults() {
    let filter = json!({});
    let query = PageOptions::new().find_query(&filter);

    assert_eq!(query.skip, 0);
    assert_eq!(query.limit, Some(10));
    assert!(query.projection.is_none());
    assert!(query.sort.is_none());
    assert!(query.populate.is_empty());
    assert!(!query.lean);
}

#[test]
fn test_page_options_find_query_carries_everything() {
    let filter = json!({"kind": "entry"});
    let options = PageOptions::new()
        .page(3)
        .limit(5)
        .columns(Projection::include(["title"]))
        .sort(SortSpec::new().desc("title"))
        .populate(vec!["child".to_string(), "owner".to_string()])
        .lean(true);

    let query = options.find_query(&filter);

    assert_eq!(query.filter, &filter);
    assert_eq!(query.skip, 10);
    assert_eq!(query.limit, Some(5));
    assert_eq!(query.projection, Some(Projection::include(["title"])));
    assert_eq!(query.sort, Some(SortSpec::new().desc("title")));
    assert_eq!(query.populate, vec!["child".to_string(), "owner".to_string()]);
    assert!(query.lean);
}

#[test]
fn test_page_options_single_populate() {
    let filter = json!({});
    let query = PageOptions::new()
        .populate(Populate::One("child".into()))
        .find_query(&filter);
    assert_eq!(query.populate, vec!["child".to_string()]);
}

// ============================================================================
// PageResult Tests
// ============================================================================

#[test]
fn test_page_result_new() {
    let page = PageResult::new(vec![1, 2, 3], 23, Window::new(1, 3));
    assert_eq!(page.len(), 3);
    assert!(!page.is_empty());
    assert_eq!(page.item_count, 23);
    assert_eq!(page.page_count, 8);
    assert!(page.has_next_page(7));
    assert!(!page.has_next_page(8));
}

#[test]
fn test_page_result_map() {
    let page = PageResult::new(vec![1, 2], 2, Window::new(1, 10)).map(|n| n * 10);
    assert_eq!(page.page_count, 1);
    assert_eq!(page.into_results(), vec![10, 20]);
}

#[test]
fn test_page_result_serializes_camel_case() {
    let page = PageResult::new(vec![json!({"title": "Item #1"})], 1, Window::new(1, 10));
    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(
        value,
        json!({
            "results": [{"title": "Item #1"}],
            "itemCount": 1,
            "pageCount": 1
        })
    );
}

// ============================================================================
// Paginator Tests
// ============================================================================

/// What the stub collection observed
#[derive(Debug, Default)]
struct Observed {
    find_calls: usize,
    count_calls: usize,
    skip: u64,
    limit: Option<u64>,
    lean: bool,
}

/// A collection of integers `0..size`, filtered by "greater or equal"
struct NumberCollection {
    size: u64,
    fail_count: bool,
    observed: Mutex<Observed>,
}

impl NumberCollection {
    fn new(size: u64) -> Self {
        Self {
            size,
            fail_count: false,
            observed: Mutex::new(Observed::default()),
        }
    }

    fn failing_count(size: u64) -> Self {
        Self {
            fail_count: true,
            ..Self::new(size)
        }
    }
}

#[async_trait]
impl Collection for NumberCollection {
    type Filter = u64;
    type Document = u64;
    type Error = String;

    fn name(&self) -> &str {
        "numbers"
    }

    async fn find(&self, query: FindQuery<'_, u64>) -> Result<Vec<u64>, String> {
        {
            let mut observed = self.observed.lock().unwrap();
            observed.find_calls += 1;
            observed.skip = query.skip;
            observed.limit = query.limit;
            observed.lean = query.lean;
        }
        Ok((*query.filter..self.size)
            .skip(query.skip as usize)
            .take(query.limit.unwrap_or(u64::MAX) as usize)
            .collect())
    }

    async fn count(&self, filter: &u64) -> Result<u64, String> {
        self.observed.lock().unwrap().count_calls += 1;
        if self.fail_count {
            return Err("count unavailable".to_string());
        }
        Ok(self.size.saturating_sub(*filter))
    }
}

#[tokio::test]
async fn test_paginate_first_page() {
    let numbers = NumberCollection::new(95);
    let page = paginate(&numbers, &0, &PageOptions::new()).await.unwrap();

    assert_eq!(page.results, (0..10).collect::<Vec<_>>());
    assert_eq!(page.item_count, 95);
    assert_eq!(page.page_count, 10);

    let observed = numbers.observed.lock().unwrap();
    assert_eq!(observed.find_calls, 1);
    assert_eq!(observed.count_calls, 1);
}

#[tokio::test]
async fn test_paginate_last_partial_page() {
    let numbers = NumberCollection::new(95);
    let page = paginate(&numbers, &0, &PageOptions::new().page(10))
        .await
        .unwrap();

    assert_eq!(page.results, (90..95).collect::<Vec<_>>());
    assert_eq!(page.page_count, 10);
}

#[tokio::test]
async fn test_paginate_past_the_end_is_empty() {
    let numbers = NumberCollection::new(15);
    let page = paginate(&numbers, &0, &PageOptions::new().page(5))
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.item_count, 15);
    assert_eq!(page.page_count, 2);
}

#[tokio::test]
async fn test_paginate_count_ignores_window() {
    let numbers = NumberCollection::new(50);
    let page = paginate(&numbers, &20, &PageOptions::new().page(2).limit(7).lean(true))
        .await
        .unwrap();

    assert_eq!(page.results, (27..34).collect::<Vec<_>>());
    assert_eq!(page.item_count, 30);
    assert_eq!(page.page_count, 5);

    let observed = numbers.observed.lock().unwrap();
    assert_eq!(observed.skip, 7);
    assert_eq!(observed.limit, Some(7));
    assert!(observed.lean);
}

#[tokio::test]
async fn test_paginate_propagates_count_error() {
    let numbers = NumberCollection::failing_count(10);
    let err = paginate(&numbers, &0, &PageOptions::new()).await.unwrap_err();
    assert_eq!(err, "count unavailable");
}

#[tokio::test]
async fn test_paginate_trait_method() {
    let numbers = NumberCollection::new(3);
    let page = numbers
        .paginate(&0, &PageOptions::new().limit(2))
        .await
        .unwrap();
    assert_eq!(page.results, vec![0, 1]);
    assert_eq!(page.page_count, 2);
}

#[test]
fn test_paginate_with_calls_back_once() {
    let numbers = NumberCollection::new(12);
    let mut calls = Vec::new();

    tokio_test::block_on(numbers.paginate_with(&0, None, |result| calls.push(result)));

    assert_eq!(calls.len(), 1);
    let page = calls.remove(0).unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page.page_count, 2);
}

#[test]
fn test_paginate_with_delivers_error() {
    let numbers = NumberCollection::failing_count(12);
    let mut delivered = None;

    tokio_test::block_on(numbers.paginate_with(&0, Some(&PageOptions::new()), |result| {
        delivered = Some(result);
    }));

    assert_eq!(delivered, Some(Err("count unavailable".to_string())));
}
