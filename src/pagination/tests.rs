//! Tests for pagination strategies

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn param(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn next_body(key: &str) -> serde_json::Value {
    json!({
        "data": [{"id": 1}],
        "meta": {"next": format!("/v1/conversations/activitylog?pageKey={key}")}
    })
}

// ============================================================================
// Page Key
// ============================================================================

#[test]
fn test_page_key_first_request_has_no_token() {
    let paginator = PageKeyPaginator::new().with_page_limit("pageLimit", 50);
    assert_eq!(paginator.initial_params(), vec![param("pageLimit", "50")]);
    assert!(PageKeyPaginator::new().initial_params().is_empty());
}

#[test]
fn test_page_key_follows_meta_next() {
    let paginator = PageKeyPaginator::new().with_page_limit("pageLimit", 2);
    let mut state = PaginationState::new();

    let body = json!({
        "data": [{"id": 1}, {"id": 2}],
        "meta": {"next": "/v1/conversations/activitylog?pageLimit=2&pageKey=abc%3D%3D"}
    });

    let next = paginator.process_response(&body, 2, &mut state);

    assert_eq!(
        next,
        NextPage::Continue {
            query_params: vec![param("pageLimit", "2"), param("pageKey", "abc==")],
        }
    );
    assert_eq!(state.records_fetched, 2);
    assert!(state.seen_keys.contains("abc=="));
}

#[test]
fn test_page_key_stops_without_next() {
    let paginator = PageKeyPaginator::new();
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!({"data": [], "meta": {}}), 0, &mut state);
    assert!(next.is_done());
    assert_eq!(state.pages_fetched, 1);

    let next = paginator.process_response(&json!({"data": []}), 0, &mut state);
    assert!(next.is_done());
}

#[test]
fn test_page_key_stops_when_next_has_no_token() {
    let paginator = PageKeyPaginator::new();
    let mut state = PaginationState::new();

    let body = json!({"meta": {"next": "/v1/conversations/activitylog?pageLimit=2"}});
    assert!(paginator.process_response(&body, 2, &mut state).is_done());
}

#[test]
fn test_page_key_stops_on_repeated_token() {
    let paginator = PageKeyPaginator::new();
    let mut state = PaginationState::new();

    assert!(!paginator.process_response(&next_body("a"), 1, &mut state).is_done());
    assert!(!paginator.process_response(&next_body("b"), 1, &mut state).is_done());

    // The server hands back a token it already gave out
    assert!(paginator.process_response(&next_body("a"), 1, &mut state).is_done());
    assert_eq!(state.pages_fetched, 3);
}

#[test]
fn test_page_key_stops_when_token_points_at_itself() {
    let paginator = PageKeyPaginator::new();
    let mut state = PaginationState::new();

    assert!(!paginator.process_response(&next_body("same"), 1, &mut state).is_done());
    assert!(paginator.process_response(&next_body("same"), 1, &mut state).is_done());
}

// ============================================================================
// Offset
// ============================================================================

#[test]
fn test_offset_advances_by_records_received() {
    let paginator = OffsetPaginator::new("offset", "pageLimit", 2);
    let mut state = PaginationState::new();

    assert_eq!(
        paginator.initial_params(),
        vec![param("offset", "0"), param("pageLimit", "2")]
    );

    let next = paginator.process_response(&json!({}), 2, &mut state);
    assert_eq!(
        next,
        NextPage::Continue {
            query_params: vec![param("offset", "2"), param("pageLimit", "2")],
        }
    );
    assert_eq!(state.offset, 2);
}

#[test]
fn test_offset_stops_on_short_page() {
    let paginator = OffsetPaginator::new("offset", "pageLimit", 2);
    let mut state = PaginationState::new();

    paginator.process_response(&json!({}), 2, &mut state);
    let next = paginator.process_response(&json!({}), 1, &mut state);

    assert!(next.is_done());
    assert_eq!(state.pages_fetched, 2);
    assert_eq!(state.records_fetched, 3);
}

#[test]
fn test_offset_limit_is_clamped() {
    let paginator = OffsetPaginator::new("offset", "pageLimit", 0);
    assert_eq!(paginator.limit_value, 1);
}
