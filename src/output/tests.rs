//! Tests for output module

use super::*;
use crate::engine::Message;
use crate::state::State;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn lines(writer: JsonLinesWriter<Vec<u8>>) -> Vec<Value> {
    String::from_utf8(writer.into_inner())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_json_lines_shapes() {
    let mut writer = JsonLinesWriter::new(Vec::new());

    writer
        .emit(&Message::schema(
            "conversations",
            json!({"type": "object"}),
            vec!["id".to_string()],
            vec!["updated_at".to_string()],
        ))
        .unwrap();
    writer
        .emit(&Message::record(
            "conversations",
            json!({"id": 1}),
            Some("2022-04-01T00:00:00Z".to_string()),
        ))
        .unwrap();

    let mut state = State::new();
    state.set_bookmark("conversations", "updated_at", 5.into());
    writer.emit(&Message::state(state)).unwrap();

    assert_eq!(writer.lines_written(), 3);
    assert_eq!(
        lines(writer),
        vec![
            json!({
                "type": "SCHEMA",
                "stream": "conversations",
                "schema": {"type": "object"},
                "key_properties": ["id"],
                "bookmark_properties": ["updated_at"]
            }),
            json!({
                "type": "RECORD",
                "stream": "conversations",
                "record": {"id": 1},
                "time_extracted": "2022-04-01T00:00:00Z"
            }),
            json!({
                "type": "STATE",
                "value": {
                    "bookmarks": {"conversations": {"updated_at": 5}},
                    "currently_syncing": null
                }
            }),
        ]
    );
}

#[test]
fn test_record_without_time_extracted_omits_field() {
    let mut writer = JsonLinesWriter::new(Vec::new());
    writer
        .emit(&Message::record("messages", json!({"id": "a"}), None))
        .unwrap();

    assert_eq!(
        lines(writer),
        vec![json!({"type": "RECORD", "stream": "messages", "record": {"id": "a"}})]
    );
}

#[test]
fn test_message_parses_back() {
    let line = r#"{"type":"STATE","value":{"bookmarks":{"messages":{"created_at":1}}}}"#;
    let message: Message = serde_json::from_str(line).unwrap();
    assert!(message.is_state());
}

#[test]
fn test_memory_sink_helpers() {
    let mut sink = MemorySink::new();
    sink.emit(&Message::record("a", json!({"id": 1}), None)).unwrap();
    sink.emit(&Message::record("b", json!({"id": 2}), None)).unwrap();
    sink.emit(&Message::record("a", json!({"id": 3}), None)).unwrap();
    assert!(sink.last_state().is_none());

    sink.emit(&Message::state(State::new())).unwrap();

    assert_eq!(sink.records("a"), vec![&json!({"id": 1}), &json!({"id": 3})]);
    assert_eq!(sink.messages().len(), 4);
    assert_eq!(sink.last_state(), Some(&State::new()));
}
