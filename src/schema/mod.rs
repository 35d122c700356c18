//! Stream schemas and catalog metadata
//!
//! Schemas ship inside the binary; discovery turns each one into a
//! catalog entry with Singer metadata. During sync, records are projected
//! onto the catalog schema.

mod metadata;
mod projection;

pub use metadata::{build_catalog, catalog_entry, standard_metadata};
pub use projection::RecordProjection;

use crate::error::{Error, Result};
use serde_json::Value;

/// Raw JSON schema text for a stream
pub fn schema_source(stream_id: &str) -> Option<&'static str> {
    match stream_id {
        "conversations" => Some(include_str!("../../schemas/conversations.json")),
        "messages" => Some(include_str!("../../schemas/messages.json")),
        "activity_logs" => Some(include_str!("../../schemas/activity_logs.json")),
        _ => None,
    }
}

/// Parsed JSON schema for a stream
pub fn load_schema(stream_id: &str) -> Result<Value> {
    let source = schema_source(stream_id).ok_or_else(|| Error::StreamNotFound {
        stream: stream_id.to_string(),
    })?;
    let schema: Value =
        serde_json::from_str(source).map_err(|e| Error::schema(stream_id, e.to_string()))?;

    if schema.get("properties").and_then(Value::as_object).is_none() {
        return Err(Error::schema(stream_id, "schema has no properties"));
    }
    Ok(schema)
}
