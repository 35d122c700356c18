//! Singer metadata for discovered streams

use super::load_schema;
use crate::config::{Catalog, CatalogEntry, MetadataEntry};
use crate::error::Result;
use crate::streams::{StreamDefinition, STREAMS};
use crate::types::ReplicationMethod;
use serde_json::{json, Map, Value};

/// Standard metadata for a stream
///
/// The root breadcrumb carries key properties and replication settings.
/// Key properties and the replication key are `automatic`; every other
/// property is `available`.
pub fn standard_metadata(def: &StreamDefinition, schema: &Value) -> Vec<MetadataEntry> {
    let replication_keys: Vec<&str> = match def.replication_method {
        ReplicationMethod::Incremental => def.replication_key.into_iter().collect(),
        ReplicationMethod::FullTable => Vec::new(),
    };

    let mut root = Map::new();
    root.insert("table-key-properties".into(), json!(def.key_properties));
    root.insert(
        "forced-replication-method".into(),
        json!(def.replication_method.as_str()),
    );
    if !replication_keys.is_empty() {
        root.insert("valid-replication-keys".into(), json!(replication_keys));
    }
    root.insert("inclusion".into(), json!("available"));

    let mut entries = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: root,
    }];

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|props| props.keys());

    for name in properties {
        let automatic = def.key_properties.contains(&name.as_str())
            || replication_keys.contains(&name.as_str());
        let mut metadata = Map::new();
        metadata.insert(
            "inclusion".into(),
            json!(if automatic { "automatic" } else { "available" }),
        );
        entries.push(MetadataEntry {
            breadcrumb: vec!["properties".to_string(), name.clone()],
            metadata,
        });
    }

    entries
}

/// Catalog entry for one stream
pub fn catalog_entry(def: &StreamDefinition) -> Result<CatalogEntry> {
    let schema = load_schema(def.stream_id)?;
    let metadata = standard_metadata(def, &schema);

    Ok(CatalogEntry {
        stream: def.stream_id.to_string(),
        tap_stream_id: def.stream_id.to_string(),
        key_properties: def.key_properties(),
        replication_method: Some(def.replication_method.as_str().to_string()),
        replication_key: def.replication_key.map(ToString::to_string),
        schema,
        metadata,
    })
}

/// Catalog for every stream, in declaration order
pub fn build_catalog() -> Result<Catalog> {
    let streams = STREAMS.iter().map(catalog_entry).collect::<Result<_>>()?;
    Ok(Catalog { streams })
}
