//! Record projection onto the catalog schema
//!
//! Records leave the tap holding only the fields their schema declares.
//! Unknown keys are dropped unless the enclosing object sets
//! `additionalProperties: true`, and top-level properties deselected in the
//! catalog metadata are removed unless they are `automatic`.

use crate::config::CatalogEntry;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Schema-driven field filter for one stream
#[derive(Debug, Clone)]
pub struct RecordProjection {
    schema: Value,
    deselected: HashSet<String>,
}

impl RecordProjection {
    /// Projection for a schema with every property selected
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            deselected: HashSet::new(),
        }
    }

    /// Projection for a catalog entry, honoring property selection
    pub fn for_entry(entry: &CatalogEntry) -> Self {
        let deselected = entry
            .metadata
            .iter()
            .filter_map(|m| match m.breadcrumb.as_slice() {
                [properties, name] if properties == "properties" => Some((name, &m.metadata)),
                _ => None,
            })
            .filter(|(_, metadata)| {
                let inclusion = metadata.get("inclusion").and_then(Value::as_str);
                let selected = metadata.get("selected").and_then(Value::as_bool);
                match inclusion {
                    Some("automatic") => false,
                    Some("unsupported") => true,
                    _ => selected == Some(false),
                }
            })
            .map(|(name, _)| name.clone())
            .collect();

        Self {
            schema: entry.schema.clone(),
            deselected,
        }
    }

    /// Whether a top-level property is emitted
    pub fn is_selected(&self, field: &str) -> bool {
        !self.deselected.contains(field)
    }

    /// Strip a record down to its selected schema fields
    pub fn apply(&self, record: Value) -> Value {
        match record {
            Value::Object(mut fields) => {
                fields.retain(|key, _| self.is_selected(key));
                project(Value::Object(fields), &self.schema)
            }
            other => project(other, &self.schema),
        }
    }
}

fn project(value: Value, schema: &Value) -> Value {
    match value {
        Value::Object(fields) => match schema.get("properties").and_then(Value::as_object) {
            Some(properties) => Value::Object(project_object(fields, properties, schema)),
            None => Value::Object(fields),
        },
        Value::Array(items) => match schema.get("items") {
            Some(item_schema) => Value::Array(
                items
                    .into_iter()
                    .map(|item| project(item, item_schema))
                    .collect(),
            ),
            None => Value::Array(items),
        },
        other => other,
    }
}

fn project_object(
    fields: Map<String, Value>,
    properties: &Map<String, Value>,
    schema: &Value,
) -> Map<String, Value> {
    let open = schema.get("additionalProperties") == Some(&Value::Bool(true));

    fields
        .into_iter()
        .filter_map(|(key, value)| match properties.get(&key) {
            Some(child) => Some((key, project(value, child))),
            None if open => Some((key, value)),
            None => None,
        })
        .collect()
}
