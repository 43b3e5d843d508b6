use serde_json::{Map, Value};

use crate::model::PageRecord;

pub fn merge_page(previous: Option<&Value>, fresh: &PageRecord) -> Value {
    let fresh = serde_json::to_value(fresh).unwrap_or(Value::Null);
    merge_values(previous, &fresh)
}

// Per top-level field: a non-empty fresh value wins, otherwise the previous
// value survives. Fields only present in the previous snapshot are kept.
pub fn merge_values(previous: Option<&Value>, fresh: &Value) -> Value {
    let mut merged = match previous {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Map::new(),
    };

    let Value::Object(fresh_fields) = fresh else {
        return Value::Object(merged);
    };

    for (key, value) in fresh_fields {
        if !is_blank(value) || !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}

pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.values().all(is_blank),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
