// Entity → query-string flattening
//
// Filter entities travel as query parameters. Scalars become their string
// form, nulls are skipped, arrays repeat the key with a `[]` suffix and
// nested objects are sent JSON-encoded.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Flatten a filter entity into ordered query pairs.
///
/// `null` (or an entity that serializes to `null`) yields no parameters;
/// anything that is not a JSON object is rejected.
pub fn entity_query(entity: &impl Serialize) -> Result<Vec<(String, String)>, Error> {
    match serde_json::to_value(entity)? {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, value) in map {
                push_value(&mut pairs, &key, value);
            }
            Ok(pairs)
        }
        other => Err(Error::InvalidQuery {
            message: format!("expected an object, got {}", kind(&other)),
        }),
    }
}

fn push_value(pairs: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                if let Some(text) = scalar_text(item) {
                    pairs.push((key.clone(), text));
                }
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                pairs.push((key.to_owned(), text));
            }
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
