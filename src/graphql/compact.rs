//! Strip unrequested fields from a GraphQL body before it is cached.
use serde::Serialize;
use serde_json::Value;

use super::models::UNREQUESTED_MARKER;

/// Serialize `body` and drop every unrequested field, recursively through
/// objects and lists. Explicit nulls are kept.
pub fn compact<T: Serialize>(body: &T) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(body)?;
    strip_unrequested(&mut value);
    Ok(value)
}

pub fn strip_unrequested(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !is_marker(v));
            map.values_mut().for_each(strip_unrequested);
        }
        Value::Array(items) => {
            items.retain(|v| !is_marker(v));
            items.iter_mut().for_each(strip_unrequested);
        }
        _ => {}
    }
}

fn is_marker(value: &Value) -> bool {
    value.as_str() == Some(UNREQUESTED_MARKER)
}
