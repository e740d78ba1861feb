//! Best-effort dotted-path extraction from loosely structured JSON.

use serde_json::Value;

/// Walk a dotted `path` through `value` and stringify whatever is found.
///
/// Each path segment that parses as a non-negative integer is treated as an
/// array index; any other segment is treated as an object key. A missing key
/// propagates a null forward; a type mismatch or an out-of-bounds index
/// short-circuits to the empty string. The final value is stringified with
/// [`stringify`]. This never errors: it is an accessor, not a validator.
#[must_use]
pub fn extract(value: &Value, path: &str) -> String {
    let mut current = value;
    for segment in path.split('.') {
        current = if let Ok(index) = segment.parse::<usize>() {
            match current {
                Value::Array(items) => match items.get(index) {
                    Some(item) => item,
                    None => return String::new(),
                },
                _ => return String::new(),
            }
        } else {
            match current {
                Value::Object(map) => map.get(segment).unwrap_or(&Value::Null),
                _ => return String::new(),
            }
        };
    }
    stringify(current)
}

/// Render a JSON value as a bare string.
///
/// Strings come back unquoted, null becomes empty, and composite values fall
/// back to their compact JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_object_and_array() {
        let v = json!({"a": {"b": [{"c": "x"}]}});
        assert_eq!(extract(&v, "a.b.0.c"), "x");
    }

    #[test]
    fn missing_key_yields_empty() {
        let v = json!({});
        assert_eq!(extract(&v, "a.b"), "");
    }

    #[test]
    fn index_out_of_bounds_yields_empty() {
        let v = json!({"a": [1, 2]});
        assert_eq!(extract(&v, "a.5"), "");
    }

    #[test]
    fn index_into_non_array_yields_empty() {
        let v = json!({"a": {"b": 1}});
        assert_eq!(extract(&v, "a.0"), "");
    }

    #[test]
    fn key_into_non_object_yields_empty() {
        let v = json!({"a": "scalar"});
        assert_eq!(extract(&v, "a.b"), "");
    }

    #[test]
    fn scalar_leaves() {
        let v = json!({"n": 42, "b": true, "s": "text", "z": null});
        assert_eq!(extract(&v, "n"), "42");
        assert_eq!(extract(&v, "b"), "true");
        assert_eq!(extract(&v, "s"), "text");
        assert_eq!(extract(&v, "z"), "");
    }

    #[test]
    fn realistic_host_response() {
        let v = json!({
            "id": 17,
            "name": "h1.example.org",
            "ipaddresses": [{"id": 3, "ipaddress": "10.0.0.5"}],
        });
        assert_eq!(extract(&v, "ipaddresses.0.ipaddress"), "10.0.0.5");
    }
}
