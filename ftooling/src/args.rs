//! JSON argument helpers for tool handlers.
//!
//! ```rust
//! use ftooling::{optional_i64, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"query":"ramen","limit":5}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "query").unwrap(), "ramen");
//! assert_eq!(optional_i64(&args, "limit").unwrap(), Some(5));
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    into_object(parse_json_value(args_json)?)
}

/// Accepts an object, treating `null` as no arguments.
pub fn into_object(value: Value) -> Result<Map<String, Value>, ToolError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &Map<String, Value>, key: &str) -> Result<Option<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ToolError::invalid_arguments(format!(
            "expected string for '{key}'"
        ))),
    }
}

pub fn optional_i64(args: &Map<String, Value>, key: &str) -> Result<Option<i64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            ToolError::invalid_arguments(format!("expected integer for '{key}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_object_and_extract_required_string() {
        let args = parse_json_object("{\"query\":\"rust\"}").expect("args should parse");
        let query = required_string(&args, "query").expect("query should exist");
        assert_eq!(query, "rust");
    }

    #[test]
    fn parse_invalid_json_returns_invalid_arguments() {
        let error = parse_json_value("{").expect_err("json should fail");
        assert_eq!(error.kind, crate::ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn null_is_an_empty_object_but_arrays_are_rejected() {
        assert!(into_object(Value::Null).expect("null is empty").is_empty());
        assert!(into_object(json!([1, 2])).is_err());
    }

    #[test]
    fn optional_helpers_distinguish_missing_from_mistyped() {
        let args = into_object(json!({"name": "kimchi", "count": "three", "skip": null}))
            .expect("object");

        assert_eq!(optional_string(&args, "name").unwrap(), Some("kimchi".to_string()));
        assert_eq!(optional_string(&args, "absent").unwrap(), None);
        assert_eq!(optional_i64(&args, "skip").unwrap(), None);
        assert!(optional_i64(&args, "count").is_err());
    }
}
