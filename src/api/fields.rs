//! Lenient accessors for the API's JSON envelopes.
//!
//! Responses come in two shapes: fields wrapped in a `data` object, or the
//! same fields at the top level. Helpers here prefer `data` and fall back.

use serde_json::Value;

/// Placeholder shown when a field is absent or null.
pub const MISSING: &str = "n/a";

/// Render a field for display: strings without quotes, absent/null as `n/a`.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `body.data.<key>`, if `data` is an object holding `key`.
pub fn data_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get("data").and_then(|data| data.get(key))
}

/// True when `code` is numerically equal to `expected`.
pub fn code_is(body: &Value, expected: i64) -> bool {
    body.get("code")
        .and_then(Value::as_f64)
        .is_some_and(|code| code == expected as f64)
}

/// The envelope's success indicator: `success: true` or `code: 200`.
pub fn indicates_success(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true) || code_is(body, 200)
}

/// Authentication token from `data.token`, falling back to top-level `token`.
/// Empty strings count as absent.
pub fn token(body: &Value) -> Option<String> {
    [data_field(body, "token"), body.get("token")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// The `data` object when it carries anything, otherwise the whole body.
pub fn data_or_body(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if is_truthy(data) => data,
        _ => body,
    }
}

/// Items of `data.list`, falling back to top-level `list`.
pub fn list(body: &Value) -> &[Value] {
    [data_field(body, "list"), body.get("list")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First `chars` characters of `text`, followed by `...`.
pub fn preview(text: &str, chars: usize) -> String {
    let head: String = text.chars().take(chars).collect();
    format!("{head}...")
}
