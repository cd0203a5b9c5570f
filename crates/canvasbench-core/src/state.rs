use serde_json::Value;

/// Canvas documents are opaque to the harness: `{"nodes": [...], "edges": [...]}`
/// trees that we hash, persist, and hand to the judge without interpreting.

/// The blank canvas every instruction starts from.
pub fn empty_state() -> Value {
    serde_json::json!({ "nodes": [], "edges": [] })
}

/// Stable serialization with sorted object keys at every level, so that
/// semantically identical documents serialize identically regardless of the
/// key order they were parsed with.
pub fn canonical(state: &Value) -> String {
    serde_json::to_string(&sort_keys(state)).unwrap_or_else(|_| "null".to_string())
}

/// Canonical rendering of a possibly-absent final state. Absence is rendered
/// as an explicit JSON `null`, never omitted.
pub fn canonical_opt(state: Option<&Value>) -> String {
    match state {
        Some(s) => canonical(s),
        None => "null".to_string(),
    }
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            let mut out = serde_json::Map::new();
            for (k, val) in entries {
                out.insert(k.clone(), sort_keys(val));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
