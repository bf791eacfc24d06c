//! Key Derivation Module
//!
//! Builds the canonical cache identity of a request from its method, path
//! and parameters.
//!
//! Keys have the shape `METHOD:path:params`, where `params` is the compact
//! JSON encoding of the parameter map. `Params` is a `BTreeMap` so top-level
//! names are always emitted in lexicographic order; nested objects are
//! re-sorted before encoding. Two distinct parameter sets that encode to the
//! same string would collide. That is accepted: the encoding is injective
//! for everything serde_json produces.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;

/// Request parameters, ordered by name.
pub type Params = BTreeMap<String, Value>;

// == Derive Key ==
/// Derives the canonical cache key for a request.
///
/// Absent and empty parameter sets both encode as an empty component.
pub fn derive_key(method: &Method, path: &str, params: Option<&Params>) -> String {
    let encoded = match params {
        Some(params) if !params.is_empty() => encode_params(params),
        _ => String::new(),
    };

    format!("{}:{}:{}", method.as_str(), path, encoded)
}

fn encode_params(params: &Params) -> String {
    let sorted: BTreeMap<&str, Value> = params
        .iter()
        .map(|(name, value)| (name.as_str(), sort_nested(value)))
        .collect();

    // Serializing a map of plain JSON values cannot fail.
    serde_json::to_string(&sorted).unwrap_or_default()
}

fn sort_nested(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_nested(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_nested).collect()),
        other => other.clone(),
    }
}
