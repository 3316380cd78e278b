//! Response envelopes of the greenhouse API
//!
//! List endpoints may answer with a bare array or wrap it in
//! `data`/`items`/`results`. Entries that are not records are skipped so one
//! bad element never hides the rest of a listing. The API client and the
//! browser bindings both decode through here.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Keys under which the API nests its payload
pub const ENVELOPE_KEYS: &[&str] = &["data", "items", "results"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("expected a list, got {0}")]
    NotAList(&'static str),

    #[error("expected a record, got {0}")]
    NotARecord(&'static str),

    #[error("{0}")]
    Record(String),
}

/// Records decoded from a list, plus why any entries were skipped
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedList<T> {
    pub records: Vec<T>,
    pub skipped: Vec<String>,
}

/// Strip a `{ "data": ... }` style envelope, if any
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                if let Some(inner) = map.remove(*key) {
                    return inner;
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Decode a list response, skipping entries that are not records
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<DecodedList<T>, DecodeError> {
    let items = match unwrap_envelope(body) {
        Value::Array(items) => items,
        other => return Err(DecodeError::NotAList(json_kind(&other))),
    };

    let mut decoded = DecodedList {
        records: Vec::with_capacity(items.len()),
        skipped: Vec::new(),
    };
    for item in items {
        match serde_json::from_value(item) {
            Ok(record) => decoded.records.push(record),
            Err(e) => decoded.skipped.push(e.to_string()),
        }
    }
    Ok(decoded)
}

/// Decode a single record response
pub fn decode_record<T: DeserializeOwned>(body: Value) -> Result<T, DecodeError> {
    let record = unwrap_envelope(body);
    if !record.is_object() {
        return Err(DecodeError::NotARecord(json_kind(&record)));
    }
    serde_json::from_value(record).map_err(|e| DecodeError::Record(e.to_string()))
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
