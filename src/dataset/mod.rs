//! Turning fetched JSON into records
//!
//! Datasets arrive either as a bare array or wrapped in an envelope object
//! (`{"items": [...]}`, `{"books": [...]}`). Fetching is the host's job; this
//! module only normalizes the shape.

use crate::core::error::DatasetError;
use crate::core::record::Record;
use serde_json::Value;
use std::path::Path;

/// Parse dataset JSON text
///
/// Accepts a top-level array, an object holding the array under the first
/// matching envelope key, or a single object with none of those keys (a
/// one-record dataset). Array elements that are not objects are skipped.
pub fn parse_records(json: &str, envelope_keys: &[&str]) -> Result<Vec<Record>, DatasetError> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value, envelope_keys)
}

/// Read and parse a local dataset file
pub fn load_records_file(
    path: impl AsRef<Path>,
    envelope_keys: &[&str],
) -> Result<Vec<Record>, DatasetError> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content, envelope_keys)
}

/// Normalize an already-parsed JSON value
pub fn records_from_value(
    value: Value,
    envelope_keys: &[&str],
) -> Result<Vec<Record>, DatasetError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let envelope = envelope_keys
                .iter()
                .copied()
                .find(|key| map.get(*key).is_some_and(Value::is_array));
            match envelope.and_then(|key| map.remove(key)) {
                Some(Value::Array(items)) => items,
                _ if envelope_keys.iter().any(|key| map.contains_key(*key)) => {
                    return Err(unsupported("object", envelope_keys));
                }
                _ => vec![Value::Object(map)],
            }
        }
        other => return Err(unsupported(json_kind(&other), envelope_keys)),
    };

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter(Value::is_object)
        .map(Record::new)
        .collect();

    let skipped = total - records.len();
    if skipped > 0 {
        tracing::warn!(skipped, "Skipped dataset entries that are not objects");
    }
    tracing::debug!(records = records.len(), "Parsed dataset");
    Ok(records)
}

fn unsupported(found: &'static str, envelope_keys: &[&str]) -> DatasetError {
    DatasetError::UnsupportedShape {
        expected: envelope_keys.iter().map(|key| key.to_string()).collect(),
        found,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
