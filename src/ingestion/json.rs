//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object: `{"a":1}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Object key order is kept, so the first object's keys define column order. Nested objects and
//! arrays are stored as their JSON text.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::types::{ColumnType, Table};

use super::records::{ingest_records, RawValue, Record};

/// Ingest a JSON file into an in-memory [`Table`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, default_type: ColumnType) -> EngineResult<Table> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, default_type)
}

/// Ingest JSON from an in-memory string into a [`Table`].
pub fn ingest_json_from_str(input: &str, default_type: ColumnType) -> EngineResult<Table> {
    let records = read_json_records(input)?;
    ingest_records(records, default_type)
}

/// Decode JSON text into [`Record`]s without building a table.
///
/// Whitespace-only input yields no records.
pub fn read_json_records(input: &str) -> EngineResult<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    // First try parsing as a single JSON value (array or object).
    let values = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(v @ serde_json::Value::Object(_)) => vec![v],
        Ok(_) => {
            return Err(EngineError::Format {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(_) => parse_ndjson(trimmed)?,
    };

    values
        .into_iter()
        .enumerate()
        .map(|(idx0, v)| match v {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, convert_json_value(v)))
                .collect()),
            _ => Err(EngineError::Format {
                message: format!("row {} is not a json object", idx0 + 1),
            }),
        })
        .collect()
}

fn parse_ndjson(input: &str) -> EngineResult<Vec<serde_json::Value>> {
    let mut values = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        values.push(serde_json::from_str::<serde_json::Value>(line)?);
    }
    Ok(values)
}

fn convert_json_value(v: serde_json::Value) -> RawValue {
    match v {
        serde_json::Value::Null => RawValue::Null,
        serde_json::Value::Bool(b) => RawValue::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Null),
        serde_json::Value::String(s) => RawValue::Text(s),
        nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
            RawValue::Text(nested.to_string())
        }
    }
}
