//! Record-level ingestion: the step shared by every format adapter.
//!
//! A format adapter decodes bytes into an ordered sequence of [`Record`]s (header name → raw
//! scalar). [`ingest_records`] turns those records into a [`Table`].

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::types::{CellValue, Column, ColumnType, Row, Table};

/// A raw scalar as decoded by a spreadsheet/CSV reader, before any typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Explicit null (e.g. JSON `null`).
    Null,
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
    /// Boolean cell.
    Bool(bool),
}

impl From<RawValue> for CellValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => CellValue::Null,
            RawValue::Number(v) => CellValue::Number(v),
            RawValue::Text(s) => CellValue::Text(s),
            RawValue::Bool(b) => CellValue::Text(b.to_string()),
        }
    }
}

/// One decoded source row: `(header, value)` pairs in source column order.
///
/// Columns with an empty cell are usually left out entirely, so records can be sparse.
pub type Record = Vec<(String, RawValue)>;

/// Build a [`Table`] from decoded records.
///
/// - Columns are the keys of the **first** record, in order, each declared as `default_type`.
///   Keys that only appear in later records are kept on their rows but are not table columns.
/// - Booleans are stored as the text `"true"` / `"false"`.
/// - Returns [`EngineError::EmptyInput`] when there are no records.
pub fn ingest_records<I>(records: I, default_type: ColumnType) -> EngineResult<Table>
where
    I: IntoIterator<Item = Record>,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(EngineError::EmptyInput)?;

    let mut columns: Vec<Column> = Vec::with_capacity(first.len());
    for (name, _) in &first {
        if !columns.iter().any(|c| c.name == *name) {
            columns.push(Column::new(name.clone(), default_type));
        }
    }

    let rows = std::iter::once(first)
        .chain(records)
        .map(record_to_row)
        .collect();

    Ok(Table::new(columns, rows))
}

fn record_to_row(record: Record) -> Row {
    let mut row = Row::with_capacity(record.len());
    for (name, raw) in record {
        row.insert(name, raw.into());
    }
    row
}

/// Make header names usable as column names.
///
/// Empty headers become `__EMPTY`, `__EMPTY_1`, ...; repeated headers get `_1`, `_2`, ...
/// suffixes in order of appearance.
pub(crate) fn disambiguate_headers<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for header in headers {
        let base = if header.trim().is_empty() {
            "__EMPTY".to_string()
        } else {
            header
        };
        let mut name = base.clone();
        let mut n = 1usize;
        while used.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}

/// Classify a textual cell the way spreadsheet readers do for delimited text.
///
/// Blank cells yield `None` (the column is omitted from the record). Numeric text becomes a
/// number, `true`/`false` (any case) a boolean, anything else stays text verbatim.
pub(crate) fn classify_text(raw: &str) -> Option<RawValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(v) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
        return Some(RawValue::Number(v));
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(RawValue::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(RawValue::Bool(false));
    }
    Some(RawValue::Text(raw.to_string()))
}
