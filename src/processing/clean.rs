//! Cleaning: deduplication, type coercion and null repair.
//!
//! [`clean()`] never fails. Cells it cannot coerce keep their original value; they are listed in
//! [`RepairReport::unconverted`] and reported to the configured observer.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::types::{CellValue, Column, ColumnType, ColumnTypes, Row, Table};

use super::events::{ProcessingEvent, ProcessingObserver};

/// Date formats tried (in order) when coercing text to a date.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
];

/// Date-time formats tried after [`DEFAULT_DATE_FORMATS`]; the time part is dropped.
pub const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Options controlling [`clean()`].
#[derive(Clone)]
pub struct CleaningOptions {
    /// Date written into empty `Date` cells. `None` means the current UTC date.
    pub today: Option<NaiveDate>,
    /// `chrono` formats for date-only text.
    pub date_formats: Vec<String>,
    /// `chrono` formats for date-time text. RFC 3339 timestamps are always accepted.
    pub datetime_formats: Vec<String>,
    /// Optional observer for processing events.
    pub observer: Option<Arc<dyn ProcessingObserver>>,
}

impl fmt::Debug for CleaningOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleaningOptions")
            .field("today", &self.today)
            .field("date_formats", &self.date_formats)
            .field("datetime_formats", &self.datetime_formats)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            today: None,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            datetime_formats: DEFAULT_DATETIME_FORMATS.iter().map(|s| s.to_string()).collect(),
            observer: None,
        }
    }
}

impl CleaningOptions {
    /// Parse `raw` as a calendar date using the configured formats.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
        self.date_formats
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
            .or_else(|| {
                self.datetime_formats
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                    .map(|dt| dt.date())
            })
    }

    fn emit(&self, event: ProcessingEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

/// A cell that kept its original value because it could not be coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconvertedCell {
    /// Index of the row in the input table.
    pub row: usize,
    pub column: String,
    pub declared_type: ColumnType,
    pub value: CellValue,
}

/// Counts of each repair category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    /// Rows dropped because an identical row appeared earlier.
    pub duplicates_removed: usize,
    /// Cells rewritten into their column's declared type.
    pub formatting_fixed: usize,
    /// Missing cells filled with a default value.
    pub nulls_fixed: usize,
    /// Cells left as-is because coercion failed.
    pub unconverted: Vec<UnconvertedCell>,
}

/// Result of [`clean()`]: the new table plus what was repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutcome {
    pub table: Table,
    pub report: RepairReport,
}

enum Repair {
    Unchanged,
    Formatted,
    NullFilled,
    Unconverted,
}

/// Clean `table` toward the declared types in `types`.
///
/// 1. Rows identical (same columns, same order, same values) to an earlier row are dropped.
/// 2. Every remaining row gets exactly the table's columns, each coerced to its declared type:
///    - missing cells are filled with `0`, the processing date, or `""` (Number/Date/Text);
///    - text in a `Number` column keeps only `0-9`, `.` and `-` and is parsed as a number;
///    - text in a `Date` column is parsed as a date;
///    - non-text values in a `Text` column are stringified.
///
/// Columns of `types` that the table does not have are ignored; table columns `types` does not
/// mention keep their current declared type. The input table is not modified.
///
/// ```rust
/// use tabular_engine::processing::{clean, CleaningOptions};
/// use tabular_engine::types::{CellValue, Column, ColumnType, ColumnTypes, Row, Table};
///
/// let table = Table::new(
///     vec![Column::new("price", ColumnType::Text)],
///     vec![Row::from([("price", CellValue::text("$1,234.50"))])],
/// );
/// let types = ColumnTypes::from_table(&table).with("price", ColumnType::Number);
/// let out = clean(&table, &types, &CleaningOptions::default());
///
/// assert_eq!(out.table.rows[0].get("price"), Some(&CellValue::Number(1234.5)));
/// assert_eq!(out.report.formatting_fixed, 1);
/// ```
pub fn clean(table: &Table, types: &ColumnTypes, options: &CleaningOptions) -> CleaningOutcome {
    let start = Instant::now();
    options.emit(ProcessingEvent::CleaningStarted {
        rows: table.row_count(),
        columns: table.column_count(),
    });

    let columns: Vec<Column> = table
        .columns
        .iter()
        .map(|c| Column::new(c.name.clone(), types.get(&c.name).unwrap_or(c.declared_type)))
        .collect();
    let today = options.today.unwrap_or_else(|| Utc::now().date_naive());

    let mut report = RepairReport::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(table.row_count());
    let mut rows: Vec<Row> = Vec::with_capacity(table.row_count());

    for (row_idx, row) in table.rows.iter().enumerate() {
        if !seen.insert(canonical_row_key(row)) {
            report.duplicates_removed += 1;
            options.emit(ProcessingEvent::DuplicateRemoved { row: row_idx });
            continue;
        }

        let mut out = Row::with_capacity(columns.len());
        for column in &columns {
            let (value, repair) = repair_cell(row.get(&column.name), column.declared_type, today, options);
            match repair {
                Repair::Unchanged => {}
                Repair::Formatted => report.formatting_fixed += 1,
                Repair::NullFilled => report.nulls_fixed += 1,
                Repair::Unconverted => {
                    options.emit(ProcessingEvent::CellUnconverted {
                        row: row_idx,
                        column: column.name.clone(),
                        declared_type: column.declared_type,
                        value: value.clone(),
                    });
                    report.unconverted.push(UnconvertedCell {
                        row: row_idx,
                        column: column.name.clone(),
                        declared_type: column.declared_type,
                        value: value.clone(),
                    });
                }
            }
            out.insert(column.name.clone(), value);
        }
        rows.push(out);
    }

    options.emit(ProcessingEvent::CleaningFinished {
        rows: rows.len(),
        duplicates_removed: report.duplicates_removed,
        formatting_fixed: report.formatting_fixed,
        nulls_fixed: report.nulls_fixed,
        elapsed: start.elapsed(),
    });

    CleaningOutcome {
        table: Table::new(columns, rows),
        report,
    }
}

fn repair_cell(
    cell: Option<&CellValue>,
    declared_type: ColumnType,
    today: NaiveDate,
    options: &CleaningOptions,
) -> (CellValue, Repair) {
    let value = match cell {
        // An empty string is already the `Text` default.
        Some(CellValue::Text(s)) if s.is_empty() && declared_type == ColumnType::Text => {
            return (CellValue::Text(String::new()), Repair::Unchanged);
        }
        Some(v) if !v.is_blank() => v,
        _ => {
            let filled = match declared_type {
                ColumnType::Number => CellValue::Number(0.0),
                ColumnType::Date => CellValue::Date(today),
                ColumnType::Text => CellValue::Text(String::new()),
            };
            return (filled, Repair::NullFilled);
        }
    };

    match (declared_type, value) {
        (ColumnType::Number, CellValue::Text(s)) => match parse_loose_number(s) {
            Some(n) => (CellValue::Number(n), Repair::Formatted),
            None => (value.clone(), Repair::Unconverted),
        },
        (ColumnType::Number, CellValue::Number(_)) => (value.clone(), Repair::Unchanged),
        (ColumnType::Date, CellValue::Text(s)) => match options.parse_date(s) {
            Some(d) => (CellValue::Date(d), Repair::Formatted),
            None => (value.clone(), Repair::Unconverted),
        },
        (ColumnType::Date, CellValue::Date(_)) => (value.clone(), Repair::Unchanged),
        (ColumnType::Text, CellValue::Text(_)) => (value.clone(), Repair::Unchanged),
        (ColumnType::Text, other) => (CellValue::Text(other.to_string()), Repair::Formatted),
        // Number in a Date column or Date in a Number column: no coercion is defined.
        _ => (value.clone(), Repair::Unconverted),
    }
}

/// Keep only `0-9`, `.` and `-`, then read the longest numeric prefix (`-?digits[.digits]`).
///
/// `"$1,234.50"` reads as `1234.5`; `"1.2.3"` as `1.2`; `"--5"` and `"abc"` as nothing.
fn parse_loose_number(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let bytes = stripped.as_bytes();

    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - (end + 1);
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }
    stripped[..end].parse::<f64>().ok()
}

/// Order-preserving encoding of every `(column, value)` pair on the row.
fn canonical_row_key(row: &Row) -> String {
    let cells: Vec<serde_json::Value> = row
        .iter()
        .map(|(name, value)| {
            let (tag, payload) = match value {
                CellValue::Null => ("null", serde_json::Value::Null),
                // -0.0 and 0.0 are the same value. Debug text keeps NaN and the infinities apart.
                CellValue::Number(v) => ("number", serde_json::Value::from(format!("{:?}", if *v == 0.0 { 0.0 } else { *v }))),
                CellValue::Text(s) => ("text", serde_json::Value::from(s.as_str())),
                CellValue::Date(d) => ("date", serde_json::Value::from(d.format("%Y-%m-%d").to_string())),
            };
            serde_json::json!([name, tag, payload])
        })
        .collect();
    serde_json::Value::Array(cells).to_string()
}

/// Suggest a declared type per column from its contents.
///
/// A column whose non-empty cells are all numeric is `Number`; one whose non-empty cells are all
/// dates (or date text) is `Date`; anything else is `Text`. Columns without any non-empty cell
/// keep their current declared type.
pub fn suggest_column_types(table: &Table) -> ColumnTypes {
    let options = CleaningOptions::default();
    let mut types = ColumnTypes::new();
    for column in &table.columns {
        let values: Vec<&CellValue> = table
            .rows
            .iter()
            .filter_map(|row| row.get(&column.name))
            .filter(|v| !v.is_blank())
            .collect();

        let suggested = if values.is_empty() {
            column.declared_type
        } else if values.iter().all(|v| v.as_number().is_some()) {
            ColumnType::Number
        } else if values.iter().all(|v| match v {
            CellValue::Date(_) => true,
            CellValue::Text(s) => options.parse_date(s).is_some(),
            _ => false,
        }) {
            ColumnType::Date
        } else {
            ColumnType::Text
        };
        types.set(column.name.clone(), suggested);
    }
    types
}
