#![cfg(feature = "excel")]

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::types::{ColumnType, Table};

use super::records::{disambiguate_headers, ingest_records, RawValue, Record};

/// Ingest one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows into sparse records (empty and error cells are left out)
/// - Date/time cells become ISO text so the cleaning engine can parse them
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    default_type: ColumnType,
) -> EngineResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let records = read_sheet_records(&mut workbook, sheet_name)?;
    ingest_records(records, default_type)
}

/// Ingest one sheet of an in-memory workbook (e.g. an uploaded file buffer).
pub fn ingest_excel_from_bytes(
    bytes: &[u8],
    sheet_name: Option<&str>,
    default_type: ColumnType,
) -> EngineResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let records = read_sheet_records(&mut workbook, sheet_name)?;
    ingest_records(records, default_type)
}

fn read_sheet_records<RS>(
    workbook: &mut calamine::Sheets<RS>,
    sheet_name: Option<&str>,
) -> EngineResult<Vec<Record>>
where
    RS: std::io::Read + std::io::Seek,
{
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| EngineError::Format {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(sheet_range_records(&range))
}

fn sheet_range_records(range: &calamine::Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let header_cells = loop {
        match rows.next() {
            Some(row) if row.iter().any(|c| !matches!(c, Data::Empty)) => break row,
            Some(_) => continue,
            // No header row: nothing to ingest.
            None => return Vec::new(),
        }
    };
    let headers = disambiguate_headers(header_cells.iter().map(cell_to_header_string));

    let mut records = Vec::new();
    for row in rows {
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter_map(|(name, cell)| convert_cell(cell).map(|v| (name.clone(), v)))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }
    records
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_iso(dt.as_f64()).unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> Option<RawValue> {
    match c {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(RawValue::Text(s.clone())),
        Data::Int(i) => Some(RawValue::Number(*i as f64)),
        Data::Float(f) => Some(RawValue::Number(*f)),
        Data::Bool(b) => Some(RawValue::Bool(*b)),
        Data::DateTime(dt) => Some(match excel_serial_to_iso(dt.as_f64()) {
            Some(iso) => RawValue::Text(iso),
            None => RawValue::Number(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(RawValue::Text(s.clone())),
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to ISO text.
///
/// Whole days print as `YYYY-MM-DD`; anything with a time part prints as `YYYY-MM-DDTHH:MM:SS`.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    let dt = epoch.checked_add_signed(Duration::try_seconds(seconds)?)?;
    if seconds % 86_400 == 0 {
        Some(dt.format("%Y-%m-%d").to_string())
    } else {
        Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::excel_serial_to_iso;

    #[test]
    fn excel_serials_convert_to_iso_text() {
        assert_eq!(excel_serial_to_iso(45_292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(
            excel_serial_to_iso(45_292.5).as_deref(),
            Some("2024-01-01T12:00:00")
        );
        assert_eq!(excel_serial_to_iso(-1.0), None);
    }
}
