//! Export of finished tables (cleaned or merged) back into spreadsheet formats.
//!
//! Cells are written in column order. Absent and `Null` cells become empty fields, numbers use the
//! same display rule as the cleaning engine's text coercion, and dates are written as ISO text.

use std::io::Write;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::types::{CellValue, Table};

/// Write `table` as CSV (header row first) to `writer`.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> EngineResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.column_names())?;
    for row in &table.rows {
        wtr.write_record(
            table
                .columns
                .iter()
                .map(|c| row.get(&c.name).map(CellValue::to_string).unwrap_or_default()),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `table` as a CSV file at `path`.
pub fn export_csv_to_path(table: &Table, path: impl AsRef<Path>) -> EngineResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(table, file)
}

/// Render `table` as a JSON array of objects (keys in column order).
///
/// Absent cells are left out of their object; `Null` cells become `null`.
pub fn to_json_records(table: &Table) -> serde_json::Value {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for column in &table.columns {
                if let Some(value) = row.get(&column.name) {
                    obj.insert(column.name.clone(), cell_to_json(value));
                }
            }
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn cell_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Number(v) => serde_json::Value::from(*v),
        CellValue::Text(s) => serde_json::Value::from(s.as_str()),
        CellValue::Date(_) => serde_json::Value::from(value.to_string()),
    }
}

/// Write `table` to a single-sheet `.xlsx` workbook (cargo feature `xlsx`).
#[cfg(feature = "xlsx")]
pub fn export_xlsx_to_path(table: &Table, path: impl AsRef<Path>, sheet_name: &str) -> EngineResult<()> {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet_name)?;

    for (col, column) in table.columns.iter().enumerate() {
        let col = xlsx_coordinate::<u16>(col, "column")?;
        ws.write_string(0, col, &column.name)?;
        for (idx0, row) in table.rows.iter().enumerate() {
            let r = xlsx_coordinate::<u32>(idx0 + 1, "row")?;
            match row.get(&column.name) {
                None | Some(CellValue::Null) => {}
                Some(CellValue::Number(v)) => {
                    ws.write_number(r, col, *v)?;
                }
                Some(CellValue::Text(s)) => {
                    ws.write_string(r, col, s)?;
                }
                Some(date @ CellValue::Date(_)) => {
                    ws.write_string(r, col, date.to_string())?;
                }
            }
        }
    }

    wb.save(path)?;
    Ok(())
}

/// Convert a zero-based position into a worksheet coordinate, refusing positions that would wrap.
#[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
fn xlsx_coordinate<T: TryFrom<usize>>(position: usize, axis: &str) -> EngineResult<T> {
    T::try_from(position).map_err(|_| EngineError::Format {
        message: format!("{axis} {position} does not fit in an xlsx worksheet"),
    })
}
