//! CSV ingestion implementation.

use std::path::Path;

use crate::error::EngineResult;
use crate::types::{ColumnType, Table};

use super::records::{classify_text, disambiguate_headers, ingest_records, Record};

/// Ingest a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first row is the header row; blank and repeated headers are disambiguated.
/// - Blank cells are left out of their row (sparse rows); rows with no values are skipped.
/// - Numeric text becomes a number and `true`/`false` a boolean (stored as text).
/// - Every column is declared as `default_type`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, default_type: ColumnType) -> EngineResult<Table> {
    let mut rdr = reader_builder().from_path(path)?;
    ingest_csv_from_reader(&mut rdr, default_type)
}

/// Ingest CSV data held in memory (e.g. an uploaded file buffer).
pub fn ingest_csv_from_bytes(bytes: &[u8], default_type: ColumnType) -> EngineResult<Table> {
    let mut rdr = reader_builder().from_reader(bytes);
    ingest_csv_from_reader(&mut rdr, default_type)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader must be configured with `has_headers(true)`.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    default_type: ColumnType,
) -> EngineResult<Table> {
    let records = read_csv_records(rdr)?;
    ingest_records(records, default_type)
}

/// Decode a CSV reader into sparse [`Record`]s without building a table.
pub fn read_csv_records<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> EngineResult<Vec<Record>> {
    let headers = disambiguate_headers(rdr.headers()?.iter().map(str::to_string));

    let mut records: Vec<Record> = Vec::new();
    for result in rdr.records() {
        let raw = result?;
        let record: Record = headers
            .iter()
            .zip(raw.iter())
            .filter_map(|(name, cell)| classify_text(cell).map(|v| (name.clone(), v)))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }
    Ok(records)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Spreadsheet exports often drop trailing empty fields.
    builder.has_headers(true).flexible(true);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::records::RawValue;

    #[test]
    fn short_rows_and_blank_cells_are_sparse() {
        let input = "id,name,score\n1,,9\n2,Bo\n,,\n";
        let mut rdr = reader_builder().from_reader(input.as_bytes());
        let records = read_csv_records(&mut rdr).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            vec![
                ("id".to_string(), RawValue::Number(1.0)),
                ("score".to_string(), RawValue::Number(9.0)),
            ]
        );
        assert_eq!(
            records[1],
            vec![
                ("id".to_string(), RawValue::Number(2.0)),
                ("name".to_string(), RawValue::Text("Bo".to_string())),
            ]
        );
    }
}
