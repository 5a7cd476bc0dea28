//! `tabular-engine` is the table engine behind a suite of spreadsheet utilities. It turns an
//! uploaded spreadsheet/CSV into an in-memory [`types::Table`] and applies three transformations
//! to it: descriptive statistics, cleaning, and multi-source merging.
//!
//! ## What you can ingest
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Excel/workbooks** (requires the Cargo feature `excel`): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//!
//! Column names come from the header (the first record's keys); every column starts out declared
//! as [`types::ColumnType::Text`] unless [`ingestion::IngestionOptions::default_column_type`] says
//! otherwise. Cells are typed [`types::CellValue`]s: `Number`, `Text`, `Date` or `Null`.
//!
//! ```no_run
//! use tabular_engine::ingestion::{ingest_from_path, IngestionOptions};
//!
//! # fn main() -> Result<(), tabular_engine::EngineError> {
//! let table = ingest_from_path("sales.csv", &IngestionOptions::default())?;
//! println!("rows={}", table.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the table model
//! - [`ingestion`]: unified ingestion entrypoints and format-specific implementations
//! - [`processing`]: statistics, cleaning, merging and chart series
//! - [`export`]: CSV / JSON / XLSX writers for finished tables
//! - [`error`]: the error type shared by every entry point
//!
//! ## Cleaning and merging
//!
//! ```rust
//! use tabular_engine::processing::{clean, merge_tables, CleaningOptions, NamedTable};
//! use tabular_engine::types::{CellValue, Column, ColumnType, ColumnTypes, Row, Table};
//!
//! let orders = Table::new(
//!     vec![Column::new("id", ColumnType::Text), Column::new("total", ColumnType::Text)],
//!     vec![
//!         Row::from([("id", CellValue::text("A1")), ("total", CellValue::text("$10"))]),
//!         Row::from([("id", CellValue::text("A1")), ("total", CellValue::text("$10"))]),
//!     ],
//! );
//! let types = ColumnTypes::from_table(&orders).with("total", ColumnType::Number);
//! let cleaned = clean(&orders, &types, &CleaningOptions::default());
//! assert_eq!(cleaned.table.row_count(), 1);
//!
//! let customers = Table::new(
//!     vec![Column::new("id", ColumnType::Text), Column::new("customer", ColumnType::Text)],
//!     vec![Row::from([("id", CellValue::text("A1")), ("customer", CellValue::text("Ada"))])],
//! );
//! let merged = merge_tables(
//!     &[NamedTable::new("orders.csv", cleaned.table), NamedTable::new("customers.csv", customers)],
//!     "id",
//! )
//! .unwrap();
//! assert_eq!(merged.column_names().collect::<Vec<_>>(), vec!["id", "total", "customer"]);
//! ```

pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{EngineError, EngineResult};
