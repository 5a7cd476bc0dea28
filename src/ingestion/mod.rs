//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] or [`ingest_from_bytes`] (from [`unified`]) which:
//!
//! - auto-detect format by file extension (or you can override via [`IngestionOptions`])
//! - decode the input into records and build an in-memory [`crate::types::Table`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Callers that already hold decoded records (e.g. from their own spreadsheet reader) can call
//! [`ingest_records`] directly. Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod records;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionEntry, IngestionObserver, IngestionSeverity,
    IngestionStats, StdErrObserver,
};
pub use records::{ingest_records, RawValue, Record};
pub use unified::{
    ingest_file_contents, ingest_from_bytes, ingest_from_path, ExcelSheetSelection, IngestionFormat,
    IngestionOptions,
};
