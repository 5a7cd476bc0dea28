//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by ingestion. Every
//! operation is synchronous and pure: inputs are never modified, results are new values.
//!
//! - [`describe()`] / [`column_statistics()`]: descriptive statistics
//! - [`clean()`]: deduplication, type coercion and null repair
//! - [`merge_tables()`]: key-based merge of several tables
//! - [`chart_series()`]: x/y extraction for charts
//!
//! Cleaning and merging report swallowed problems through [`ProcessingObserver`].
//!
//! ## Example: ingest → clean → describe
//!
//! ```rust
//! use tabular_engine::ingestion::{ingest_records, RawValue};
//! use tabular_engine::processing::{clean, column_statistics, CleaningOptions};
//! use tabular_engine::types::{ColumnType, ColumnTypes};
//!
//! let records = vec![
//!     vec![("item".to_string(), RawValue::Text("pen".into())), ("price".to_string(), RawValue::Text("$2.50".into()))],
//!     vec![("item".to_string(), RawValue::Text("ink".into())), ("price".to_string(), RawValue::Text("$7.50".into()))],
//!     vec![("item".to_string(), RawValue::Text("ink".into())), ("price".to_string(), RawValue::Text("$7.50".into()))],
//! ];
//! let table = ingest_records(records, ColumnType::Text).unwrap();
//!
//! let types = ColumnTypes::from_table(&table).with("price", ColumnType::Number);
//! let cleaned = clean(&table, &types, &CleaningOptions::default());
//! assert_eq!(cleaned.report.duplicates_removed, 1);
//!
//! let stats = column_statistics(&cleaned.table, "price").unwrap();
//! assert_eq!(stats.mean, 5.0);
//! ```

pub mod chart;
pub mod clean;
pub mod events;
pub mod merge;
pub mod stats;

pub use chart::{chart_series, ChartSeries};
pub use clean::{
    clean, suggest_column_types, CleaningOptions, CleaningOutcome, RepairReport, UnconvertedCell,
};
pub use events::{CollectingObserver, ProcessingEvent, ProcessingObserver, StdErrProcessingObserver};
pub use merge::{
    common_columns, merge_tables, merge_tables_with_report, MergeOptions, MergeOutcome, MergeReport,
    NamedTable,
};
pub use stats::{column_statistics, describe, Statistics};
