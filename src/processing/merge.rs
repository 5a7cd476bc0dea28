//! Key-based merging of several tables into one.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::types::{CellValue, Column, Row, Table};

use super::events::{ProcessingEvent, ProcessingObserver};

/// A merge input: a table plus the name that identifies its source (usually the file name).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    /// Source name, used as the suffix of colliding column names.
    pub name: String,
    pub table: Table,
}

impl NamedTable {
    /// Create a named merge input.
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

/// Options controlling [`merge_tables_with_report`].
#[derive(Clone, Default)]
pub struct MergeOptions {
    /// Optional observer for processing events.
    pub observer: Option<Arc<dyn ProcessingObserver>>,
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl MergeOptions {
    fn emit(&self, event: ProcessingEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

/// What a merge dropped along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Rows skipped because their merge key was missing or empty.
    pub rows_skipped: usize,
}

/// Result of [`merge_tables_with_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub report: MergeReport,
}

/// Hashable identity of a merge key value.
///
/// Numbers and text are distinct keys (`1` does not match `"1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MergeKey {
    Number(u64),
    Text(String),
    Date(NaiveDate),
}

impl MergeKey {
    fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Null => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(Self::Text(s.clone())),
            CellValue::Number(v) => Some(Self::Number((if *v == 0.0 { 0.0f64 } else { *v }).to_bits())),
            CellValue::Date(d) => Some(Self::Date(*d)),
        }
    }
}

/// Column names present in every source, in the first source's column order.
///
/// These are the valid merge-key choices; the first one is a sensible default.
pub fn common_columns(sources: &[NamedTable]) -> Vec<String> {
    let Some((first, rest)) = sources.split_first() else {
        return Vec::new();
    };
    first
        .table
        .column_names()
        .filter(|name| rest.iter().all(|s| s.table.column(name).is_some()))
        .map(str::to_string)
        .collect()
}

/// Merge `sources` on `merge_column`. See [`merge_tables_with_report`].
pub fn merge_tables(sources: &[NamedTable], merge_column: &str) -> EngineResult<Table> {
    merge_tables_with_report(sources, merge_column, &MergeOptions::default()).map(|o| o.table)
}

/// Merge `sources` into one table keyed on `merge_column`.
///
/// - One output row per distinct key value, in first-seen order across sources (then rows).
/// - Rows whose key is missing, null or empty are skipped.
/// - A non-key column whose name also appears in another source is written as
///   `<column>_<source name>`; names unique to one source are kept as-is.
/// - When several rows write the same output column for the same key, the last write wins.
///
/// Fails with [`EngineError::InsufficientSources`] for fewer than two sources and with
/// [`EngineError::MissingKeyColumn`] if a source lacks `merge_column`.
///
/// ```rust
/// use tabular_engine::processing::{merge_tables, NamedTable};
/// use tabular_engine::types::{CellValue, Column, ColumnType, Row, Table};
///
/// let people = |name: &str| {
///     Table::new(
///         vec![Column::new("id", ColumnType::Text), Column::new("name", ColumnType::Text)],
///         vec![Row::from([("id", CellValue::Number(1.0)), ("name", CellValue::text(name))])],
///     )
/// };
/// let merged = merge_tables(
///     &[NamedTable::new("A", people("Ada")), NamedTable::new("B", people("Grace"))],
///     "id",
/// )
/// .unwrap();
///
/// assert_eq!(merged.column_names().collect::<Vec<_>>(), vec!["id", "name_A", "name_B"]);
/// ```
pub fn merge_tables_with_report(
    sources: &[NamedTable],
    merge_column: &str,
    options: &MergeOptions,
) -> EngineResult<MergeOutcome> {
    if sources.len() < 2 {
        return Err(EngineError::InsufficientSources {
            provided: sources.len(),
        });
    }
    if let Some(missing) = sources.iter().find(|s| s.table.column(merge_column).is_none()) {
        return Err(EngineError::MissingKeyColumn {
            column: merge_column.to_string(),
            source_name: missing.name.clone(),
        });
    }

    let start = Instant::now();
    options.emit(ProcessingEvent::MergeStarted {
        sources: sources.len(),
        merge_column: merge_column.to_string(),
    });

    let mut columns: Vec<Column> = Vec::new();
    let mut column_names: HashSet<String> = HashSet::new();
    let mut key_index: HashMap<MergeKey, usize> = HashMap::new();
    let mut rows: Vec<Row> = Vec::new();
    let mut report = MergeReport::default();

    for (source_idx, source) in sources.iter().enumerate() {
        let mut collides: HashMap<String, bool> = HashMap::new();

        for (row_idx, row) in source.table.rows.iter().enumerate() {
            let Some(key) = row.get(merge_column).and_then(MergeKey::from_cell) else {
                report.rows_skipped += 1;
                options.emit(ProcessingEvent::MergeRowSkipped {
                    source: source.name.clone(),
                    row: row_idx,
                });
                continue;
            };

            let slot = *key_index.entry(key).or_insert_with(|| {
                rows.push(Row::new());
                rows.len() - 1
            });

            for (name, value) in row.iter() {
                let qualify = name != merge_column
                    && *collides
                        .entry(name.to_string())
                        .or_insert_with(|| in_other_source(sources, source_idx, name));
                let output_name = if qualify {
                    format!("{name}_{}", source.name)
                } else {
                    name.to_string()
                };

                if column_names.insert(output_name.clone()) {
                    let declared_type = source
                        .table
                        .column(name)
                        .map(|c| c.declared_type)
                        .unwrap_or_default();
                    columns.push(Column::new(output_name.clone(), declared_type));
                }
                rows[slot].insert(output_name, value.clone());
            }
        }
    }

    options.emit(ProcessingEvent::MergeFinished {
        rows: rows.len(),
        columns: columns.len(),
        rows_skipped: report.rows_skipped,
        elapsed: start.elapsed(),
    });

    Ok(MergeOutcome {
        table: Table::new(columns, rows),
        report,
    })
}

/// Whether a source other than `idx` declares a column named `name`.
///
/// Only declared columns count; a key that appears on some rows of a source without being one of
/// its columns does not make another source's column collide.
fn in_other_source(sources: &[NamedTable], idx: usize, name: &str) -> bool {
    sources
        .iter()
        .enumerate()
        .any(|(other, s)| other != idx && s.table.column(name).is_some())
}
