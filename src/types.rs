//! Core data model types.
//!
//! Every engine operation consumes and produces a [`Table`]: an ordered list of [`Column`]s plus
//! an ordered list of [`Row`]s holding typed [`CellValue`]s.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Declared scalar type of a column.
///
/// This is a label assigned at ingestion (or by the user) and is only enforced on cell values by
/// the cleaning engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// UTF-8 text (the ingestion default).
    #[default]
    Text,
    /// 64-bit floating point number.
    Number,
    /// Calendar date without a time component.
    Date,
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    /// Missing value.
    Null,
    /// 64-bit float.
    Number(f64),
    /// UTF-8 string.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    /// Shorthand for `CellValue::Text(s.into())`.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Null` and for empty text, the two shapes a spreadsheet blank takes.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns `true` for [`CellValue::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Numeric view of the cell.
    ///
    /// `Number` cells yield their value; `Text` cells yield a value only when the trimmed text
    /// parses as a finite `f64` in full. Everything else (and NaN/infinite values) yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Text(s) => parse_number_text(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Formats a number the way a spreadsheet shows it: integral values without a fractional part.
pub(crate) fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        (v as i64).to_string()
    } else {
        v.to_string()
    }
}

fn parse_number_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A single named column with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name, unique within a [`Table`].
    pub name: String,
    /// Declared type the cleaning engine coerces toward.
    pub declared_type: ColumnType,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, declared_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// One record of a [`Table`]: an ordered mapping from column name to [`CellValue`].
///
/// Insertion order is preserved. Writing a name that is already present overwrites its value in
/// place. Rows may omit columns (sparse source data) until the table is cleaned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, CellValue)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value stored under `column`, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the row holds a value (possibly `Null`) for `column`.
    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    /// Store `value` under `column`, returning the previous value if one was overwritten.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) -> Option<CellValue> {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((column, value));
                None
            }
        }
    }

    /// Number of cells present on this row.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl<K: Into<String>, const N: usize> From<[(K, CellValue); N]> for Row {
    fn from(cells: [(K, CellValue); N]) -> Self {
        cells.into_iter().collect()
    }
}

/// In-memory table: ordered columns plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Columns in first-seen order.
    pub columns: Vec<Column>,
    /// Rows in source order (merge emits key-group order).
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn require_column(&self, name: &str) -> EngineResult<&Column> {
        self.column(name).ok_or_else(|| EngineError::UnknownColumn {
            column: name.to_string(),
        })
    }

    /// Lazily iterate the values of one column in row order.
    ///
    /// Rows that do not carry the column yield [`CellValue::Null`]. The returned iterator is
    /// `Clone`, so it can be restarted by cloning it before consumption.
    pub fn column_values(&self, column: &str) -> EngineResult<ColumnValues<'_>> {
        let column = self.require_column(column)?;
        Ok(ColumnValues {
            rows: self.rows.iter(),
            column: column.name.as_str(),
        })
    }

    /// Numeric values of one column, in row order.
    ///
    /// Keeps `Number` cells and text cells that parse as a number in full (see
    /// [`CellValue::as_number`]); every other cell is skipped.
    pub fn as_numbers(&self, column: &str) -> EngineResult<Vec<f64>> {
        Ok(self
            .column_values(column)?
            .filter_map(CellValue::as_number)
            .collect())
    }
}

/// Iterator returned by [`Table::column_values`].
#[derive(Debug, Clone)]
pub struct ColumnValues<'a> {
    rows: std::slice::Iter<'a, Row>,
    column: &'a str,
}

impl<'a> Iterator for ColumnValues<'a> {
    type Item = &'a CellValue;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        self.rows
            .next()
            .map(|row| row.get(column).unwrap_or(&NULL_CELL))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for ColumnValues<'_> {}

/// Per-column declared type assignment, in column order.
///
/// This is the user-editable input of [`crate::processing::clean()`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypes {
    entries: Vec<(String, ColumnType)>,
}

impl ColumnTypes {
    /// Create an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the declared types currently on `table`.
    pub fn from_table(table: &Table) -> Self {
        Self {
            entries: table
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.declared_type))
                .collect(),
        }
    }

    /// Assign `column_type` to `column`, replacing any previous assignment.
    pub fn set(&mut self, column: impl Into<String>, column_type: ColumnType) -> &mut Self {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = column_type,
            None => self.entries.push((column, column_type)),
        }
        self
    }

    /// Builder-style variant of [`Self::set`].
    pub fn with(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.set(column, column_type);
        self
    }

    /// Returns the type assigned to `column`, if any.
    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, t)| *t)
    }

    /// Iterate `(column, type)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.entries.iter().map(|(name, t)| (name.as_str(), *t))
    }
}
