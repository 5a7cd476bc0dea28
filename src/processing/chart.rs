//! X/Y series extraction for the charting widget.

use serde::Serialize;

use crate::error::EngineResult;
use crate::types::{CellValue, Table};

/// One chart series: a label per row (from the x column) and a value per row (from the y column).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub x_label: String,
    pub y_label: String,
    /// Display text of each x cell, in row order.
    pub labels: Vec<String>,
    /// Numeric y value per row; `None` where the y cell is not numeric.
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Number of points in the series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build a [`ChartSeries`] with one point per row of `table`.
///
/// Fails with [`crate::EngineError::UnknownColumn`] if either column is missing.
pub fn chart_series(table: &Table, x: &str, y: &str) -> EngineResult<ChartSeries> {
    let labels = table.column_values(x)?.map(CellValue::to_string).collect();
    let values = table.column_values(y)?.map(CellValue::as_number).collect();
    Ok(ChartSeries {
        x_label: x.to_string(),
        y_label: y.to_string(),
        labels,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ColumnType, Row};

    #[test]
    fn one_point_per_row() {
        let table = Table::new(
            vec![Column::new("month", ColumnType::Text), Column::new("sales", ColumnType::Number)],
            vec![
                Row::from([("month", CellValue::text("Jan")), ("sales", CellValue::Number(10.0))]),
                Row::from([("month", CellValue::text("Feb")), ("sales", CellValue::text("12.5"))]),
                Row::from([("month", CellValue::text("Mar"))]),
            ],
        );
        let series = chart_series(&table, "month", "sales").unwrap();
        assert_eq!(series.labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(series.values, vec![Some(10.0), Some(12.5), None]);
        assert_eq!(series.len(), 3);
        assert!(chart_series(&table, "month", "profit").is_err());
    }
}
