//! Descriptive statistics over one numeric column.

use serde::Serialize;

use crate::error::EngineResult;
use crate::types::Table;

/// Summary statistics of a numeric sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Middle value of the sorted sequence (mean of the two middle values for even counts).
    pub median: f64,
    /// Every value attaining the highest frequency, ascending.
    pub mode: Vec<f64>,
    /// Population standard deviation (divides by `count`).
    pub standard_deviation: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Number of values.
    pub count: usize,
}

impl Statistics {
    /// Result for empty input: every field zero and `mode = [0]`.
    pub fn zeroed() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            mode: vec![0.0],
            standard_deviation: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
        }
    }
}

/// Compute [`Statistics`] for `values`.
///
/// Empty input is not an error; it yields [`Statistics::zeroed`].
///
/// ```rust
/// use tabular_engine::processing::describe;
///
/// let stats = describe(&[1.0, 1.0, 2.0, 2.0, 3.0]);
/// assert_eq!(stats.mode, vec![1.0, 2.0]);
/// assert_eq!(stats.median, 2.0);
/// ```
pub fn describe(values: &[f64]) -> Statistics {
    if values.is_empty() {
        return Statistics::zeroed();
    }

    let count = values.len();
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / count as f64;

    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    Statistics {
        mean,
        median,
        mode: modes(&sorted),
        standard_deviation: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        count,
    }
}

/// Compute [`Statistics`] over the numeric cells of `column` (see [`Table::as_numbers`]).
pub fn column_statistics(table: &Table, column: &str) -> EngineResult<Statistics> {
    let values = table.as_numbers(column)?;
    Ok(describe(&values))
}

// Equal values are adjacent in `sorted`, so frequencies are run lengths. `==` groups -0.0 with 0.0.
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        match runs.last_mut() {
            Some((last, n)) if *last == v => *n += 1,
            _ => runs.push((if v == 0.0 { 0.0 } else { v }, 1)),
        }
    }

    let max_freq = runs.iter().map(|(_, n)| *n).max().unwrap_or(0);
    runs.into_iter()
        .filter(|(_, n)| *n == max_freq)
        .map(|(v, _)| v)
        .collect()
}
