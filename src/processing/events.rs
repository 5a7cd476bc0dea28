//! Structured events emitted by the cleaning and merge engines.
//!
//! Both engines swallow per-cell and per-row problems (unparsable values, rows without a merge
//! key) instead of failing. Attaching a [`ProcessingObserver`] is how a caller sees them.

use std::sync::Mutex;
use std::time::Duration;

use crate::types::{CellValue, ColumnType};

/// Events emitted while cleaning or merging.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingEvent {
    CleaningStarted {
        rows: usize,
        columns: usize,
    },
    /// Input row `row` repeated an earlier row and was dropped.
    DuplicateRemoved {
        row: usize,
    },
    /// A cell could not be coerced to its column's declared type and was left as-is.
    CellUnconverted {
        row: usize,
        column: String,
        declared_type: ColumnType,
        value: CellValue,
    },
    CleaningFinished {
        rows: usize,
        duplicates_removed: usize,
        formatting_fixed: usize,
        nulls_fixed: usize,
        elapsed: Duration,
    },
    MergeStarted {
        sources: usize,
        merge_column: String,
    },
    /// Row `row` of `source` had no merge key and contributed nothing.
    MergeRowSkipped {
        source: String,
        row: usize,
    },
    MergeFinished {
        rows: usize,
        columns: usize,
        rows_skipped: usize,
        elapsed: Duration,
    },
}

/// Observer hook for processing events.
pub trait ProcessingObserver: Send + Sync {
    fn on_event(&self, event: &ProcessingEvent);
}

/// A simple stderr logger for processing events.
#[derive(Debug, Default)]
pub struct StdErrProcessingObserver;

impl ProcessingObserver for StdErrProcessingObserver {
    fn on_event(&self, event: &ProcessingEvent) {
        eprintln!("[processing] {event:?}");
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<ProcessingEvent>>,
}

impl CollectingObserver {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ProcessingEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProcessingObserver for CollectingObserver {
    fn on_event(&self, event: &ProcessingEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
