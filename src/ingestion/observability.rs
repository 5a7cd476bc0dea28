//! Ingestion outcome reporting.
//!
//! [`super::unified`] reports every attempt to an optional [`IngestionObserver`]. The bundled
//! observers ([`StdErrObserver`], [`FileObserver`]) share one line format built by
//! [`IngestionContext::log_line`], so stderr and the log file always agree.

use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EngineError;
use crate::types::{ColumnType, Table};

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    /// Nothing to ingest, but nothing broken either (e.g. a header-only upload).
    Warning,
    /// The input could not be decoded.
    Error,
    /// The source could not be read at all.
    Critical,
}

impl IngestionSeverity {
    /// Classify an ingestion failure.
    pub fn for_error(error: &EngineError) -> Self {
        match error {
            EngineError::Io(_) => Self::Critical,
            EngineError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            EngineError::Json(err) if err.is_io() => Self::Critical,
            EngineError::EmptyInput => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// What was being ingested, and how.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The file path (or uploaded file name) being ingested.
    pub source: PathBuf,
    pub format: IngestionFormat,
    /// Sheet requested from a workbook; `None` for the first sheet and for non-workbook formats.
    pub sheet: Option<String>,
    /// Declared type given to every discovered column.
    pub default_column_type: ColumnType,
}

/// Shape of a freshly ingested table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows: usize,
    /// Columns discovered from the header (the first record).
    pub columns: usize,
    /// Rows missing at least one of those columns; cleaning will fill them.
    pub sparse_rows: usize,
}

impl IngestionStats {
    /// Measure `table`.
    pub fn of(table: &Table) -> Self {
        let sparse_rows = table
            .rows
            .iter()
            .filter(|row| table.columns.iter().any(|c| !row.contains(&c.name)))
            .count();
        Self {
            rows: table.row_count(),
            columns: table.column_count(),
            sparse_rows,
        }
    }
}

/// Observer interface for ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &EngineError) {}

    /// Called after `on_failure` when the severity meets the configured alert threshold.
    ///
    /// Forwards to [`Self::on_failure`] unless overridden.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// One reportable ingestion outcome.
#[derive(Debug, Clone, Copy)]
pub enum IngestionEntry<'a> {
    Ok(IngestionStats),
    Failed(IngestionSeverity, &'a EngineError),
    Alert(IngestionSeverity, &'a EngineError),
}

impl IngestionContext {
    /// Render `entry` as a single `key=value` log line (without a timestamp).
    ///
    /// ```text
    /// ok format=Csv source=people.csv default_type=Text rows=4 columns=4 sparse_rows=3
    /// fail severity=Warning format=Csv source=empty.csv default_type=Text err=... hint=...
    /// ```
    pub fn log_line(&self, entry: IngestionEntry<'_>) -> String {
        let (tag, severity, error) = match entry {
            IngestionEntry::Ok(_) => ("ok", None, None),
            IngestionEntry::Failed(sev, err) => ("fail", Some(sev), Some(err)),
            IngestionEntry::Alert(sev, err) => ("ALERT", Some(sev), Some(err)),
        };

        let mut line = String::from(tag);
        if let Some(sev) = severity {
            let _ = write!(line, " severity={sev:?}");
        }
        let _ = write!(line, " format={:?} source={}", self.format, self.source.display());
        if let Some(sheet) = &self.sheet {
            let _ = write!(line, " sheet={sheet}");
        }
        let _ = write!(line, " default_type={:?}", self.default_column_type);

        match (entry, error) {
            (IngestionEntry::Ok(stats), _) => {
                let _ = write!(
                    line,
                    " rows={} columns={} sparse_rows={}",
                    stats.rows, stats.columns, stats.sparse_rows
                );
            }
            (_, Some(err)) => {
                let _ = write!(line, " err={err}");
                if matches!(err, EngineError::EmptyInput) {
                    line.push_str(" hint=no data rows below the header");
                }
            }
            (_, None) => {}
        }
        line
    }
}

/// Fans every callback out to a list of observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn IngestionObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Logs ingestion outcomes to stderr, prefixed with `[ingest]`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[ingest] {}", ctx.log_line(IngestionEntry::Ok(stats)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        eprintln!("[ingest] {}", ctx.log_line(IngestionEntry::Failed(severity, error)));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        eprintln!("[ingest] {}", ctx.log_line(IngestionEntry::Alert(severity, error)));
    }
}

/// Appends timestamped ingestion outcomes to a log file.
///
/// Writes are best-effort; a log file that cannot be opened or written is ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, ctx: &IngestionContext, entry: IngestionEntry<'_>) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{ts} {}", ctx.log_line(entry));
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(ctx, IngestionEntry::Ok(stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        self.append(ctx, IngestionEntry::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EngineError) {
        self.append(ctx, IngestionEntry::Alert(severity, error));
    }
}
