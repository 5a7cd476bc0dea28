//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`] for files on disk or [`ingest_from_bytes`] for an
//! uploaded buffer. Both produce an in-memory [`crate::types::Table`] whose columns are declared
//! as [`IngestionOptions::default_column_type`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::types::{ColumnType, Table};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Which sheet to read when ingesting a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
}

impl ExcelSheetSelection {
    fn as_name(&self) -> Option<&str> {
        match self {
            Self::First => None,
            Self::Sheet(name) => Some(name.as_str()),
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Declared type given to every discovered column (`Text` by default).
    pub default_column_type: ColumnType,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("default_column_type", &self.default_column_type)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            default_column_type: ColumnType::Text,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for files on disk.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use tabular_engine::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), tabular_engine::EngineError> {
/// let table = ingest_from_path("people.csv", &IngestionOptions::default())?;
/// println!("rows={} columns={}", table.row_count(), table.column_count());
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tabular_engine::ingestion::{
///     ingest_from_path, IngestionOptions, IngestionSeverity, StdErrObserver,
/// };
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = ingest_from_path("does_not_exist.csv", &opts).unwrap_err();
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> EngineResult<Table> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, options.default_column_type),
        IngestionFormat::Json => json::ingest_json_from_path(path, options.default_column_type),
        IngestionFormat::Excel => ingest_excel_dispatch(ExcelSource::Path(path), options),
    };

    report(path, fmt, &result, options);
    result
}

/// Unified ingestion entry point for an in-memory buffer, such as an uploaded file.
///
/// `file_name` is only used to infer the format (when `options.format` is `None`) and to label
/// observer events.
pub fn ingest_from_bytes(
    bytes: &[u8],
    file_name: &str,
    options: &IngestionOptions,
) -> EngineResult<Table> {
    let name = Path::new(file_name);
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(name)?,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_bytes(bytes, options.default_column_type),
        IngestionFormat::Json => std::str::from_utf8(bytes)
            .map_err(|e| EngineError::Format {
                message: format!("json input is not valid utf-8: {e}"),
            })
            .and_then(|text| json::ingest_json_from_str(text, options.default_column_type)),
        IngestionFormat::Excel => ingest_excel_dispatch(ExcelSource::Bytes(bytes), options),
    };

    report(name, fmt, &result, options);
    result
}

/// Convenience wrapper: read the file at `path` and ingest it via [`ingest_from_bytes`].
pub fn ingest_file_contents(path: impl AsRef<Path>, options: &IngestionOptions) -> EngineResult<Table> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
    ingest_from_bytes(&bytes, name, options)
}

fn report(source: &Path, format: IngestionFormat, result: &EngineResult<Table>, options: &IngestionOptions) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };

    let sheet = match format {
        IngestionFormat::Excel => options.excel_sheet_selection.as_name().map(str::to_string),
        IngestionFormat::Csv | IngestionFormat::Json => None,
    };
    let ctx = IngestionContext {
        source: source.to_path_buf(),
        format,
        sheet,
        default_column_type: options.default_column_type,
    };
    match result {
        Ok(table) => obs.on_success(&ctx, IngestionStats::of(table)),
        Err(e) => {
            let sev = IngestionSeverity::for_error(e);
            obs.on_failure(&ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }
    }
}

fn infer_format_from_path(path: &Path) -> EngineResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| EngineError::Format {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| EngineError::Format {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

enum ExcelSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

fn ingest_excel_dispatch(source: ExcelSource<'_>, options: &IngestionOptions) -> EngineResult<Table> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        let sheet = options.excel_sheet_selection.as_name();
        match source {
            ExcelSource::Path(path) => {
                excel::ingest_excel_from_path(path, sheet, options.default_column_type)
            }
            ExcelSource::Bytes(bytes) => {
                excel::ingest_excel_from_bytes(bytes, sheet, options.default_column_type)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        // Avoid unused warnings when the feature is off.
        let _ = (options, matches!(source, ExcelSource::Path(_) | ExcelSource::Bytes(_)));
        Err(EngineError::Format {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_inference_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("xlsx"), Some(IngestionFormat::Excel));
        assert_eq!(IngestionFormat::from_extension("parquet"), None);
    }

    #[test]
    fn bytes_ingestion_uses_file_name_for_format() {
        let table = ingest_from_bytes(
            b"id,name\n1,Ada\n",
            "upload.csv",
            &IngestionOptions::default(),
        )
        .unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let err = ingest_from_bytes(b"", "notes.md", &IngestionOptions::default()).unwrap_err();
        assert!(err.to_string().contains("cannot infer format"));
    }
}
