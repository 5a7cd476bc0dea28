use thiserror::Error;

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type returned by engine entry points.
///
/// The first four variants are caller-detectable precondition violations. The rest come from the
/// ingestion/export boundary (file access and format decoding). Per-cell problems inside cleaning
/// and merging never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Ingestion was given zero records; no table was produced.
    #[error("empty input: no records to build a table from")]
    EmptyInput,

    /// A column query named a column the table does not have.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Merge was given fewer than two tables.
    #[error("merge needs at least two sources (got {provided})")]
    InsufficientSources { provided: usize },

    /// The merge key column is missing from one of the sources.
    #[error("merge column '{column}' is missing from source '{source_name}'")]
    MissingKeyColumn { column: String, source_name: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding/encoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding/encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "xlsx")]
    /// Excel export error (feature-gated behind `xlsx`).
    #[error("xlsx writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The input is structurally unusable (unsupported extension, non-object JSON rows, ...).
    #[error("format error: {message}")]
    Format { message: String },
}
