use std::sync::{Arc, Mutex};

use tabular_engine::ingestion::{
    ingest_from_bytes, ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionFormat,
    IngestionObserver, IngestionOptions, IngestionSeverity, IngestionStats,
};
use tabular_engine::types::ColumnType;
use tabular_engine::EngineError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &EngineError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &EngineError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_empty_input() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Error,
        ..Default::default()
    };

    // Header only -> EmptyInput -> Warning, below the alert threshold.
    let _ = ingest_from_bytes(b"id,name\n", "empty.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out_success() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        a.clone() as Arc<dyn IngestionObserver>,
        b.clone() as Arc<dyn IngestionObserver>,
    ]);
    let opts = IngestionOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    ingest_from_path("tests/fixtures/people.csv", &opts).unwrap();

    let expected = vec![IngestionStats {
        rows: 4,
        columns: 4,
        sparse_rows: 3,
    }];
    assert_eq!(*a.successes.lock().unwrap(), expected);
    assert_eq!(*b.successes.lock().unwrap(), expected);
}

#[test]
fn file_observer_appends_lines() {
    let log = std::env::temp_dir().join(format!(
        "tabular-engine-ingest-{}.log",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let opts = IngestionOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };

    ingest_from_path("tests/fixtures/people.csv", &opts).unwrap();
    let _ = ingest_from_path("tests/fixtures/missing.csv", &opts).unwrap_err();
    let _ = ingest_from_bytes(b"id,name\n", "header-only.csv", &opts).unwrap_err();

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains(" ok format=Csv"));
    assert!(lines[0].contains("default_type=Text rows=4 columns=4 sparse_rows=3"));
    assert!(lines[1].contains(" fail severity=Critical"));
    assert!(lines[2].contains(" ALERT severity=Critical"));
    assert!(lines[3].contains(" fail severity=Warning"));
    assert!(lines[3].contains("source=header-only.csv"));
    assert!(lines[3].ends_with("hint=no data rows below the header"));

    let _ = std::fs::remove_file(log);
}

#[test]
fn context_reports_sheet_selection_and_default_type() {
    #[derive(Default)]
    struct ContextRecorder(Mutex<Vec<IngestionContext>>);

    impl IngestionObserver for ContextRecorder {
        fn on_failure(&self, ctx: &IngestionContext, _severity: IngestionSeverity, _error: &EngineError) {
            self.0.lock().unwrap().push(ctx.clone());
        }
    }

    let obs = Arc::new(ContextRecorder::default());
    let opts = IngestionOptions {
        excel_sheet_selection: tabular_engine::ingestion::ExcelSheetSelection::Sheet("Q3".to_string()),
        default_column_type: ColumnType::Number,
        observer: Some(obs.clone()),
        ..Default::default()
    };

    // Fails either way: not a workbook, or excel support not compiled in.
    let _ = ingest_from_bytes(b"not a workbook", "report.xlsx", &opts).unwrap_err();
    let _ = ingest_from_bytes(b"id\n", "ids.csv", &opts).unwrap_err();

    let seen = obs.0.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].format, IngestionFormat::Excel);
    assert_eq!(seen[0].sheet.as_deref(), Some("Q3"));
    assert_eq!(seen[0].default_column_type, ColumnType::Number);
    assert_eq!(seen[1].format, IngestionFormat::Csv);
    assert_eq!(seen[1].sheet, None);
}
