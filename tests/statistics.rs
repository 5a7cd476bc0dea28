use chrono::NaiveDate;
use tabular_engine::ingestion::{ingest_from_path, IngestionOptions};
use tabular_engine::processing::{
    chart_series, clean, column_statistics, describe, CleaningOptions, Statistics,
};
use tabular_engine::types::{ColumnType, ColumnTypes};
use tabular_engine::EngineError;

#[test]
fn summary_bounds_hold_for_mixed_values() {
    let samples: [&[f64]; 4] = [
        &[3.5],
        &[-2.0, 10.0, 4.25, 4.25],
        &[1e9, -1e9, 0.0, 12.0, 7.0],
        &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
    ];
    for values in samples {
        let stats = describe(values);
        assert_eq!(stats.count, values.len());
        assert!(stats.min <= stats.median && stats.median <= stats.max, "{stats:?}");
        assert!(stats.min <= stats.mean && stats.mean <= stats.max, "{stats:?}");
        assert!(stats.standard_deviation >= 0.0);
        assert!(!stats.mode.is_empty());
        assert!(stats.mode.iter().all(|m| values.contains(m)));
    }
}

#[test]
fn tied_modes_are_all_reported() {
    let stats = describe(&[1.0, 1.0, 2.0, 2.0, 3.0]);
    assert_eq!(stats.mode, vec![1.0, 2.0]);
    assert_eq!(stats.mean, 1.8);
    assert_eq!(stats.median, 2.0);
}

#[test]
fn empty_input_yields_zeroed_statistics() {
    let stats = describe(&[]);
    assert_eq!(stats, Statistics::zeroed());
    assert_eq!(stats.mode, vec![0.0]);
    assert_eq!(stats.count, 0);
}

#[test]
fn statistics_of_a_cleaned_fixture_column() {
    let table = ingest_from_path("tests/fixtures/people.csv", &IngestionOptions::default()).unwrap();

    // Before cleaning only Ada's score is numeric; Grace's duplicates are blank, Linus has "n/a".
    let raw = column_statistics(&table, "score").unwrap();
    assert_eq!(raw.count, 1);
    assert_eq!(raw.mean, 98.5);

    let types = ColumnTypes::from_table(&table).with("score", ColumnType::Number);
    let cleaned = clean(
        &table,
        &types,
        &CleaningOptions {
            today: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        },
    );
    let stats = column_statistics(&cleaned.table, "score").unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 98.5);
}

#[test]
fn unknown_column_is_reported() {
    let table = ingest_from_path("tests/fixtures/people.csv", &IngestionOptions::default()).unwrap();
    let err = column_statistics(&table, "salary").unwrap_err();
    assert!(matches!(err, EngineError::UnknownColumn { ref column } if column == "salary"));
}

#[test]
fn chart_series_pairs_labels_with_numbers() {
    let table = ingest_from_path("tests/fixtures/orders.csv", &IngestionOptions::default()).unwrap();
    let series = chart_series(&table, "name", "id").unwrap();
    assert_eq!(series.labels, vec!["Grace", "Ada", "Linus"]);
    assert_eq!(series.values, vec![Some(2.0), Some(1.0), Some(4.0)]);
    assert_eq!(series.len(), 3);
}
