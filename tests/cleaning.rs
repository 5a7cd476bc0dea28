use std::sync::Arc;

use chrono::NaiveDate;
use tabular_engine::ingestion::{ingest_from_path, IngestionOptions};
use tabular_engine::processing::{clean, CleaningOptions, CollectingObserver, ProcessingEvent};
use tabular_engine::types::{CellValue, Column, ColumnType, ColumnTypes, Row, Table};

fn options() -> CleaningOptions {
    CleaningOptions {
        today: NaiveDate::from_ymd_opt(2024, 6, 30),
        ..Default::default()
    }
}

fn ab_table(rows: Vec<Row>) -> Table {
    Table::new(
        vec![Column::new("a", ColumnType::Number), Column::new("b", ColumnType::Number)],
        rows,
    )
}

#[test]
fn duplicates_are_removed_keeping_first_occurrence() {
    let table = ab_table(vec![
        Row::from([("a", CellValue::Number(1.0)), ("b", CellValue::Number(2.0))]),
        Row::from([("a", CellValue::Number(1.0)), ("b", CellValue::Number(2.0))]),
        Row::from([("a", CellValue::Number(1.0)), ("b", CellValue::Number(3.0))]),
    ]);
    let out = clean(&table, &ColumnTypes::from_table(&table), &options());

    assert_eq!(out.report.duplicates_removed, 1);
    assert_eq!(out.table.row_count(), 2);
    assert_eq!(out.table.rows[1].get("b"), Some(&CellValue::Number(3.0)));
}

#[test]
fn currency_text_becomes_a_number() {
    let table = Table::new(
        vec![Column::new("price", ColumnType::Text)],
        vec![Row::from([("price", CellValue::text("$1,234.50"))])],
    );
    let types = ColumnTypes::from_table(&table).with("price", ColumnType::Number);
    let out = clean(&table, &types, &options());

    assert_eq!(out.table.rows[0].get("price"), Some(&CellValue::Number(1234.50)));
    assert_eq!(out.report.formatting_fixed, 1);
    assert_eq!(out.report.nulls_fixed, 0);
}

#[test]
fn cleaning_leaves_the_input_untouched() {
    let table = ab_table(vec![Row::from([("a", CellValue::text("7"))])]);
    let before = table.clone();
    let _ = clean(&table, &ColumnTypes::from_table(&table), &options());
    assert_eq!(table, before);
}

#[test]
fn cleaned_fixture_is_fully_populated_and_typed() {
    let table = ingest_from_path("tests/fixtures/people.csv", &IngestionOptions::default()).unwrap();
    let types = ColumnTypes::from_table(&table)
        .with("id", ColumnType::Number)
        .with("score", ColumnType::Number)
        .with("joined", ColumnType::Date);
    let out = clean(&table, &types, &options());

    assert_eq!(out.report.duplicates_removed, 1);
    assert_eq!(out.table.row_count(), 3);
    for row in &out.table.rows {
        for column in &out.table.columns {
            assert!(row.contains(&column.name), "row missing {}", column.name);
        }
    }

    let day = |y, m, d| CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
    assert_eq!(out.table.rows[0].get("joined"), Some(&day(2024, 1, 15)));
    assert_eq!(out.table.rows[1].get("joined"), Some(&day(2024, 3, 2)));
    assert_eq!(out.table.rows[1].get("score"), Some(&CellValue::Number(0.0)));
    assert_eq!(out.table.rows[2].get("joined"), Some(&day(2024, 6, 30)));
    assert_eq!(out.table.rows[2].get("score"), Some(&CellValue::text("n/a")));

    // score (Grace), joined (Linus)
    assert_eq!(out.report.nulls_fixed, 2);
    // joined x2 (text dates); name is already text; id/score are already numbers
    assert_eq!(out.report.formatting_fixed, 2);
    assert_eq!(out.report.unconverted.len(), 1);
    assert_eq!(out.report.unconverted[0].row, 3);
}

#[test]
fn cleaning_is_idempotent_on_its_own_output() {
    let table = Table::new(
        vec![
            Column::new("id", ColumnType::Number),
            Column::new("label", ColumnType::Text),
            Column::new("when", ColumnType::Date),
        ],
        vec![
            Row::from([
                ("id", CellValue::text("#1")),
                ("label", CellValue::Number(5.0)),
                ("when", CellValue::text("2024-02-29")),
            ]),
            Row::from([("id", CellValue::text("#1"))]),
            Row::from([("id", CellValue::text("#1"))]),
            Row::from([("id", CellValue::text("unknown")), ("label", CellValue::Null)]),
        ],
    );
    let types = ColumnTypes::from_table(&table);

    let first = clean(&table, &types, &options());
    let second = clean(&first.table, &types, &options());

    assert_eq!(second.report.duplicates_removed, 0);
    assert_eq!(second.report.formatting_fixed, 0);
    assert_eq!(second.report.nulls_fixed, 0);
    assert_eq!(second.table, first.table);
}

#[test]
fn observer_sees_duplicates_and_unconverted_cells() {
    let observer = Arc::new(CollectingObserver::new());
    let opts = CleaningOptions {
        observer: Some(observer.clone()),
        ..options()
    };
    let table = ab_table(vec![
        Row::from([("a", CellValue::text("x")), ("b", CellValue::Number(1.0))]),
        Row::from([("a", CellValue::text("x")), ("b", CellValue::Number(1.0))]),
    ]);
    let _ = clean(&table, &ColumnTypes::from_table(&table), &opts);

    let events = observer.events();
    assert!(matches!(events[0], ProcessingEvent::CleaningStarted { rows: 2, columns: 2 }));
    assert!(events.contains(&ProcessingEvent::DuplicateRemoved { row: 1 }));
    assert!(events.contains(&ProcessingEvent::CellUnconverted {
        row: 0,
        column: "a".to_string(),
        declared_type: ColumnType::Number,
        value: CellValue::text("x"),
    }));
    assert!(matches!(
        events.last(),
        Some(ProcessingEvent::CleaningFinished { rows: 1, duplicates_removed: 1, .. })
    ));
}
