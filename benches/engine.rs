use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chrono::NaiveDate;
use tabular_engine::ingestion::ingest_from_bytes;
use tabular_engine::ingestion::IngestionOptions;
use tabular_engine::processing::{clean, describe, merge_tables, CleaningOptions, NamedTable};
use tabular_engine::types::{CellValue, Column, ColumnType, ColumnTypes, Row, Table};

fn messy_table(rows: usize) -> Table {
    let columns = vec![
        Column::new("id", ColumnType::Number),
        Column::new("amount", ColumnType::Number),
        Column::new("joined", ColumnType::Date),
        Column::new("note", ColumnType::Text),
    ];
    let rows = (0..rows)
        .map(|i| {
            // Every tenth row repeats its predecessor.
            let id = if i % 10 == 9 { i - 1 } else { i };
            let mut row = Row::from([
                ("id", CellValue::Number(id as f64)),
                ("amount", CellValue::text(format!("${},{:03}.50", id % 7, id % 1000))),
            ]);
            if id % 3 != 0 {
                row.insert("joined", CellValue::text(format!("{:02}/{:02}/2024", id % 12 + 1, id % 28 + 1)));
            }
            if id % 5 == 0 {
                row.insert("note", CellValue::Number(id as f64));
            }
            row
        })
        .collect();
    Table::new(columns, rows)
}

fn keyed_table(rows: usize, offset: usize, value_column: &str) -> Table {
    Table::new(
        vec![
            Column::new("id", ColumnType::Number),
            Column::new("name", ColumnType::Text),
            Column::new(value_column, ColumnType::Number),
        ],
        (0..rows)
            .map(|i| {
                let key = i + offset;
                Row::from([
                    ("id", CellValue::Number(key as f64)),
                    ("name", CellValue::text(format!("name-{key}"))),
                    (value_column, CellValue::Number(i as f64 * 1.5)),
                ])
            })
            .collect(),
    )
}

fn bench_describe(c: &mut Criterion) {
    let values: Vec<f64> = (0..100_000).map(|i| ((i * 7919) % 1000) as f64 / 4.0).collect();
    c.bench_function("describe 100k values", |b| {
        b.iter(|| black_box(describe(black_box(&values))));
    });
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    let options = CleaningOptions {
        today: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..Default::default()
    };
    for rows in [1_000usize, 10_000] {
        let table = messy_table(rows);
        let types = ColumnTypes::from_table(&table);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| black_box(clean(table, &types, &options)));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let sources = [
        NamedTable::new("a.csv", keyed_table(10_000, 0, "total")),
        NamedTable::new("b.csv", keyed_table(10_000, 5_000, "score")),
        NamedTable::new("c.csv", keyed_table(10_000, 2_500, "total")),
    ];
    c.bench_function("merge 3x10k rows", |b| {
        b.iter(|| black_box(merge_tables(&sources, "id").unwrap()));
    });
}

fn bench_csv_ingestion(c: &mut Criterion) {
    let mut csv = String::from("id,name,amount,joined\n");
    for i in 0..10_000 {
        csv.push_str(&format!("{i},name-{i},{}.25,2024-01-{:02}\n", i % 500, i % 28 + 1));
    }
    let options = IngestionOptions::default();
    c.bench_function("ingest csv 10k rows", |b| {
        b.iter(|| black_box(ingest_from_bytes(csv.as_bytes(), "bench.csv", &options).unwrap()));
    });
}

criterion_group!(benches, bench_describe, bench_clean, bench_merge, bench_csv_ingestion);
criterion_main!(benches);
