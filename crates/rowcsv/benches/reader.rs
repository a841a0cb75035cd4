use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rowcsv::{Column, ColumnType, CsvReader, FileFormat};

fn make_csv(rows: usize) -> Vec<u8> {
    let mut text = String::from("id,name,amount,active,day\n");
    for i in 0..rows {
        let name = if i % 7 == 0 {
            format!("\"Customer, {i} \"\"vip\"\"\"")
        } else {
            format!("customer {i}")
        };
        text.push_str(&format!(
            "{i},{name},{}.{:02},{},2024-{:02}-{:02}\n",
            i * 3,
            i % 100,
            i % 2,
            i % 12 + 1,
            i % 28 + 1
        ));
    }
    text.into_bytes()
}

fn typed_columns() -> Vec<Column> {
    vec![
        Column::new("id", ColumnType::Integer),
        Column::string("name"),
        Column::new("amount", ColumnType::Decimal),
        Column::new("active", ColumnType::Boolean),
        Column::new("day", ColumnType::DateTime),
    ]
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_read");

    for &rows in &[1_000usize, 100_000] {
        let data = make_csv(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("untyped", rows), &data, |b, data| {
            b.iter(|| {
                let mut input = Cursor::new(data.as_slice());
                let mut reader = CsvReader::new(FileFormat::default(), Vec::new());
                reader.open_stream(&mut input).unwrap();
                let mut count = 0u64;
                while reader.read().unwrap() {
                    count += 1;
                }
                black_box(count)
            });
        });

        group.bench_with_input(BenchmarkId::new("typed", rows), &data, |b, data| {
            b.iter(|| {
                let mut input = Cursor::new(data.as_slice());
                let mut reader = CsvReader::new(FileFormat::default(), typed_columns());
                reader.open_stream(&mut input).unwrap();
                let mut total = 0.0;
                while reader.read().unwrap() {
                    total += reader.get_f64(2).unwrap_or_default();
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_read);
criterion_main!(benches);
