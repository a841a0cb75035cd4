//! Write -> read roundtrips through files and buffers

use std::io::Cursor;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rowcsv::{
    quote_field, Column, ColumnType, CsvReader, CsvWriter, FieldValue, FileFormat, LineTerminator,
};

fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("id", ColumnType::Integer),
        Column::new("label", ColumnType::String),
        Column::new("amount", ColumnType::Decimal),
        Column::new("flag", ColumnType::Boolean),
        Column::new("at", ColumnType::DateTime),
    ]
}

fn sample_rows() -> Vec<Vec<FieldValue>> {
    let day = |y, m, d| {
        FieldValue::Timestamp(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    };
    vec![
        vec![
            FieldValue::Int(1),
            FieldValue::text("simple"),
            FieldValue::Decimal(10.25),
            FieldValue::Bool(true),
            day(2023, 5, 17),
        ],
        vec![
            FieldValue::Int(-2),
            FieldValue::text("comma, quote \" and\nnewline"),
            FieldValue::Decimal(-0.5),
            FieldValue::Bool(false),
            FieldValue::Null,
        ],
        vec![
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
            day(1970, 1, 1),
        ],
    ]
}

fn read_all(reader: &mut CsvReader<'_>) -> Vec<Vec<FieldValue>> {
    let mut rows = Vec::new();
    while reader.read().unwrap() {
        rows.push(reader.values().to_vec());
    }
    rows
}

#[test]
fn test_file_roundtrip_with_typed_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typed.csv");
    let format = FileFormat::builder()
        .separator(';')
        .decimal_separator(',')
        .thousands_separator(".")
        .date_format("dd/MM/yyyy")
        .typed_header(true)
        .line_terminator(LineTerminator::CRLF)
        .build()
        .unwrap();

    let mut writer = CsvWriter::new(format.clone());
    writer.open(&path).unwrap();
    writer.write_columns(&sample_columns()).unwrap();
    for row in sample_rows() {
        writer.write_typed_row(&sample_columns(), &row).unwrap();
    }
    writer.close().unwrap();

    // columns come back from the typed header alone
    let mut reader = CsvReader::new(format, Vec::new());
    reader.open(&path).unwrap();
    assert_eq!(reader.columns(), sample_columns().as_slice());
    assert_eq!(read_all(&mut reader), sample_rows());
}

#[test]
fn test_buffer_roundtrip_plain_header() {
    let format = FileFormat::builder()
        .line_terminator(LineTerminator::LF)
        .build()
        .unwrap();
    let mut buffer = Vec::new();
    {
        let mut writer = CsvWriter::new(format.clone());
        writer.open_stream(&mut buffer).unwrap();
        writer.write_columns(&sample_columns()).unwrap();
        for row in sample_rows() {
            writer.write_row(&row).unwrap();
        }
    }

    let mut input = Cursor::new(buffer);
    let mut reader = CsvReader::new(format, sample_columns());
    reader.open_stream(&mut input).unwrap();
    assert_eq!(read_all(&mut reader), sample_rows());
}

#[test]
fn test_writer_output_matches_csv_crate() {
    let format = FileFormat::builder()
        .line_terminator(LineTerminator::LF)
        .build()
        .unwrap();
    let labels = ["plain", "with,comma", "with \"quotes\"", "multi\nline", ""];

    let mut buffer = Vec::new();
    {
        let mut writer = CsvWriter::new(format);
        writer.open_stream(&mut buffer).unwrap();
        writer.write_headers(&["n", "label"]).unwrap();
        for (n, label) in labels.iter().enumerate() {
            writer
                .write_row(&[FieldValue::Int(n as i64), FieldValue::text(*label)])
                .unwrap();
        }
    }

    let mut oracle = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(buffer.as_slice());
    let parsed: Vec<(i64, String)> = oracle
        .records()
        .map(|record| {
            let record = record.unwrap();
            (record[0].parse().unwrap(), record[1].to_string())
        })
        .collect();

    let expected: Vec<(i64, String)> = labels
        .iter()
        .enumerate()
        .map(|(n, label)| (n as i64, label.to_string()))
        .collect();
    assert_eq!(parsed, expected);
}

#[test]
fn test_reader_agrees_with_csv_crate() {
    let text = "a,b,c\n\"x, y\",\"he said \"\"no\"\"\",z\n\"line\nbreak\",2,\"\"\"q\"\n";

    let mut oracle = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let expected: Vec<Vec<String>> = oracle
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();

    let mut input = Cursor::new(text.as_bytes().to_vec());
    let mut reader = CsvReader::new(FileFormat::default(), Vec::new());
    reader.open_stream(&mut input).unwrap();
    let actual: Vec<Vec<String>> = read_all(&mut reader)
        .into_iter()
        .map(|row| row.iter().map(|value| value.to_string()).collect())
        .collect();

    assert_eq!(actual, expected);
}

proptest! {
    #[test]
    fn prop_text_survives_quoting(text in "[a-z,;\"\r\n ]{1,24}") {
        let format = FileFormat::builder()
            .with_header(false)
            .line_terminator(LineTerminator::LF)
            .build()
            .unwrap();
        let line = format!("{}\n", quote_field(&text, ','));

        let mut input = Cursor::new(line.into_bytes());
        let mut reader = CsvReader::new(format, vec![Column::string("value")]);
        reader.open_stream(&mut input).unwrap();

        prop_assert!(reader.read().unwrap());
        prop_assert_eq!(reader.get_str(0), Some(text.as_str()));
        prop_assert!(!reader.read().unwrap());
    }
}
