//! CSV with a header row.
//!
//! Each data row becomes a record keyed by the header, with fields typed by
//! [`Value::infer`]. Writing takes an array of records and uses the union of
//! their keys, in first-seen order, as the header.

use crate::{Document, Error, Map, Result, Value};

const FORMAT: &str = "CSV";

pub(super) fn parse(text: &str) -> Result<Document> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::parse(FORMAT, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::parse(FORMAT, e))?;
        let row: Map = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), Value::infer(field)))
            .collect();
        rows.push(row);
    }

    // Rows are records by construction, even when there are none.
    Ok(Document::ArrayOfRecords(rows))
}

pub(super) fn serialize(value: &Value) -> Result<String> {
    let rows = match value {
        Value::Array(items) if items.is_empty() => return Ok(String::new()),
        _ => value
            .as_records()
            .ok_or_else(|| Error::unsupported_shape("CSV requires an array of objects"))?,
    };

    let mut columns: Vec<&str> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(&columns)
        .map_err(|e| Error::serialize(FORMAT, e))?;
    for row in &rows {
        let fields = columns
            .iter()
            .map(|column| row.get(column).map(Value::to_plain_text).unwrap_or_default());
        writer
            .write_record(fields)
            .map_err(|e| Error::serialize(FORMAT, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::serialize(FORMAT, e.error()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| Error::serialize(FORMAT, e))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
