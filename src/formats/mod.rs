//! Structured-text formats used as comparison baselines.
//!
//! Each format can parse text into a [`Document`] and serialize a [`Value`]
//! back to text. Parsing is delegated to `serde_json`, `serde_yaml`, `csv` and
//! `quick-xml`. The modules here only adapt those crates to the shared value
//! model and error type.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{Format, Shape};
//!
//! let format = Format::from_path("users.csv").unwrap();
//! assert_eq!(format, Format::Csv);
//!
//! let doc = format.parse("id,name\n1,Alice\n2,Bob\n").unwrap();
//! assert_eq!(doc.shape(), Shape::ArrayOfRecords);
//!
//! let yaml = Format::Yaml.serialize(&doc.into_value()).unwrap();
//! assert!(yaml.starts_with("- id: 1\n  name: Alice\n"));
//! ```

mod csv;
mod json;
mod xml;
mod yaml;

use std::fmt;
use std::path::Path;

use crate::{Document, Map, Result, Value};

/// A structured-text format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Csv,
    Xml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Yaml, Format::Csv, Format::Xml];

    /// Upper-case name used in error messages and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Csv => "CSV",
            Format::Xml => "XML",
        }
    }

    /// Conventional file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Csv => "csv",
            Format::Xml => "xml",
        }
    }

    /// Detects the format from a file name's extension.
    ///
    /// `.txt` is read as JSON, matching how pasted text and dropped text files
    /// are treated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::Format;
    ///
    /// assert_eq!(Format::from_path("data/orders.JSON"), Some(Format::Json));
    /// assert_eq!(Format::from_path("notes.txt"), Some(Format::Json));
    /// assert_eq!(Format::from_path("config.yml"), Some(Format::Yaml));
    /// assert_eq!(Format::from_path("README"), None);
    /// ```
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" | "txt" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "csv" => Some(Format::Csv),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// Parses text into a shape-tagged document.
    pub fn parse(&self, text: &str) -> Result<Document> {
        match self {
            Format::Json => json::parse(text),
            Format::Yaml => yaml::parse(text),
            Format::Csv => csv::parse(text),
            Format::Xml => xml::parse(text),
        }
    }

    /// Parses text into the value handed to the compact encoder.
    ///
    /// CSV rows are wrapped as `{"data": [...]}` so the encoder sees a named
    /// table. Every other format encodes its parsed value as is.
    ///
    /// ```rust
    /// use toon_savings::{value, Format};
    ///
    /// let value = Format::Csv.parse_for_encoding("id\n1\n").unwrap();
    /// assert_eq!(value, value!({"data": [{"id": 1}]}));
    /// ```
    pub fn parse_for_encoding(&self, text: &str) -> Result<Value> {
        let value = match (self, self.parse(text)?) {
            (Format::Csv, Document::ArrayOfRecords(rows)) => {
                let mut wrapped = Map::with_capacity(1);
                wrapped.insert(
                    "data".to_string(),
                    Value::Array(rows.into_iter().map(Value::Object).collect()),
                );
                Value::Object(wrapped)
            }
            (_, document) => document.into_value(),
        };
        Ok(value)
    }

    /// Serializes a value as text in this format.
    pub fn serialize(&self, value: &Value) -> Result<String> {
        match self {
            Format::Json => json::serialize(value),
            Format::Yaml => yaml::serialize(value),
            Format::Csv => csv::serialize(value),
            Format::Xml => xml::serialize(value),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drops the trailing " at line X column Y" that serde-based parsers append,
/// since the position is carried separately.
fn strip_position(msg: &str) -> &str {
    match msg.find(" at line ") {
        Some(idx) => &msg[..idx],
        None => msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_extensions() {
        for format in Format::ALL {
            assert_eq!(Format::from_path(format!("file.{}", format.extension())), Some(format));
            assert_eq!(format.to_string(), format.label());
        }
    }

    #[test]
    fn test_only_csv_is_wrapped_for_encoding() {
        let csv = Format::Csv.parse_for_encoding("id,name\n1,Ann\n").unwrap();
        let rows = csv.get("data").and_then(Value::as_array).unwrap();
        assert_eq!(rows.len(), 1);

        let header_only = Format::Csv.parse_for_encoding("id,name\n").unwrap();
        assert_eq!(header_only.get("data"), Some(&Value::Array(Vec::new())));

        let json = Format::Json.parse_for_encoding("[{\"id\": 1}]").unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_strip_position() {
        assert_eq!(strip_position("expected value at line 1 column 2"), "expected value");
        assert_eq!(strip_position("no position"), "no position");
    }
}
