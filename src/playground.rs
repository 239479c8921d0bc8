//! One value rendered in every format, ranked by token count.
//!
//! [`FormatComparison::build`] takes JSON input and renders it as the compact
//! format, CSV, YAML and XML. A rendering that does not apply (CSV for data
//! that is not tabular) or that fails keeps its error and counts zero tokens,
//! so it never wins [`lowest`](FormatComparison::lowest).

use crate::{
    compare_counts, ComparisonResult, Document, EncodeOptions, Encoder, Error, Format, Rate,
    Result, TokenCount, TokenCounter, Value,
};

/// Label of the compact-format rendering.
pub const COMPACT_LABEL: &str = "TOON";

/// One format's rendering of the input.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendering {
    pub label: &'static str,
    pub output: std::result::Result<String, Error>,
    pub count: TokenCount,
}

impl Rendering {
    fn new<C: TokenCounter + ?Sized>(
        label: &'static str,
        output: std::result::Result<String, Error>,
        counter: &C,
    ) -> Self {
        let count = match &output {
            Ok(text) => counter.count(text),
            Err(_) => TokenCount::default(),
        };
        Rendering {
            label,
            output,
            count,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> usize {
        self.count.tokens
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.output.is_ok()
    }
}

/// Renderings of one JSON input in JSON, TOON, CSV, YAML and XML, in that order.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatComparison {
    renderings: Vec<Rendering>,
}

impl FormatComparison {
    /// Renders `json_text` in every format. Fails only when the input is not JSON.
    pub fn build<E, C>(json_text: &str, encoder: &E, counter: &C) -> Result<Self>
    where
        E: Encoder + ?Sized,
        C: TokenCounter + ?Sized,
    {
        let document = Format::Json.parse(json_text)?;
        let csv = csv_rendering(&document);
        let value = document.into_value();

        let renderings = vec![
            Rendering::new(Format::Json.label(), Ok(json_text.to_string()), counter),
            Rendering::new(
                COMPACT_LABEL,
                encoder.encode(&value, &EncodeOptions::default()),
                counter,
            ),
            Rendering::new(Format::Csv.label(), csv, counter),
            Rendering::new(Format::Yaml.label(), Format::Yaml.serialize(&value), counter),
            Rendering::new(Format::Xml.label(), Format::Xml.serialize(&value), counter),
        ];

        Ok(FormatComparison { renderings })
    }

    #[must_use]
    pub fn renderings(&self) -> &[Rendering] {
        &self.renderings
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Rendering> {
        self.renderings.iter().find(|r| r.label == label)
    }

    /// The rendering with the fewest tokens, ignoring zero counts. Ties go
    /// to the earlier format.
    #[must_use]
    pub fn lowest(&self) -> Option<&Rendering> {
        self.renderings
            .iter()
            .filter(|r| r.tokens() > 0)
            .fold(None, |best: Option<&Rendering>, r| match best {
                Some(b) if b.tokens() <= r.tokens() => Some(b),
                _ => Some(r),
            })
    }

    #[must_use]
    pub fn max_tokens(&self) -> usize {
        self.renderings.iter().map(Rendering::tokens).max().unwrap_or(0)
    }

    /// Token count of `label` as a percentage of the largest count.
    #[must_use]
    pub fn share_of_max(&self, label: &str) -> Option<f64> {
        let rendering = self.get(label)?;
        let max = self.max_tokens();
        if max == 0 {
            return Some(0.0);
        }
        Some(rendering.tokens() as f64 / max as f64 * 100.0)
    }

    /// JSON input against the compact rendering.
    #[must_use]
    pub fn compact_savings(&self, rate: Rate) -> ComparisonResult {
        let count = |label: &str| self.get(label).map(|r| r.count).unwrap_or_default();
        compare_counts(count(Format::Json.label()), count(COMPACT_LABEL), rate)
    }
}

fn csv_rendering(document: &Document) -> std::result::Result<String, Error> {
    let rows = document
        .tabular_records()
        .ok_or_else(|| Error::unsupported_shape("CSV requires array of objects"))?;
    let table = Value::Array(rows.into_iter().cloned().map(Value::Object).collect());
    Format::Csv.serialize(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WhitespaceCounter;

    /// Writes one line per record: the values joined by commas.
    fn rows_encoder(value: &Value, _: &EncodeOptions) -> Result<String> {
        let doc = Document::classify(value.clone());
        let rows = doc
            .tabular_records()
            .ok_or_else(|| Error::encode("not tabular"))?;
        Ok(rows
            .iter()
            .map(|row| {
                row.values()
                    .map(Value::to_plain_text)
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    const USERS: &str = r#"{"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]}"#;

    #[test]
    fn test_renders_every_format() {
        let cmp = FormatComparison::build(USERS, &rows_encoder, &WhitespaceCounter).unwrap();
        let labels: Vec<_> = cmp.renderings().iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["JSON", "TOON", "CSV", "YAML", "XML"]);
        assert!(cmp.renderings().iter().all(Rendering::is_available));

        assert_eq!(cmp.get("TOON").unwrap().output.as_deref(), Ok("1,Alice\n2,Bob"));
        assert_eq!(cmp.get("CSV").unwrap().output.as_deref(), Ok("id,name\n1,Alice\n2,Bob"));
    }

    #[test]
    fn test_lowest_and_share() {
        let cmp = FormatComparison::build(USERS, &rows_encoder, &WhitespaceCounter).unwrap();
        let lowest = cmp.lowest().unwrap();
        assert_eq!(lowest.label, "TOON");
        assert_eq!(lowest.tokens(), 2);
        assert_eq!(cmp.share_of_max("TOON"), Some(2.0 / cmp.max_tokens() as f64 * 100.0));
        assert_eq!(cmp.share_of_max("missing"), None);
    }

    #[test]
    fn test_non_tabular_input() {
        let cmp = FormatComparison::build(r#"{"name": "Alice"}"#, &rows_encoder, &WhitespaceCounter)
            .unwrap();
        let csv = cmp.get("CSV").unwrap();
        assert!(!csv.is_available());
        assert_eq!(csv.tokens(), 0);
        assert_eq!(
            csv.output,
            Err(Error::UnsupportedShape("CSV requires array of objects".into()))
        );
        assert!(!cmp.get("TOON").unwrap().is_available());
        assert_eq!(cmp.lowest().map(|r| r.label), Some("XML"));
    }

    #[test]
    fn test_compact_savings() {
        let cmp = FormatComparison::build(USERS, &rows_encoder, &WhitespaceCounter).unwrap();
        let savings = cmp.compact_savings(Rate::new(1.25).unwrap());
        assert_eq!(savings.baseline_tokens(), 9);
        assert_eq!(savings.compact_tokens(), 2);
        assert_eq!(savings.tokens_saved(), 7);
    }

    #[test]
    fn test_invalid_json() {
        assert!(FormatComparison::build("{", &rows_encoder, &WhitespaceCounter).is_err());
    }
}
