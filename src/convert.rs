//! Conversions between the structured-text formats and the compact format.
//!
//! A [`Converter`] pairs the injected codec with a token counter, so every
//! conversion also reports how many tokens it saved. The verbose side is
//! always the baseline: for [`to_compact`](Converter::to_compact) that is the
//! input, for [`from_compact`](Converter::from_compact) it is the output.
//!
//! CSV rows are wrapped as `{"data": [...]}` before encoding (see
//! [`Format::parse_for_encoding`]), the same way a batch encodes them. Decoding to
//! CSV accepts either an array of records or a record whose first
//! array-of-records field holds the rows.

use crate::{
    compare_counts, ComparisonResult, DecodeOptions, Decoder, Document, EncodeOptions, Encoder,
    Error, Format, Rate, Result, TokenCounter, Value,
};

/// Result of one conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub output: String,
    pub comparison: ComparisonResult,
}

/// Converts between a structured-text format and the compact format.
pub struct Converter<'a, K: ?Sized, C: ?Sized> {
    codec: &'a K,
    counter: &'a C,
    rate: Rate,
    encode_options: EncodeOptions,
    decode_options: DecodeOptions,
}

impl<'a, K: ?Sized, C: TokenCounter + ?Sized> Converter<'a, K, C> {
    pub fn new(codec: &'a K, counter: &'a C, rate: Rate) -> Self {
        Converter {
            codec,
            counter,
            rate,
            encode_options: EncodeOptions::default(),
            decode_options: DecodeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_encode_options(mut self, options: EncodeOptions) -> Self {
        self.encode_options = options;
        self
    }

    #[must_use]
    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    fn finish(&self, verbose: &str, compact: &str, output: String) -> Conversion {
        Conversion {
            comparison: compare_counts(
                self.counter.count(verbose),
                self.counter.count(compact),
                self.rate,
            ),
            output,
        }
    }
}

impl<'a, K: Encoder + ?Sized, C: TokenCounter + ?Sized> Converter<'a, K, C> {
    /// Parses `text` as `format` and encodes it. Blank input gives blank output.
    pub fn to_compact(&self, format: Format, text: &str) -> Result<Conversion> {
        if text.trim().is_empty() {
            return Ok(self.finish("", "", String::new()));
        }

        let value = format.parse_for_encoding(text)?;
        let output = self.codec.encode(&value, &self.encode_options)?;
        Ok(self.finish(text, &output, output.clone()))
    }
}

impl<'a, K: Decoder + ?Sized, C: TokenCounter + ?Sized> Converter<'a, K, C> {
    /// Decodes compact `text` and writes it as `format`.
    pub fn from_compact(&self, format: Format, text: &str) -> Result<Conversion> {
        if text.trim().is_empty() {
            return Ok(self.finish("", "", String::new()));
        }

        let value = self.codec.decode(text, &self.decode_options)?;
        let output = match format {
            Format::Csv => {
                let document = Document::classify(value);
                let rows = document.tabular_records().ok_or_else(|| {
                    Error::unsupported_shape("No array data found to convert to CSV")
                })?;
                let table = Value::Array(rows.into_iter().cloned().map(Value::Object).collect());
                format.serialize(&table)?
            }
            _ => format.serialize(&value)?,
        };

        Ok(self.finish(&output, text, output.clone()))
    }
}
