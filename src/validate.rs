//! Validation of compact-format text.
//!
//! [`Validator::validate`] decodes with strict options and, when that works,
//! adds advisory [`Warning`]s and a pretty JSON rendering of the decoded value.
//! Warnings never make input invalid.

use std::fmt;

use crate::{DecodeOptions, Decoder, Format, Result, TokenCounter};

const LONG_INPUT_CHARS: usize = 1000;
const LONG_LINE_CHARS: usize = 200;
const TYPE_ANNOTATIONS: [&str; 3] = [":i", ":b", ":f"];

/// Advisory findings on input that decoded successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// Long input whose compact JSON rendering is under half its length.
    LessEfficientThanJson,
    /// Number of lines longer than 200 characters.
    LongLines(usize),
    /// Tabular headers without `:i`, `:b` or `:f` annotations.
    NoTypeAnnotations,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LessEfficientThanJson => {
                f.write_str("TOON format may be less efficient than JSON for this data structure")
            }
            Warning::LongLines(count) => write!(
                f,
                "{} line(s) exceed {} characters - consider breaking them up",
                count, LONG_LINE_CHARS
            ),
            Warning::NoTypeAnnotations => f.write_str(
                "No type annotations found - consider adding :i, :b, or :f for better type safety",
            ),
        }
    }
}

/// Outcome of validating one input.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
    pub warnings: Vec<Warning>,
    /// Decoded value as pretty JSON, when valid.
    pub formatted: Option<String>,
    /// Token count of the input.
    pub tokens: usize,
}

/// Validates compact-format text with an injected decoder.
pub struct Validator<'a, D: ?Sized, C: ?Sized> {
    decoder: &'a D,
    counter: &'a C,
    options: DecodeOptions,
}

impl<'a, D: Decoder + ?Sized, C: TokenCounter + ?Sized> Validator<'a, D, C> {
    pub fn new(decoder: &'a D, counter: &'a C) -> Self {
        Validator {
            decoder,
            counter,
            options: DecodeOptions::strict(),
        }
    }

    pub fn validate(&self, text: &str) -> Validation {
        let tokens = self.counter.count(text).tokens;
        if text.trim().is_empty() {
            return Validation {
                error: Some("Input is empty".to_string()),
                tokens,
                ..Default::default()
            };
        }

        let value = match self.decoder.decode(text, &self.options) {
            Ok(value) => value,
            Err(err) => {
                return Validation {
                    error: Some(err.to_string()),
                    tokens,
                    ..Default::default()
                }
            }
        };

        let mut warnings = Vec::new();
        let input_chars = text.chars().count();
        if input_chars > LONG_INPUT_CHARS
            && value.to_string().chars().count() * 2 < input_chars
        {
            warnings.push(Warning::LessEfficientThanJson);
        }

        let long_lines = text
            .split('\n')
            .filter(|line| line.chars().count() > LONG_LINE_CHARS)
            .count();
        if long_lines > 0 {
            warnings.push(Warning::LongLines(long_lines));
        }

        if text.contains('{') && !TYPE_ANNOTATIONS.iter().any(|tag| text.contains(tag)) {
            warnings.push(Warning::NoTypeAnnotations);
        }

        Validation {
            valid: true,
            error: None,
            warnings,
            formatted: Format::Json.serialize(&value).ok(),
            tokens,
        }
    }

    /// Whether `text` decodes with default (non-strict) options.
    pub fn is_valid(&self, text: &str) -> bool {
        self.decoder.decode(text, &DecodeOptions::default()).is_ok()
    }
}

/// Checks that `text` is JSON, returning the parse error otherwise.
///
/// # Examples
///
/// ```rust
/// use toon_savings::validate_json;
///
/// assert!(validate_json(r#"{"ok": true}"#).is_ok());
/// assert!(validate_json("{ok: true}").is_err());
/// ```
pub fn validate_json(text: &str) -> Result<()> {
    Format::Json.parse(text).map(|_| ())
}
