//! Options passed through to the compact-format codec.
//!
//! The crate never interprets these itself. They are handed unchanged to the
//! injected [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder), and
//! they matter for comparisons because indentation and delimiter choice change
//! the token count of the encoded text.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{DecodeOptions, Delimiter, EncodeOptions};
//!
//! let encode = EncodeOptions::new()
//!     .with_delimiter(Delimiter::Tab)
//!     .with_length_marker('#');
//! assert_eq!(encode.delimiter.as_str(), "\t");
//!
//! let decode = DecodeOptions::strict();
//! assert!(decode.strict);
//! ```

/// Delimiter used between array items and table cells in the compact format.
///
/// # Examples
///
/// ```rust
/// use toon_savings::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_str(), ",");
/// assert_eq!(Delimiter::Tab.as_str(), "\t");
/// assert_eq!(Delimiter::Pipe.as_str(), "|");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// Options for encoding a value into the compact format.
///
/// The defaults (2-space indent, comma delimiter, no length marker) are the
/// settings every comparison in this crate uses unless told otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
    pub length_marker: Option<char>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            length_marker: None,
        }
    }
}

impl EncodeOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::{Delimiter, EncodeOptions};
    ///
    /// let options = EncodeOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert_eq!(options.delimiter, Delimiter::Comma);
    /// assert_eq!(options.length_marker, None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Prefixes array lengths with `marker` (`[#3]` instead of `[3]`).
    #[must_use]
    pub fn with_length_marker(mut self, marker: char) -> Self {
        self.length_marker = Some(marker);
        self
    }
}

/// Options for decoding compact-format text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    pub indent: usize,
    /// Reject malformed input (length mismatches, bad indentation) instead of
    /// recovering.
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: false,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by the validator.
    #[must_use]
    pub fn strict() -> Self {
        DecodeOptions {
            strict: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
