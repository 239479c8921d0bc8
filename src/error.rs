//! Error types for parsing, encoding, tokenizer setup and pricing configuration.
//!
//! Every failure that can happen while a batch item moves through
//! parse -> encode -> compare is an [`Error`]. The batch orchestrator turns
//! these into a terminal error state on the item using the error's `Display`
//! text, so messages are written to be shown to a user as-is.
//!
//! ## Error Categories
//!
//! - **Parse errors**: the input is not valid JSON, YAML, CSV or XML. When the
//!   underlying parser reports a position, [`Error::Syntax`] carries it.
//! - **Encode/decode errors**: raised by the injected compact-format codec.
//! - **Shape errors**: the data cannot be represented in the requested format
//!   (for example CSV from a scalar).
//! - **Setup errors**: tokenizer initialisation, pricing configuration, I/O.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{Error, Format};
//!
//! let err = Format::Json.parse("{bad").unwrap_err();
//! assert!(matches!(err, Error::Syntax { .. }));
//! assert!(err.to_string().starts_with("JSON parse error at line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Syntax error reported with a position in the source text.
    #[error("{format} parse error at line {line}, column {col}: {msg}")]
    Syntax {
        format: &'static str,
        line: usize,
        col: usize,
        msg: String,
    },

    /// Parse error without position information.
    #[error("{format} parse error: {msg}")]
    Parse { format: &'static str, msg: String },

    /// The compact-format encoder rejected the data.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The compact-format decoder rejected the text.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Writing structured data in a text format failed.
    #[error("{format} serialization error: {msg}")]
    Serialize { format: &'static str, msg: String },

    /// The data shape cannot be represented in the requested format.
    #[error("{0}")]
    UnsupportedShape(String),

    /// The tokenizer could not be initialised.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Invalid or incomplete pricing configuration.
    #[error("Pricing error: {0}")]
    Pricing(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::Error;
    ///
    /// let err = Error::syntax("TOON", 3, 7, "expected ':' after key");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "TOON parse error at line 3, column 7: expected ':' after key"
    /// );
    /// ```
    pub fn syntax<T: fmt::Display>(format: &'static str, line: usize, col: usize, msg: T) -> Self {
        Error::Syntax {
            format,
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a parse error without position information.
    pub fn parse<T: fmt::Display>(format: &'static str, msg: T) -> Self {
        Error::Parse {
            format,
            msg: msg.to_string(),
        }
    }

    /// Creates an encode error. Intended for [`Encoder`](crate::Encoder) implementations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::Error;
    ///
    /// let err = Error::encode("keys must not contain newlines");
    /// assert_eq!(err.to_string(), "Encode error: keys must not contain newlines");
    /// ```
    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    /// Creates a decode error. Intended for [`Decoder`](crate::Decoder) implementations.
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Creates a serialization error for one of the structured-text formats.
    pub fn serialize<T: fmt::Display>(format: &'static str, msg: T) -> Self {
        Error::Serialize {
            format,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for data that has the wrong shape for a format.
    pub fn unsupported_shape<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedShape(msg.to_string())
    }

    /// Creates a tokenizer initialisation error.
    pub fn tokenizer<T: fmt::Display>(msg: T) -> Self {
        Error::Tokenizer(msg.to_string())
    }

    /// Creates a pricing configuration error.
    pub fn pricing<T: fmt::Display>(msg: T) -> Self {
        Error::Pricing(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `(line, column)` when the error points at a source position.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
