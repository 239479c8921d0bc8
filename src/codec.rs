//! The compact-format codec contract.
//!
//! The TOON encoder and decoder live outside this crate. Everything here that
//! needs them takes an implementation of [`Encoder`] and/or [`Decoder`], which
//! are implemented for plain closures so a caller can wire in any codec:
//!
//! ```rust
//! use toon_savings::{value, EncodeOptions, Encoder, Result, Value};
//!
//! // A toy encoder that writes top-level keys as `key: value` lines.
//! let encoder = |value: &Value, _: &EncodeOptions| -> Result<String> {
//!     let obj = value.as_object().ok_or_else(|| toon_savings::Error::encode("not an object"))?;
//!     Ok(obj
//!         .iter()
//!         .map(|(k, v)| format!("{}: {}", k, v.to_plain_text()))
//!         .collect::<Vec<_>>()
//!         .join("\n"))
//! };
//!
//! let text = encoder.encode(&value!({"a": 1, "b": "x"}), &EncodeOptions::new()).unwrap();
//! assert_eq!(text, "a: 1\nb: x");
//! ```

use crate::{DecodeOptions, EncodeOptions, Result, Value};

/// Encodes a value into compact-format text.
pub trait Encoder: Send + Sync {
    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<String>;
}

/// Decodes compact-format text into a value.
pub trait Decoder: Send + Sync {
    fn decode(&self, text: &str, options: &DecodeOptions) -> Result<Value>;
}

impl<F> Encoder for F
where
    F: Fn(&Value, &EncodeOptions) -> Result<String> + Send + Sync,
{
    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<String> {
        self(value, options)
    }
}

impl<F> Decoder for F
where
    F: Fn(&str, &DecodeOptions) -> Result<Value> + Send + Sync,
{
    fn decode(&self, text: &str, options: &DecodeOptions) -> Result<Value> {
        self(text, options)
    }
}

/// A codec that can both encode and decode.
pub trait Codec: Encoder + Decoder {}

impl<T: Encoder + Decoder> Codec for T {}

/// Combines a separate encoder and decoder into one [`Codec`].
#[derive(Clone, Debug)]
pub struct CodecPair<E, D> {
    pub encoder: E,
    pub decoder: D,
}

impl<E: Encoder, D: Decoder> CodecPair<E, D> {
    pub fn new(encoder: E, decoder: D) -> Self {
        CodecPair { encoder, decoder }
    }
}

impl<E: Encoder, D: Send + Sync> Encoder for CodecPair<E, D> {
    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<String> {
        self.encoder.encode(value, options)
    }
}

impl<E: Send + Sync, D: Decoder> Decoder for CodecPair<E, D> {
    fn decode(&self, text: &str, options: &DecodeOptions) -> Result<Value> {
        self.decoder.decode(text, options)
    }
}

/// Checks that `decode(encode(value))` gives back `value` with default options.
///
/// Returns `Ok(false)` on a mismatch and `Err` when either direction fails.
pub fn verify_round_trip<C: Codec + ?Sized>(codec: &C, value: &Value) -> Result<bool> {
    let encoded = codec.encode(value, &EncodeOptions::default())?;
    let decoded = codec.decode(&encoded, &DecodeOptions::default())?;
    Ok(&decoded == value)
}
