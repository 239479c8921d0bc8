//! # toon_savings
//!
//! Token-savings measurement for the TOON compact format.
//!
//! TOON is a compact, human-readable data format designed for talking to Large
//! Language Models. This crate does not implement TOON itself. It takes a TOON
//! codec as an [`Encoder`]/[`Decoder`] and measures what the format buys you:
//! how many tokens a compact rendering saves against its JSON, YAML, CSV or XML
//! source, what that is worth under a [`PricingModel`], and how a whole batch
//! of files fares.
//!
//! ## Key Features
//!
//! - **One tokenizer per run**: [`TokenCounter`] wraps a `tiktoken` BPE so both
//!   sides of a comparison are counted the same way
//! - **Signed comparisons**: a compact form that is larger than its baseline
//!   shows up as negative savings instead of being clamped
//! - **Batch isolation**: a [`BatchRunner`] records each item's failure and
//!   moves on, so one bad file never stops the rest
//! - **Explicit shapes**: parsers return a tagged [`Document`] instead of an
//!   untyped tree
//! - **Versioned pricing**: rates come from a dated [`PricingModel`] schedule
//!
//! ## Quick Start
//!
//! ```rust
//! use toon_savings::{compare, Rate, WhitespaceCounter};
//!
//! let result = compare(
//!     &WhitespaceCounter,
//!     r#"{ "id": 1, "name": "Alice" }"#,
//!     "id: 1\nname: Alice",
//!     Rate::new(1.25).unwrap(),
//! );
//! assert_eq!(result.tokens_saved(), 2);
//! assert_eq!(format!("{:.1}", result.reduction_percentage()), "33.3");
//! ```
//!
//! ### Batches
//!
//! ```rust
//! use toon_savings::{
//!     Batch, BatchInput, BatchRunner, EncodeOptions, Error, ItemStatus, Result, Value,
//!     WhitespaceCounter,
//! };
//!
//! // Any TOON encoder fits here. This one writes the keys of an object.
//! let encoder = |value: &Value, _: &EncodeOptions| -> Result<String> {
//!     let object = value.as_object().ok_or_else(|| Error::encode("not an object"))?;
//!     Ok(object.keys().cloned().collect::<Vec<_>>().join(" "))
//! };
//! let runner = BatchRunner::new(&encoder, &WhitespaceCounter);
//!
//! let mut seen = Vec::new();
//! let batch = runner.run(
//!     vec![BatchInput::new("users.json", r#"{"a": 1, "b": 2}"#)],
//!     &mut |batch: &Batch, index: usize| seen.push(batch.items()[index].status()),
//! );
//!
//! assert_eq!(seen, vec![ItemStatus::Processing, ItemStatus::Success]);
//! assert_eq!(batch.summary().tokens_saved, 2);
//! ```
//!
//! ### Values with the value! macro
//!
//! ```rust
//! use toon_savings::{value, Shape};
//!
//! let data = value!({
//!     "users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]
//! });
//! assert_eq!(data.shape(), Shape::Record);
//! assert_eq!(data.get("users").map(|users| users.shape()), Some(Shape::ArrayOfRecords));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and never installs a logger. Batch
//! start and finish are `info`, item transitions are `debug`, item failures
//! are `warn`.
//!
//! ## Demos
//!
//! `demos/token_savings.rs` runs a small batch end to end with a terminal
//! logger: `cargo run --example token_savings`.

pub mod batch;
pub mod codec;
pub mod compare;
pub mod convert;
pub mod debounce;
pub mod error;
pub mod formats;
pub mod macros;
pub mod map;
pub mod options;
pub mod playground;
pub mod pricing;
pub mod report;
pub mod tokenizer;
pub mod validate;
pub mod value;

pub use batch::{
    output_name, Batch, BatchInput, BatchItem, BatchObserver, BatchOptions, BatchOutput,
    BatchRunner, BatchSummary, CancelToken, ItemState, ItemStatus, NoopObserver,
};
pub use codec::{verify_round_trip, Codec, CodecPair, Decoder, Encoder};
pub use compare::{compare_counts, Comparator, ComparisonResult};
pub use convert::{Conversion, Converter};
pub use debounce::Debouncer;
pub use error::{Error, Result};
pub use formats::Format;
pub use map::Map;
pub use options::{DecodeOptions, Delimiter, EncodeOptions};
pub use playground::{FormatComparison, Rendering};
pub use pricing::{estimate_cost, PricingModel, Rate, TierCost, TierPrice};
pub use report::{TextStats, TokenReport};
pub use tokenizer::{
    counter_or_fallback, Encoding, TiktokenCounter, TokenCount, TokenCounter, WhitespaceCounter,
};
pub use validate::{validate_json, Validation, Validator, Warning};
pub use value::{Document, Number, Shape, Value};

/// Counts `text` with `counter`.
///
/// # Examples
///
/// ```rust
/// use toon_savings::{count, WhitespaceCounter};
///
/// assert_eq!(count(&WhitespaceCounter, "").tokens, 0);
/// assert_eq!(count(&WhitespaceCounter, "a b c").characters, 5);
/// ```
pub fn count<C: TokenCounter + ?Sized>(counter: &C, text: &str) -> TokenCount {
    counter.count(text)
}

/// Compares a baseline text with its compact form, counting both with
/// `counter` and pricing the difference at `rate`.
///
/// `tokens_saved` is negative when the compact form is larger. An empty
/// baseline gives a reduction of 0%.
///
/// # Examples
///
/// ```rust
/// use toon_savings::{compare, Rate, WhitespaceCounter};
///
/// let result = compare(&WhitespaceCounter, "", "", Rate::ZERO);
/// assert_eq!(result.tokens_saved(), 0);
/// assert_eq!(result.reduction_percentage(), 0.0);
/// ```
pub fn compare<C: TokenCounter + ?Sized>(
    counter: &C,
    baseline: &str,
    compact: &str,
    rate: Rate,
) -> ComparisonResult {
    compare_counts(counter.count(baseline), counter.count(compact), rate)
}
