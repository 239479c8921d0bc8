//! Sequential batch conversion with per-item status tracking.
//!
//! A [`BatchRunner`] takes a list of [`BatchInput`]s and drives each one, in
//! order, through parse -> encode -> compare. Every item moves along
//!
//! ```text
//! Pending -> Processing -> Success | Error
//! ```
//!
//! and never moves back. A failing item (bad input, encoder error, even a
//! panic inside the encoder) ends in [`ItemState::Error`] and the run moves
//! on to the next item, so a batch never fails as a whole.
//!
//! The [`Batch`] is owned by the runner while it runs. Observers get a shared
//! reference after every transition, which is enough to render progress, and
//! the [`BatchSummary`] is folded from the items on every call.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{
//!     BatchInput, BatchRunner, EncodeOptions, NoopObserver, Result, Value, WhitespaceCounter,
//! };
//!
//! let encoder = |value: &Value, _: &EncodeOptions| -> Result<String> { Ok(value.to_string()) };
//! let runner = BatchRunner::new(&encoder, &WhitespaceCounter);
//!
//! let batch = runner.run(
//!     vec![
//!         BatchInput::new("a.json", r#"{"id": 1}"#),
//!         BatchInput::new("b.json", "{bad"),
//!         BatchInput::new("c.json", "[1, 2, 3]"),
//!     ],
//!     &mut NoopObserver,
//! );
//!
//! let summary = batch.summary();
//! assert_eq!(summary.succeeded, 2);
//! assert_eq!(summary.failed, 1);
//! assert!(batch.items()[1].error_message().unwrap().starts_with("JSON parse error"));
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::{EncodeOptions, Encoder, Format, Rate, Result, TokenCounter};

/// One item to convert: a name (usually a file name) and its text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchInput {
    pub identifier: String,
    pub text: String,
}

impl BatchInput {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        BatchInput {
            identifier: identifier.into(),
            text: text.into(),
        }
    }
}

/// Status tag of a [`BatchItem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Success | ItemStatus::Error)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a [`BatchItem`], carrying what only that state has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Processing,
    Success {
        /// Characters (Unicode scalar values) of encoded output.
        converted_size: usize,
        converted_tokens: usize,
        output: String,
    },
    Error {
        message: String,
    },
}

impl ItemState {
    #[must_use]
    pub fn status(&self) -> ItemStatus {
        match self {
            ItemState::Pending => ItemStatus::Pending,
            ItemState::Processing => ItemStatus::Processing,
            ItemState::Success { .. } => ItemStatus::Success,
            ItemState::Error { .. } => ItemStatus::Error,
        }
    }
}

/// One entry of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub identifier: String,
    /// Characters (Unicode scalar values) of input text, the unit
    /// [`TokenCount::characters`](crate::TokenCount::characters) uses.
    pub original_size: usize,
    /// Zero until the item starts processing.
    pub original_tokens: usize,
    state: ItemState,
}

impl BatchItem {
    fn pending(input: &BatchInput) -> Self {
        BatchItem {
            identifier: input.identifier.clone(),
            original_size: input.text.chars().count(),
            original_tokens: 0,
            state: ItemState::Pending,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ItemState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> ItemStatus {
        self.state.status()
    }

    #[must_use]
    pub fn converted_tokens(&self) -> Option<usize> {
        match &self.state {
            ItemState::Success {
                converted_tokens, ..
            } => Some(*converted_tokens),
            _ => None,
        }
    }

    #[must_use]
    pub fn converted_size(&self) -> Option<usize> {
        match &self.state {
            ItemState::Success { converted_size, .. } => Some(*converted_size),
            _ => None,
        }
    }

    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match &self.state {
            ItemState::Success { output, .. } => Some(output),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ItemState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// `original_tokens - converted_tokens` for a successful item.
    #[must_use]
    pub fn tokens_saved(&self) -> Option<i64> {
        self.converted_tokens()
            .map(|converted| self.original_tokens as i64 - converted as i64)
    }

    /// Percentage of tokens saved for a successful item, `0.0` for an empty input.
    #[must_use]
    pub fn reduction_percentage(&self) -> Option<f64> {
        let saved = self.tokens_saved()?;
        if self.original_tokens == 0 {
            return Some(0.0);
        }
        Some(saved as f64 / self.original_tokens as f64 * 100.0)
    }

    fn start(&mut self, original_tokens: usize) {
        debug_assert_eq!(self.status(), ItemStatus::Pending);
        self.original_tokens = original_tokens;
        self.state = ItemState::Processing;
    }

    fn finish(&mut self, state: ItemState) {
        debug_assert_eq!(self.status(), ItemStatus::Processing);
        debug_assert!(state.status().is_terminal());
        self.state = state;
    }
}

/// Totals over a batch, folded from its items.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Input tokens of successful items.
    pub original_tokens: usize,
    /// Output tokens of successful items.
    pub converted_tokens: usize,
    /// Sum of `original_tokens - converted_tokens` over successful items.
    pub tokens_saved: i64,
    /// `tokens_saved` priced at the batch rate.
    pub estimated_cost_savings: f64,
}

impl BatchSummary {
    /// Folds a summary from an item list.
    #[must_use]
    pub fn from_items(items: &[BatchItem], rate: Rate) -> Self {
        let mut summary = items.iter().fold(BatchSummary::default(), |mut acc, item| {
            acc.total += 1;
            match item.state() {
                ItemState::Pending => acc.pending += 1,
                ItemState::Processing => acc.processing += 1,
                ItemState::Success {
                    converted_tokens, ..
                } => {
                    acc.succeeded += 1;
                    acc.original_tokens += item.original_tokens;
                    acc.converted_tokens += converted_tokens;
                    acc.tokens_saved += item.original_tokens as i64 - *converted_tokens as i64;
                }
                ItemState::Error { .. } => acc.failed += 1,
            }
            acc
        });
        summary.estimated_cost_savings = rate.cost(summary.tokens_saved);
        summary
    }

    /// Percentage of tokens saved across successful items.
    #[must_use]
    pub fn reduction_percentage(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        self.tokens_saved as f64 / self.original_tokens as f64 * 100.0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} succeeded, {} failed",
            self.total, self.succeeded, self.failed
        )?;
        let unfinished = self.pending + self.processing;
        if unfinished > 0 {
            write!(f, ", {} not processed", unfinished)?;
        }
        write!(
            f,
            "; {} tokens saved ({:.1}%)",
            self.tokens_saved,
            self.reduction_percentage()
        )
    }
}

/// The converted output of one successful item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutput<'a> {
    /// Suggested file name for the output.
    pub name: String,
    pub identifier: &'a str,
    pub output: &'a str,
}

/// State of one batch run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    items: Vec<BatchItem>,
    rate: Rate,
    cancelled: bool,
}

impl Batch {
    fn new(inputs: &[BatchInput], rate: Rate) -> Self {
        Batch {
            items: inputs.iter().map(BatchItem::pending).collect(),
            rate,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_items(&self.items, self.rate)
    }

    /// True when the run stopped early because it was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True once no item is pending or processing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|item| item.status().is_terminal())
    }

    /// Outputs of successful items, in input order.
    #[must_use]
    pub fn outputs(&self) -> Vec<BatchOutput<'_>> {
        self.items
            .iter()
            .filter_map(|item| {
                item.output().map(|output| BatchOutput {
                    name: output_name(&item.identifier),
                    identifier: &item.identifier,
                    output,
                })
            })
            .collect()
    }

    /// Drops all items.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cancelled = false;
    }
}

/// Output file name for an input: its extension replaced by `.toon`.
///
/// # Examples
///
/// ```rust
/// use toon_savings::output_name;
///
/// assert_eq!(output_name("users.json"), "users.toon");
/// assert_eq!(output_name("dump/notes.txt"), "dump/notes.toon");
/// assert_eq!(output_name("README"), "README.toon");
/// ```
#[must_use]
pub fn output_name(identifier: &str) -> String {
    Path::new(identifier)
        .with_extension("toon")
        .to_string_lossy()
        .into_owned()
}

/// Receives progress while a batch runs.
pub trait BatchObserver {
    /// Called once before the first item starts, with every item pending.
    fn on_start(&mut self, _batch: &Batch) {}

    /// Called after the item at `index` changes state.
    fn on_update(&mut self, batch: &Batch, index: usize);

    /// Called once after the run ends, whether it completed or was cancelled.
    fn on_finish(&mut self, _batch: &Batch) {}
}

impl<F> BatchObserver for F
where
    F: FnMut(&Batch, usize),
{
    fn on_update(&mut self, batch: &Batch, index: usize) {
        self(batch, index)
    }
}

/// An observer that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_update(&mut self, _batch: &Batch, _index: usize) {}
}

/// Shared flag for stopping a batch between items.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings for a batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchOptions {
    /// Format for identifiers without a recognised extension.
    pub default_format: Format,
    pub encode_options: EncodeOptions,
    /// Extensions [`accepts`](Self::accepts) lets through, lower case, without the dot.
    pub extensions: Vec<String>,
    /// Rate used to price the savings in the summary.
    pub rate: Rate,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            default_format: Format::Json,
            encode_options: EncodeOptions::default(),
            extensions: vec!["json".to_string(), "txt".to_string()],
            rate: Rate::ZERO,
        }
    }
}

impl BatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_format(mut self, format: Format) -> Self {
        self.default_format = format;
        self
    }

    #[must_use]
    pub fn with_encode_options(mut self, options: EncodeOptions) -> Self {
        self.encode_options = options;
        self
    }

    /// Accepts one more extension.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }

    #[must_use]
    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.rate = rate;
        self
    }

    /// Whether a file with this name should be added to a batch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::BatchOptions;
    ///
    /// let options = BatchOptions::new();
    /// assert!(options.accepts("data.JSON"));
    /// assert!(options.accepts("paste.txt"));
    /// assert!(!options.accepts("data.csv"));
    /// assert!(options.with_extension("csv").accepts("data.csv"));
    /// ```
    #[must_use]
    pub fn accepts(&self, identifier: &str) -> bool {
        Path::new(identifier)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Format used to parse an item.
    #[must_use]
    pub fn format_for(&self, identifier: &str) -> Format {
        Format::from_path(identifier).unwrap_or(self.default_format)
    }
}

/// Runs batches with one encoder and one token counter.
pub struct BatchRunner<'a, E: ?Sized, C: ?Sized> {
    encoder: &'a E,
    counter: &'a C,
    options: BatchOptions,
}

impl<'a, E, C> BatchRunner<'a, E, C>
where
    E: Encoder + ?Sized,
    C: TokenCounter + ?Sized,
{
    pub fn new(encoder: &'a E, counter: &'a C) -> Self {
        BatchRunner {
            encoder,
            counter,
            options: BatchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Processes every input in order.
    pub fn run<O>(&self, inputs: Vec<BatchInput>, observer: &mut O) -> Batch
    where
        O: BatchObserver + ?Sized,
    {
        self.run_with_cancel(inputs, observer, &CancelToken::new())
    }

    /// Processes inputs in order until `cancel` is set. The flag is checked
    /// before each item; items not started stay pending.
    pub fn run_with_cancel<O>(
        &self,
        inputs: Vec<BatchInput>,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Batch
    where
        O: BatchObserver + ?Sized,
    {
        let mut batch = Batch::new(&inputs, self.options.rate);
        info!(
            "Starting batch of {} items ({} tokenizer)",
            inputs.len(),
            self.counter.scheme()
        );
        observer.on_start(&batch);

        for (index, input) in inputs.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    "Batch cancelled before item {} of {}",
                    index + 1,
                    inputs.len()
                );
                batch.cancelled = true;
                break;
            }

            let original = self.counter.count(&input.text);
            batch.items[index].start(original.tokens);
            debug!("{}: processing", input.identifier);
            observer.on_update(&batch, index);

            let state = self.process(input);
            match &state {
                ItemState::Success {
                    converted_tokens, ..
                } => debug!(
                    "{}: success, {} -> {} tokens",
                    input.identifier, original.tokens, converted_tokens
                ),
                ItemState::Error { message } => warn!("{}: {}", input.identifier, message),
                _ => {}
            }
            batch.items[index].finish(state);
            observer.on_update(&batch, index);
        }

        info!("Batch finished: {}", batch.summary());
        observer.on_finish(&batch);
        batch
    }

    fn process(&self, input: &BatchInput) -> ItemState {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.convert(input)));
        let output = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                return ItemState::Error {
                    message: err.to_string(),
                }
            }
            Err(payload) => {
                return ItemState::Error {
                    message: format!("internal error: {}", panic_message(payload.as_ref())),
                }
            }
        };

        ItemState::Success {
            converted_size: output.chars().count(),
            converted_tokens: self.counter.count(&output).tokens,
            output,
        }
    }

    fn convert(&self, input: &BatchInput) -> Result<String> {
        let format = self.options.format_for(&input.identifier);
        debug!("{}: parsing as {}", input.identifier, format);
        let value = format.parse_for_encoding(&input.text)?;
        self.encoder.encode(&value, &self.options.encode_options)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "encoder panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Value, WhitespaceCounter};

    fn json_encoder(value: &Value, _: &EncodeOptions) -> Result<String> {
        Ok(value.to_string())
    }

    fn inputs(texts: &[&str]) -> Vec<BatchInput> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| BatchInput::new(format!("item{}.json", i + 1), *text))
            .collect()
    }

    #[test]
    fn test_invalid_item_does_not_stop_batch() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let batch = runner.run(inputs(&["{\"a\": 1}", "{bad", "[1]"]), &mut NoopObserver);

        let statuses: Vec<_> = batch.items().iter().map(BatchItem::status).collect();
        assert_eq!(
            statuses,
            vec![ItemStatus::Success, ItemStatus::Error, ItemStatus::Success]
        );
        assert!(batch.items()[1]
            .error_message()
            .unwrap()
            .contains("JSON parse error"));
        assert_eq!(batch.summary().succeeded, 2);
        assert!(batch.is_complete());
    }

    #[test]
    fn test_observer_sees_each_transition_in_order() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let mut seen = Vec::new();
        let mut observer = |batch: &Batch, index: usize| {
            seen.push((index, batch.items()[index].status()));
        };
        runner.run(inputs(&["1", "{bad"]), &mut observer);

        assert_eq!(
            seen,
            vec![
                (0, ItemStatus::Processing),
                (0, ItemStatus::Success),
                (1, ItemStatus::Processing),
                (1, ItemStatus::Error),
            ]
        );
    }

    #[test]
    fn test_encoder_error_and_panic_are_isolated() {
        let encoder = |value: &Value, _: &EncodeOptions| -> Result<String> {
            match value.as_i64() {
                Some(1) => Err(Error::encode("one is not allowed")),
                Some(2) => panic!("two broke the encoder"),
                _ => Ok(value.to_string()),
            }
        };
        let runner = BatchRunner::new(&encoder, &WhitespaceCounter);
        let batch = runner.run(inputs(&["1", "2", "3"]), &mut NoopObserver);

        assert_eq!(
            batch.items()[0].error_message(),
            Some("Encode error: one is not allowed")
        );
        assert_eq!(
            batch.items()[1].error_message(),
            Some("internal error: two broke the encoder")
        );
        assert_eq!(batch.items()[2].status(), ItemStatus::Success);
    }

    #[test]
    fn test_cancel_leaves_remaining_items_pending() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let mut observer = move |batch: &Batch, index: usize| {
            if index == 0 && batch.items()[0].status().is_terminal() {
                trigger.cancel();
            }
        };
        let batch = runner.run_with_cancel(inputs(&["1", "2", "3"]), &mut observer, &cancel);

        assert!(batch.is_cancelled());
        assert_eq!(batch.items()[0].status(), ItemStatus::Success);
        assert_eq!(batch.items()[1].status(), ItemStatus::Pending);
        assert_eq!(batch.items()[1].original_tokens, 0);
        assert_eq!(batch.summary().pending, 2);
        assert!(!batch.is_complete());
    }

    #[test]
    fn test_sizes_are_characters_and_tokens_counted_on_start() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let batch = runner.run(
            vec![BatchInput::new("u.json", "{ \"name\": \"Zoë\" }")],
            &mut NoopObserver,
        );
        let item = &batch.items()[0];
        assert_eq!(item.original_size, 17);
        assert_eq!(item.original_tokens, 4);
        assert_eq!(item.output(), Some("{\"name\":\"Zoë\"}"));
        assert_eq!(item.converted_size(), Some(14));
        assert_eq!(item.converted_tokens(), Some(1));
        assert_eq!(item.tokens_saved(), Some(3));
        assert_eq!(item.reduction_percentage(), Some(75.0));
    }

    #[test]
    fn test_summary_fold_and_display() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter)
            .with_options(BatchOptions::new().with_rate(Rate::new(2.0).unwrap()));
        let batch = runner.run(inputs(&["[1, 2, 3]", "{bad", "[4, 5]"]), &mut NoopObserver);
        let summary = batch.summary();

        let manual: i64 = batch.items().iter().filter_map(BatchItem::tokens_saved).sum();
        assert_eq!(summary.tokens_saved, manual);
        assert_eq!(summary.tokens_saved, 3);
        assert!((summary.estimated_cost_savings - 0.000006).abs() < 1e-12);
        assert_eq!(
            summary.to_string(),
            "3 files: 2 succeeded, 1 failed; 3 tokens saved (60.0%)"
        );
    }

    #[test]
    fn test_format_detected_from_identifier() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let batch = runner.run(
            vec![
                BatchInput::new("people.csv", "id,name\n1,Ann\n"),
                BatchInput::new("conf.yaml", "port: 8080\n"),
                BatchInput::new("pasted", "{\"x\": true}"),
            ],
            &mut NoopObserver,
        );
        assert_eq!(
            batch.items()[0].output(),
            Some("{\"data\":[{\"id\":1,\"name\":\"Ann\"}]}")
        );
        assert_eq!(batch.items()[1].output(), Some("{\"port\":8080}"));
        assert_eq!(batch.items()[2].output(), Some("{\"x\":true}"));
    }

    #[test]
    fn test_outputs_and_clear() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let mut batch = runner.run(inputs(&["1", "{bad"]), &mut NoopObserver);

        let outputs = batch.outputs();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "item1.toon");
        assert_eq!(outputs[0].output, "1");

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.summary(), BatchSummary::default());
    }

    #[test]
    fn test_empty_batch() {
        let runner = BatchRunner::new(&json_encoder, &WhitespaceCounter);
        let batch = runner.run(Vec::new(), &mut NoopObserver);
        assert!(batch.is_empty());
        assert!(batch.is_complete());
        assert_eq!(batch.summary().tokens_saved, 0);
    }
}
