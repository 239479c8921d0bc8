//! Token counting.
//!
//! [`TokenCounter`] is the seam between the comparison code and whatever
//! tokenizer measures the text. [`TiktokenCounter`] wraps a `tiktoken-rs` BPE
//! (o200k by default, the scheme used by current OpenAI models), and
//! [`WhitespaceCounter`] is the cheap fallback used when a BPE cannot be
//! loaded and in tests.
//!
//! Both sides of a comparison must be counted by the same counter. The
//! comparison and batch code take a single counter for a whole run, which
//! keeps that true.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{TokenCounter, WhitespaceCounter};
//!
//! let count = WhitespaceCounter.count("name: Alice\nage: 30");
//! assert_eq!(count.tokens, 4);
//! assert_eq!(count.characters, 19);
//! ```

use std::fmt;

use log::{debug, error};
use tiktoken_rs::CoreBPE;

use crate::{Error, Result};

/// Token and character counts for one text blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenCount {
    pub tokens: usize,
    /// Unicode scalar values, not bytes.
    pub characters: usize,
}

impl TokenCount {
    #[must_use]
    pub const fn new(tokens: usize, characters: usize) -> Self {
        TokenCount { tokens, characters }
    }
}

/// Counts tokens in text.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;

    /// Name of the tokenization scheme, for reports and logs.
    fn scheme(&self) -> &str;

    /// Counts tokens and characters. The empty string is `{0, 0}`.
    fn count(&self, text: &str) -> TokenCount {
        if text.is_empty() {
            return TokenCount::default();
        }
        TokenCount {
            tokens: self.count_tokens(text),
            characters: text.chars().count(),
        }
    }

    /// Counts raw bytes, replacing invalid UTF-8 sequences instead of failing.
    fn count_bytes(&self, bytes: &[u8]) -> TokenCount {
        self.count(&String::from_utf8_lossy(bytes))
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }

    fn scheme(&self) -> &str {
        (**self).scheme()
    }

    fn count(&self, text: &str) -> TokenCount {
        (**self).count(text)
    }

    fn count_bytes(&self, bytes: &[u8]) -> TokenCount {
        (**self).count_bytes(bytes)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }

    fn scheme(&self) -> &str {
        (**self).scheme()
    }

    fn count(&self, text: &str) -> TokenCount {
        (**self).count(text)
    }

    fn count_bytes(&self, bytes: &[u8]) -> TokenCount {
        (**self).count_bytes(bytes)
    }
}

/// BPE vocabularies bundled with `tiktoken-rs`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// GPT-4o and GPT-5 family.
    #[default]
    O200kBase,
    /// GPT-3.5 and GPT-4.
    Cl100kBase,
    /// Codex and older completion models.
    P50kBase,
}

impl Encoding {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Encoding::O200kBase => "o200k_base",
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::P50kBase => "p50k_base",
        }
    }

    fn load(self) -> Result<CoreBPE> {
        let bpe = match self {
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
        };
        bpe.map_err(|e| Error::tokenizer(format!("failed to load {}: {}", self.name(), e)))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts tokens with a `tiktoken-rs` BPE.
///
/// The BPE is loaded once in [`new`](Self::new) and reused for every call.
pub struct TiktokenCounter {
    encoding: Encoding,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Loads the BPE for `encoding`. This is the only fallible step; counting
    /// never fails afterwards.
    pub fn new(encoding: Encoding) -> Result<Self> {
        let bpe = encoding.load()?;
        debug!("Loaded {} tokenizer", encoding);
        Ok(TiktokenCounter { encoding, bpe })
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCounter for TiktokenCounter {
    /// Special-token text such as `<|endoftext|>` is counted as ordinary text.
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn scheme(&self) -> &str {
        self.encoding.name()
    }
}

/// Counts whitespace-separated words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn scheme(&self) -> &str {
        "whitespace"
    }
}

/// Returns a BPE counter for `encoding`, or a [`WhitespaceCounter`] when the
/// BPE cannot be loaded.
pub fn counter_or_fallback(encoding: Encoding) -> Box<dyn TokenCounter> {
    match TiktokenCounter::new(encoding) {
        Ok(counter) => Box::new(counter),
        Err(e) => {
            error!("{}. Falling back to whitespace token count.", e);
            Box::new(WhitespaceCounter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_counter() {
        let counter = WhitespaceCounter;
        assert_eq!(counter.count_tokens(""), 0);
        assert_eq!(counter.count_tokens("  hello   world  "), 2);
        assert_eq!(counter.count_tokens("hello\tworld\r\nexample"), 3);
        assert_eq!(counter.scheme(), "whitespace");
    }

    #[test]
    fn test_empty_text_counts_zero() {
        let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
        assert_eq!(counter.count(""), TokenCount::new(0, 0));
    }

    #[test]
    fn test_characters_are_scalar_values() {
        let count = WhitespaceCounter.count("héllo wörld");
        assert_eq!(count.characters, 11);
        assert_eq!(count.tokens, 2);
    }

    #[test]
    fn test_tiktoken_simple_text() {
        let counter = TiktokenCounter::new(Encoding::Cl100kBase).unwrap();
        assert_eq!(counter.count_tokens("hello world"), 2);
        assert_eq!(counter.count_tokens("Hello, world!"), 4);
        assert_eq!(counter.scheme(), "cl100k_base");
    }

    #[test]
    fn test_tiktoken_special_tokens_are_ordinary_text() {
        let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
        assert!(counter.count_tokens("<|endoftext|>") > 1);
    }

    #[test]
    fn test_count_is_deterministic() {
        let counter = TiktokenCounter::new(Encoding::O200kBase).unwrap();
        let text = r#"{"users":[{"id":1,"name":"Alice"}]}"#;
        assert_eq!(counter.count(text), counter.count(text));
    }

    #[test]
    fn test_count_bytes_is_lossy() {
        let count = WhitespaceCounter.count_bytes(b"ok \xff\xfe data");
        assert_eq!(count.tokens, 3);
    }

    #[test]
    fn test_counter_through_reference_and_box() {
        let boxed: Box<dyn TokenCounter> = Box::new(WhitespaceCounter);
        assert_eq!(boxed.count("a b").tokens, 2);
        assert_eq!((&WhitespaceCounter).scheme(), "whitespace");
        assert_eq!(counter_or_fallback(Encoding::O200kBase).scheme(), "o200k_base");
    }

    /// Overrides both counting methods with fixed answers.
    struct Overriding;

    impl TokenCounter for Overriding {
        fn count_tokens(&self, text: &str) -> usize {
            text.len()
        }

        fn scheme(&self) -> &str {
            "overriding"
        }

        fn count(&self, text: &str) -> TokenCount {
            TokenCount::new(self.count_tokens(text), 999)
        }

        fn count_bytes(&self, _bytes: &[u8]) -> TokenCount {
            TokenCount::new(1, 0)
        }
    }

    #[test]
    fn test_wrappers_keep_overridden_counts() {
        let direct = Overriding.count("ab");
        let boxed: Box<dyn TokenCounter> = Box::new(Overriding);
        assert_eq!(boxed.count("ab"), direct);
        assert_eq!((&Overriding).count("ab"), direct);
        assert_eq!(boxed.count_bytes(b"abc"), TokenCount::new(1, 0));
        assert_eq!((&&Overriding).count_bytes(b"abc"), TokenCount::new(1, 0));
        assert_eq!(crate::count(&boxed, "ab").characters, 999);
    }
}
