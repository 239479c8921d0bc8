//! Token-savings comparison between a baseline text and its compact encoding.
//!
//! A [`ComparisonResult`] stores only the two [`TokenCount`]s and the rate.
//! Savings, reduction percentage and cost are derived on every call, so they
//! can never disagree with the counts they came from.
//!
//! Negative savings mean the compact text is larger than the baseline. They
//! are reported as-is so regressions stay visible.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{Comparator, Rate, WhitespaceCounter};
//!
//! let comparator = Comparator::new(WhitespaceCounter);
//! let result = comparator.compare(
//!     "id 1 name Alice id 2 name Bob",
//!     "id name 1 Alice 2 Bob",
//!     Rate::new(1.25).unwrap(),
//! );
//! assert_eq!(result.tokens_saved(), 2);
//! assert_eq!(result.reduction_percentage(), 25.0);
//! ```

use std::fmt;

use crate::{PricingModel, Rate, Result, TokenCount, TokenCounter};

/// Token counts of a baseline and a compact text, with the rate used to
/// price the difference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComparisonResult {
    pub baseline: TokenCount,
    pub compact: TokenCount,
    pub rate: Rate,
}

impl ComparisonResult {
    #[must_use]
    pub fn baseline_tokens(&self) -> usize {
        self.baseline.tokens
    }

    #[must_use]
    pub fn compact_tokens(&self) -> usize {
        self.compact.tokens
    }

    /// `baseline_tokens - compact_tokens`. Negative when the compact text is larger.
    #[must_use]
    pub fn tokens_saved(&self) -> i64 {
        self.baseline.tokens as i64 - self.compact.tokens as i64
    }

    /// `tokens_saved / baseline_tokens * 100`, or `0.0` for an empty baseline.
    #[must_use]
    pub fn reduction_percentage(&self) -> f64 {
        if self.baseline.tokens == 0 {
            return 0.0;
        }
        self.tokens_saved() as f64 / self.baseline.tokens as f64 * 100.0
    }

    #[must_use]
    pub fn estimated_cost_savings(&self) -> f64 {
        self.rate.cost(self.tokens_saved())
    }

    /// Character delta, `baseline - compact`.
    #[must_use]
    pub fn characters_saved(&self) -> i64 {
        self.baseline.characters as i64 - self.compact.characters as i64
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} tokens ({} saved, {:.1}%, ${:.6})",
            self.baseline_tokens(),
            self.compact_tokens(),
            self.tokens_saved(),
            self.reduction_percentage(),
            self.estimated_cost_savings()
        )
    }
}

/// Builds a result from counts that were already computed.
#[must_use]
pub fn compare_counts(baseline: TokenCount, compact: TokenCount, rate: Rate) -> ComparisonResult {
    ComparisonResult {
        baseline,
        compact,
        rate,
    }
}

/// Compares texts with one token counter, so both sides use the same scheme.
#[derive(Clone, Debug, Default)]
pub struct Comparator<C> {
    counter: C,
}

impl<C: TokenCounter> Comparator<C> {
    pub fn new(counter: C) -> Self {
        Comparator { counter }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn count(&self, text: &str) -> TokenCount {
        self.counter.count(text)
    }

    pub fn compare(&self, baseline: &str, compact: &str, rate: Rate) -> ComparisonResult {
        compare_counts(self.count(baseline), self.count(compact), rate)
    }

    /// Compares at the input rate of a tier from `pricing`.
    pub fn compare_with_tier(
        &self,
        baseline: &str,
        compact: &str,
        pricing: &PricingModel,
        tier: &str,
    ) -> Result<ComparisonResult> {
        let rate = pricing.rate(tier)?;
        Ok(self.compare(baseline, compact, rate))
    }
}
