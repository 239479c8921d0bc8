//! Plain-text token reports.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{PricingModel, TextStats, TokenReport, WhitespaceCounter};
//!
//! let pricing = PricingModel::builtin().unwrap();
//! let stats = TextStats::measure("one two\nthree", &WhitespaceCounter);
//! assert_eq!((stats.words, stats.lines), (3, 2));
//!
//! let report = TokenReport::new(stats, &pricing, "openai-gpt5").unwrap();
//! assert!(report.to_string().contains("Cost Estimates (GPT-5):"));
//! ```

use std::fmt;

use crate::{
    compare_counts, ComparisonResult, EncodeOptions, Encoder, Format, PricingModel, Rate, Result,
    TokenCounter,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Size measurements of one text blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStats {
    pub tokens: usize,
    pub characters: usize,
    pub words: usize,
    /// Newline-separated lines, so a trailing newline adds an empty line.
    pub lines: usize,
}

impl TextStats {
    pub fn measure<C: TokenCounter + ?Sized>(text: &str, counter: &C) -> Self {
        if text.is_empty() {
            return TextStats::default();
        }
        let count = counter.count(text);
        TextStats {
            tokens: count.tokens,
            characters: count.characters,
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
        }
    }
}

/// Token counts and cost estimates for one text, with an optional comparison
/// against its compact encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenReport {
    pub stats: TextStats,
    /// Display name of the pricing tier.
    pub tier: String,
    pub rate: Rate,
    pub input_cost: f64,
    pub output_cost: Option<f64>,
    pub comparison: Option<ComparisonResult>,
}

impl TokenReport {
    /// Prices `stats` under `tier` of `pricing`.
    pub fn new(stats: TextStats, pricing: &PricingModel, tier: &str) -> Result<Self> {
        let price = pricing.tier(tier)?;
        let rate = pricing.rate(tier)?;
        let tokens = stats.tokens as i64;
        Ok(TokenReport {
            stats,
            tier: price.label.clone().unwrap_or_else(|| tier.to_string()),
            rate,
            input_cost: rate.cost(tokens),
            output_cost: pricing.output_rate(tier)?.map(|rate| rate.cost(tokens)),
            comparison: None,
        })
    }

    #[must_use]
    pub fn with_comparison(mut self, comparison: ComparisonResult) -> Self {
        self.comparison = Some(comparison);
        self
    }

    /// Adds a comparison when `text` is JSON that `encoder` can encode.
    /// Anything else leaves the report without one.
    #[must_use]
    pub fn compare_json<E, C>(self, text: &str, encoder: &E, counter: &C) -> Self
    where
        E: Encoder + ?Sized,
        C: TokenCounter + ?Sized,
    {
        let compact = Format::Json
            .parse(text)
            .and_then(|doc| encoder.encode(&doc.into_value(), &EncodeOptions::default()));
        match compact {
            Ok(compact) if !compact.is_empty() => {
                let comparison =
                    compare_counts(counter.count(text), counter.count(&compact), self.rate);
                self.with_comparison(comparison)
            }
            _ => self,
        }
    }
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token Counter Report")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Tokens: {}", self.stats.tokens)?;
        writeln!(f, "Characters: {}", self.stats.characters)?;
        writeln!(f, "Words: {}", self.stats.words)?;
        writeln!(f, "Lines: {}", self.stats.lines)?;
        writeln!(f)?;
        writeln!(f, "Cost Estimates ({}):", self.tier)?;
        writeln!(f, "Input: ${:.6}", self.input_cost)?;
        if let Some(cost) = self.output_cost {
            writeln!(f, "Output: ${:.6}", cost)?;
        }
        if let Some(cmp) = &self.comparison {
            writeln!(f)?;
            writeln!(f, "TOON Comparison:")?;
            writeln!(f, "Original (JSON): {} tokens", cmp.baseline_tokens())?;
            writeln!(f, "TOON Format: {} tokens", cmp.compact_tokens())?;
            writeln!(
                f,
                "Savings: {} tokens ({:.1}%)",
                cmp.tokens_saved(),
                cmp.reduction_percentage()
            )?;
            writeln!(f, "Cost Savings: ${:.6}", cmp.estimated_cost_savings())?;
        }
        write!(f, "{}", RULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Value, WhitespaceCounter};

    fn keys_encoder(value: &Value, _: &EncodeOptions) -> Result<String> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::encode("expected an object"))?;
        Ok(obj.keys().cloned().collect::<Vec<_>>().join(" "))
    }

    #[test]
    fn test_measure() {
        let stats = TextStats::measure("  a b\n\nc  \n", &WhitespaceCounter);
        assert_eq!(
            stats,
            TextStats {
                tokens: 3,
                characters: 11,
                words: 3,
                lines: 4
            }
        );
        assert_eq!(TextStats::measure("", &WhitespaceCounter), TextStats::default());
    }

    #[test]
    fn test_report_without_comparison() {
        let pricing = PricingModel::builtin().unwrap();
        let stats = TextStats {
            tokens: 1_000_000,
            characters: 10,
            words: 2,
            lines: 1,
        };
        let report = TokenReport::new(stats, &pricing, "openai-gpt5").unwrap();
        assert_eq!(
            report.to_string(),
            "Token Counter Report\n\
             ━━━━━━━━━━━━━━━━━━━━\n\
             Tokens: 1000000\n\
             Characters: 10\n\
             Words: 2\n\
             Lines: 1\n\
             \n\
             Cost Estimates (GPT-5):\n\
             Input: $1.250000\n\
             Output: $10.000000\n\
             ━━━━━━━━━━━━━━━━━━━━"
        );
    }

    #[test]
    fn test_tier_without_output_rate() {
        let pricing = PricingModel::builtin().unwrap();
        let report =
            TokenReport::new(TextStats::default(), &pricing, "openai-gpt5-mini").unwrap();
        assert_eq!(report.output_cost, None);
        assert!(!report.to_string().contains("Output:"));
        assert!(TokenReport::new(TextStats::default(), &pricing, "nope").is_err());
    }

    #[test]
    fn test_compare_json() {
        let pricing = PricingModel::builtin().unwrap();
        let text = r#"{"alpha": 1, "beta": 2}"#;
        let stats = TextStats::measure(text, &WhitespaceCounter);
        let report = TokenReport::new(stats, &pricing, "openai-gpt5")
            .unwrap()
            .compare_json(text, &keys_encoder, &WhitespaceCounter);

        let cmp = report.comparison.as_ref().unwrap();
        assert_eq!(cmp.baseline_tokens(), 4);
        assert_eq!(cmp.compact_tokens(), 2);
        assert!(report.to_string().contains("Savings: 2 tokens (50.0%)"));
    }

    #[test]
    fn test_compare_json_ignores_non_json() {
        let pricing = PricingModel::builtin().unwrap();
        let report = TokenReport::new(TextStats::default(), &pricing, "openai-gpt5")
            .unwrap()
            .compare_json("name: x", &keys_encoder, &WhitespaceCounter)
            .compare_json("[1]", &keys_encoder, &WhitespaceCounter);
        assert_eq!(report.comparison, None);
    }
}
