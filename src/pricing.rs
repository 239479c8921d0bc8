//! Versioned pricing schedules for converting token counts into money.
//!
//! Rates are prices per million tokens. A [`PricingModel`] is static
//! configuration: the crate ships one dated schedule
//! ([`PricingModel::builtin`]) and callers can load their own from JSON. A
//! rate is only ever read from a schedule or passed in explicitly.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::PricingModel;
//!
//! let pricing = PricingModel::builtin().unwrap();
//! assert_eq!(pricing.version(), "2025-11");
//!
//! let rate = pricing.rate("openai-gpt4.1").unwrap();
//! assert!((rate.cost(1_000_000) - 3.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const BUILTIN_SCHEDULE: &str = include_str!("../data/pricing-2025-11.json");

/// A price per million tokens. Always finite and non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct Rate(f64);

impl Rate {
    pub const ZERO: Rate = Rate(0.0);

    /// Validates a price per million tokens.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::Rate;
    ///
    /// assert!(Rate::new(1.25).is_ok());
    /// assert!(Rate::new(-1.0).is_err());
    /// assert!(Rate::new(f64::NAN).is_err());
    /// ```
    pub fn new(per_million: f64) -> Result<Self> {
        if !per_million.is_finite() || per_million < 0.0 {
            return Err(Error::pricing(format!(
                "rate must be a finite, non-negative price per million tokens, got {}",
                per_million
            )));
        }
        Ok(Rate(per_million))
    }

    #[must_use]
    pub const fn per_million(&self) -> f64 {
        self.0
    }

    /// Cost of `tokens` at this rate. Negative token counts give negative cost.
    #[must_use]
    pub fn cost(&self, tokens: i64) -> f64 {
        estimate_cost(tokens, *self)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}/1M tokens", self.0)
    }
}

/// `tokens / 1_000_000 * rate`.
#[must_use]
pub fn estimate_cost(tokens: i64, rate: Rate) -> f64 {
    tokens as f64 / 1_000_000.0 * rate.per_million()
}

/// Input and optional output price of one model tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
}

/// A dated pricing schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingModel {
    version: String,
    effective: NaiveDate,
    currency: String,
    default_tier: String,
    tiers: IndexMap<String, TierPrice>,
}

/// The cost of a token count under one tier, as produced by
/// [`PricingModel::cost_table`].
#[derive(Clone, Debug, PartialEq)]
pub struct TierCost<'a> {
    pub tier: &'a str,
    pub price: &'a TierPrice,
    pub cost: f64,
}

impl PricingModel {
    /// The schedule bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_SCHEDULE)
    }

    /// Parses and validates a schedule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::PricingModel;
    ///
    /// let json = r#"{
    ///     "version": "custom",
    ///     "effective": "2026-01-01",
    ///     "currency": "EUR",
    ///     "default_tier": "small",
    ///     "tiers": { "small": { "input": 0.5 } }
    /// }"#;
    /// let pricing = PricingModel::from_json_str(json).unwrap();
    /// assert_eq!(pricing.currency(), "EUR");
    /// assert_eq!(pricing.default_rate().per_million(), 0.5);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: PricingModel = serde_json::from_str(json)
            .map_err(|e| Error::pricing(format!("invalid pricing schedule: {}", e)))?;
        model.validate()?;
        debug!(
            "Loaded pricing schedule {} ({} tiers, effective {})",
            model.version,
            model.tiers.len(),
            model.effective
        );
        Ok(model)
    }

    /// Reads a schedule from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(Error::pricing("schedule has no tiers"));
        }
        for (tier, price) in &self.tiers {
            if !price.input.is_finite() || price.input <= 0.0 {
                return Err(Error::pricing(format!(
                    "tier '{}' has invalid input rate {}",
                    tier, price.input
                )));
            }
            if let Some(output) = price.output {
                if !output.is_finite() || output <= 0.0 {
                    return Err(Error::pricing(format!(
                        "tier '{}' has invalid output rate {}",
                        tier, output
                    )));
                }
            }
        }
        if !self.tiers.contains_key(&self.default_tier) {
            return Err(Error::pricing(format!(
                "default tier '{}' is not in the schedule",
                self.default_tier
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn effective(&self) -> NaiveDate {
        self.effective
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn default_tier(&self) -> &str {
        &self.default_tier
    }

    /// Tier identifiers in schedule order.
    pub fn tiers(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    pub fn tier(&self, tier: &str) -> Result<&TierPrice> {
        self.tiers
            .get(tier)
            .ok_or_else(|| Error::pricing(format!("unknown pricing tier '{}'", tier)))
    }

    /// Input rate of `tier`.
    pub fn rate(&self, tier: &str) -> Result<Rate> {
        Rate::new(self.tier(tier)?.input)
    }

    /// Input rate of the default tier.
    #[must_use]
    pub fn default_rate(&self) -> Rate {
        self.tiers
            .get(&self.default_tier)
            .map(|price| Rate(price.input))
            .unwrap_or(Rate::ZERO)
    }

    /// Output rate of `tier`, or `None` when the schedule does not list one.
    pub fn output_rate(&self, tier: &str) -> Result<Option<Rate>> {
        self.tier(tier)?.output.map(Rate::new).transpose()
    }

    /// Input cost of `tokens` for every tier, in schedule order.
    #[must_use]
    pub fn cost_table(&self, tokens: i64) -> Vec<TierCost<'_>> {
        self.tiers
            .iter()
            .map(|(tier, price)| TierCost {
                tier,
                price,
                cost: estimate_cost(tokens, Rate(price.input)),
            })
            .collect()
    }
}
