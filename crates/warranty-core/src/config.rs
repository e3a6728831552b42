//! # Engine Configuration
//!
//! Settings consumed by the engine: how prices are labelled and which
//! statutory warranty table applies.
//!
//! ## Configuration File Format
//! The CLI embeds this struct in its own TOML file:
//! ```toml
//! [money]
//! currency_sample = "0 Ft"   # how the shop renders zero in its currency
//! convert_all = false        # label every currency with its symbol
//! [money.convert_only]
//! HUF = true
//!
//! [statutory]
//! currency = "HUF"
//! tiers = [
//!     { min_price = 250000, days = 1095 },
//!     { min_price = 10000, days = 730 },
//! ]
//! ```
//!
//! This module only describes and validates the values. Reading files and
//! environment variables is the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::SymbolRules;
use crate::warranty::StatutoryRule;

// =============================================================================
// Money Configuration
// =============================================================================

/// Currency label settings for the money formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyConfig {
    /// A rendering of zero in the shop's currency, e.g. `"0 Ft"`.
    /// The symbol is the last token when it is not numeric.
    #[serde(default = "default_currency_sample")]
    pub currency_sample: String,

    #[serde(flatten)]
    pub rules: SymbolRules,
}

fn default_currency_sample() -> String {
    "0 Ft".to_string()
}

impl Default for MoneyConfig {
    fn default() -> Self {
        MoneyConfig {
            currency_sample: default_currency_sample(),
            rules: SymbolRules::default(),
        }
    }
}

impl MoneyConfig {
    pub fn symbol_rules(&self) -> SymbolRules {
        self.rules.clone()
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub money: MoneyConfig,

    #[serde(default)]
    pub statutory: StatutoryRule,
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// ## Rules
    /// - Statutory currency must not be blank
    /// - Every tier needs a finite, non-negative `min_price`
    /// - Every tier needs positive `days`
    pub fn validate(&self) -> CoreResult<()> {
        if self.statutory.currency.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "statutory.currency".to_string(),
            }
            .into());
        }

        for (i, tier) in self.statutory.tiers.iter().enumerate() {
            if !tier.min_price.is_finite() || tier.min_price < 0.0 {
                return Err(ValidationError::InvalidFormat {
                    field: format!("statutory.tiers[{}].min_price", i),
                    reason: "must be a finite, non-negative amount".to_string(),
                }
                .into());
            }
            if tier.days == 0 {
                return Err(ValidationError::MustBePositive {
                    field: format!("statutory.tiers[{}].days", i),
                }
                .into());
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
