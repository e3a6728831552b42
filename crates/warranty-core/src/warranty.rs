//! # Warranty Rules
//!
//! Computes the warranty length printed on a certificate.
//!
//! ## Effective Warranty
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    effective = max(configured, statutory)               │
//! │                                                                         │
//! │  configured  = warranty_period × warranty_period_unit   (merchant)     │
//! │  statutory   = legal minimum from the LINE's gross price (HUF only)    │
//! │                                                                         │
//! │     HUF price              statutory                                   │
//! │     ─────────────────────  ─────────                                   │
//! │     < 10 000               0                                           │
//! │     10 000 ..< 250 000     730 days  (2 years)                         │
//! │     ≥ 250 000              1095 days (3 years)                         │
//! │                                                                         │
//! │  Bundle components are checked against the BUNDLE's price, not their   │
//! │  own notional value: the customer bought the whole line.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Labels
//! Days are phrased at the coarsest exact unit: `1095` → `"3 év"`,
//! `60` → `"2 hónap"`, `45` → `"45 nap"`.

use serde::{Deserialize, Serialize};

use crate::types::Product;

// =============================================================================
// Units
// =============================================================================

pub const DAY: f64 = 1.0;
pub const WEEK: f64 = 7.0;
pub const MONTH: f64 = 30.0;
pub const YEAR: f64 = 365.0;

// =============================================================================
// Statutory Table
// =============================================================================

/// One price threshold of the statutory table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatutoryTier {
    /// Lowest gross price (inclusive) this tier applies to.
    pub min_price: f64,
    /// Minimum warranty, in days.
    pub days: u32,
}

/// Statutory minimum warranty, tied to one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutoryRule {
    /// Currency the table applies to (case-insensitive).
    #[serde(default = "default_statutory_currency")]
    pub currency: String,

    #[serde(default = "default_statutory_tiers")]
    pub tiers: Vec<StatutoryTier>,
}

fn default_statutory_currency() -> String {
    "HUF".to_string()
}

fn default_statutory_tiers() -> Vec<StatutoryTier> {
    vec![
        StatutoryTier {
            min_price: 250_000.0,
            days: 1095,
        },
        StatutoryTier {
            min_price: 10_000.0,
            days: 730,
        },
    ]
}

impl Default for StatutoryRule {
    fn default() -> Self {
        StatutoryRule {
            currency: default_statutory_currency(),
            tiers: default_statutory_tiers(),
        }
    }
}

impl StatutoryRule {
    /// Returns true if the rule covers `currency`.
    pub fn applies_to(&self, currency: &str) -> bool {
        self.currency.trim().eq_ignore_ascii_case(currency.trim())
    }
}

// =============================================================================
// Day Computations
// =============================================================================

/// Merchant-configured warranty in days, or 0 without valid data.
///
/// `warranty_period_unit` is used directly as a day multiplier, so units
/// outside 1/7/30/365 are accepted as-is.
pub fn configured_days(product: &Product) -> f64 {
    match (product.warranty_period, product.warranty_period_unit) {
        (Some(period), Some(unit))
            if period.is_finite() && unit.is_finite() && period > 0.0 && unit > 0.0 =>
        {
            period * unit
        }
        _ => 0.0,
    }
}

/// Returns true if the product has a configured warranty.
pub fn has_warranty_data(product: &Product) -> bool {
    configured_days(product) > 0.0
}

/// Statutory minimum in days for a line price.
///
/// ## Rules
/// - Currency other than the rule's currency → 0
/// - Missing, non-finite or non-positive price → 0
/// - Otherwise the days of the highest tier the price reaches, or 0
///
/// ## Example
/// ```rust
/// use warranty_core::warranty::{statutory_days, StatutoryRule};
///
/// let rule = StatutoryRule::default();
/// assert_eq!(statutory_days(Some(10000.0), "HUF", &rule), 730.0);
/// assert_eq!(statutory_days(Some(9999.99), "HUF", &rule), 0.0);
/// assert_eq!(statutory_days(Some(300000.0), "EUR", &rule), 0.0);
/// ```
pub fn statutory_days(price: Option<f64>, currency: &str, rule: &StatutoryRule) -> f64 {
    if !rule.applies_to(currency) {
        return 0.0;
    }

    let price = match price {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return 0.0,
    };

    rule.tiers
        .iter()
        .filter(|tier| price >= tier.min_price)
        .max_by(|a, b| a.min_price.total_cmp(&b.min_price))
        .map(|tier| tier.days as f64)
        .unwrap_or(0.0)
}

/// `max(configured, statutory)` for one product priced by its line.
///
/// `reference_price` is always the enclosing item's gross price, also for
/// bundle components.
pub fn effective_days(
    product: &Product,
    reference_price: Option<f64>,
    currency: &str,
    rule: &StatutoryRule,
) -> f64 {
    configured_days(product).max(statutory_days(reference_price, currency, rule))
}

// =============================================================================
// Labels
// =============================================================================

/// Phrases a day count at the coarsest exact unit.
///
/// ## Example
/// ```rust
/// use warranty_core::warranty::days_label;
///
/// assert_eq!(days_label(1095.0), "3 év");
/// assert_eq!(days_label(180.0), "6 hónap");
/// assert_eq!(days_label(14.0), "14 nap");
/// assert_eq!(days_label(0.0), "");
/// ```
pub fn days_label(days: f64) -> String {
    if !days.is_finite() || days <= 0.0 {
        return String::new();
    }

    if days % YEAR == 0.0 {
        format!("{} év", days / YEAR)
    } else if days % MONTH == 0.0 {
        format!("{} hónap", days / MONTH)
    } else {
        format!("{} nap", days)
    }
}

/// Effective warranty label for a product, or `None` when there is none.
pub fn effective_label(
    product: &Product,
    reference_price: Option<f64>,
    currency: &str,
    rule: &StatutoryRule,
) -> Option<String> {
    let label = days_label(effective_days(product, reference_price, currency, rule));
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
