//! # Money Module
//!
//! Display formatting for the gross price printed on each certificate.
//!
//! ## Why Not Parse Into a Number?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE PRICE IS ALREADY FINAL                                             │
//! │                                                                         │
//! │  The gross price arrives from the order system in whatever shape it    │
//! │  was stored:  1234567.89   "1234567.89"   "1.234.567,89"   "12 990"    │
//! │                                                                         │
//! │  The certificate must show exactly what the customer paid, so we       │
//! │  never round or re-derive decimals. We only:                           │
//! │    1. group the integer digits in threes with a space                  │
//! │    2. keep the fractional part verbatim                                │
//! │    3. append a currency label (symbol or ISO code)                     │
//! │                                                                         │
//! │    1234567.89 + HUF  →  "1 234 567.89 Ft"                              │
//! │    1234567    + EUR  →  "1 234 567 EUR"                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warranty_core::money::{Amount, MoneyFormatter};
//! use warranty_core::config::MoneyConfig;
//!
//! let formatter = MoneyFormatter::from_config(&MoneyConfig::default());
//! let price = Amount::Number(1234567.89);
//! assert_eq!(formatter.format(Some(&price), "HUF"), "1 234 567.89 Ft");
//! assert_eq!(formatter.format(Some(&price), "EUR"), "1 234 567.89 EUR");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MoneyConfig;

const NBSP: char = '\u{00A0}';

// =============================================================================
// Amount
// =============================================================================

/// A monetary amount in the form it was given upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Reads the amount as a number for threshold checks.
    ///
    /// Text is trimmed and parsed; blank or unparsable text is `None`.
    ///
    /// ## Example
    /// ```rust
    /// use warranty_core::money::Amount;
    ///
    /// assert_eq!(Amount::Text(" 10000 ".into()).as_number(), Some(10000.0));
    /// assert_eq!(Amount::Text("12 990".into()).as_number(), None);
    /// assert_eq!(Amount::Number(9999.99).as_number(), Some(9999.99));
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    s.parse::<f64>().ok()
                }
            }
        };
        value.filter(|v| v.is_finite())
    }

    /// Returns true for an empty text amount.
    pub fn is_empty(&self) -> bool {
        matches!(self, Amount::Text(s) if s.is_empty())
    }
}

/// The verbatim source text that gets grouped for display.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Digit Grouping
// =============================================================================

/// Groups the integer digits in threes with a single space.
///
/// ## Decimal Separator Detection
/// The rightmost `.` or `,` is the decimal separator, whatever the locale:
/// ```text
///   "1234567.89"    → int "1234567"    frac "89"  → "1 234 567.89"
///   "1.234.567,89"  → int "1.234.567"  frac "89"  → "1 234 567,89"
///   "1234567"       → no separator                → "1 234 567"
/// ```
/// Everything but digits is stripped from the integer part; a leading `-`
/// is kept. The fractional part is copied as-is.
pub fn group_thousands(value: &str) -> String {
    let normalized = value.replace(NBSP, " ");
    let s = normalized.trim();

    let separator = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(idx), None) | (None, Some(idx)) => Some(idx),
        (None, None) => None,
    };

    let (int_part, decimal) = match separator {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    };

    let (sign, int_part) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let digits: Vec<char> = int_part.chars().filter(char::is_ascii_digit).collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*digit);
    }

    format!("{}{}{}", sign, grouped, decimal)
}

// =============================================================================
// Currency Label
// =============================================================================

/// Extracts the currency symbol from a sample rendering such as `"0 Ft"`.
///
/// The last space-separated token is the symbol unless it is purely
/// numeric (digits, `.` and `,`), in which case no symbol was found.
///
/// ## Example
/// ```rust
/// use warranty_core::money::extract_currency_symbol;
///
/// assert_eq!(extract_currency_symbol("0 Ft"), Some("Ft".to_string()));
/// assert_eq!(extract_currency_symbol("0,00"), None);
/// ```
pub fn extract_currency_symbol(sample: &str) -> Option<String> {
    let normalized = sample.replace(NBSP, " ");
    let last = normalized.trim().split(' ').last().unwrap_or_default();

    let numeric = last
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',');
    if last.is_empty() || numeric {
        None
    } else {
        Some(last.to_string())
    }
}

/// Which currencies are labelled with a symbol instead of their ISO code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRules {
    /// Use the symbol for every currency.
    #[serde(default)]
    pub convert_all: bool,

    /// Per-currency opt in (`HUF = true` by default).
    #[serde(default = "default_convert_only")]
    pub convert_only: BTreeMap<String, bool>,
}

fn default_convert_only() -> BTreeMap<String, bool> {
    BTreeMap::from([("HUF".to_string(), true)])
}

impl Default for SymbolRules {
    fn default() -> Self {
        SymbolRules {
            convert_all: false,
            convert_only: default_convert_only(),
        }
    }
}

impl SymbolRules {
    /// Returns true if `code` should be shown with the symbol.
    pub fn use_symbol(&self, code: &str) -> bool {
        if code.is_empty() {
            return false;
        }
        self.convert_all || self.convert_only.get(code).copied().unwrap_or(false)
    }
}

// =============================================================================
// Money Formatter
// =============================================================================

/// Formats gross prices for the certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    symbol: Option<String>,
    rules: SymbolRules,
}

impl MoneyFormatter {
    pub fn new(symbol: Option<String>, rules: SymbolRules) -> Self {
        MoneyFormatter { symbol, rules }
    }

    /// Builds the formatter from configuration, extracting the symbol once.
    pub fn from_config(config: &MoneyConfig) -> Self {
        MoneyFormatter::new(
            extract_currency_symbol(&config.currency_sample),
            config.symbol_rules(),
        )
    }

    /// Returns the label printed after the amount.
    ///
    /// Falls back to the ISO code when the currency has no symbol policy
    /// or no symbol could be extracted.
    pub fn currency_label<'a>(&'a self, code: &'a str) -> &'a str {
        match self.symbol.as_deref() {
            Some(symbol) if self.rules.use_symbol(code) => symbol,
            _ => code,
        }
    }

    /// Formats an amount with its currency label.
    ///
    /// Missing or empty amounts format to an empty string.
    pub fn format(&self, amount: Option<&Amount>, currency: &str) -> String {
        let amount = match amount {
            Some(a) if !a.is_empty() => a,
            _ => return String::new(),
        };

        let grouped = group_thousands(&amount.to_string());
        if grouped.is_empty() {
            return String::new();
        }

        let label = self.currency_label(currency);
        if label.is_empty() {
            grouped
        } else {
            format!("{} {}", grouped, label)
        }
    }
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        MoneyFormatter::from_config(&MoneyConfig::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
