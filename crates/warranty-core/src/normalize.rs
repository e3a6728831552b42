//! # Normalization Module
//!
//! Turns loosely-typed upstream values into the safe defaults the engine
//! works with.
//!
//! ## Normalization Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Where Values Get Defaulted                          │
//! │                                                                         │
//! │  Layer 1: Deserialization (types.rs)                                   │
//! │  ├── "3", 3, 3.0      → Some(3.0)                                      │
//! │  └── "abc", null, NaN → None                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity  → whole number ≥ 1                                      │
//! │  ├── expansion → number of queue entries for one serial                │
//! │  └── text      → present only when non-blank                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine (pool, allocator, generator)                          │
//! │  └── never sees a negative, fractional or missing count                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Upper bound for any single quantity: pages per item, copies per
/// component, queue entries per serial. Larger values are clamped so one
/// runaway number cannot exhaust memory.
pub const MAX_QUANTITY: u32 = 10_000;

/// Normalizes an item or bundle-component quantity.
///
/// ## Rules
/// - Absent, non-finite or `<= 0` → 1
/// - Fractional (e.g. `2.5`) → 1
/// - Above [`MAX_QUANTITY`] → [`MAX_QUANTITY`]
/// - Otherwise the integer value
///
/// ## Example
/// ```rust
/// use warranty_core::normalize::normalize_quantity;
///
/// assert_eq!(normalize_quantity(Some(3.0)), 3);
/// assert_eq!(normalize_quantity(Some(2.5)), 1);
/// assert_eq!(normalize_quantity(Some(-4.0)), 1);
/// assert_eq!(normalize_quantity(None), 1);
/// ```
pub fn normalize_quantity(quantity: Option<f64>) -> u32 {
    match quantity {
        Some(q) if q.is_finite() && q > 0.0 && q.fract() == 0.0 => {
            q.min(f64::from(MAX_QUANTITY)) as u32
        }
        _ => 1,
    }
}

/// Number of queue entries produced by one serial relationship.
///
/// Absent, non-finite or `<= 0` quantities count once. A fractional quantity
/// counts every started unit, so `2.5` expands to three entries. The count
/// never exceeds [`MAX_QUANTITY`].
pub fn expansion_count(quantity: Option<f64>) -> usize {
    match quantity {
        Some(q) if q.is_finite() && q > 0.0 => q.ceil().min(f64::from(MAX_QUANTITY)) as usize,
        _ => 1,
    }
}

/// Returns the trimmed text when it is non-blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
