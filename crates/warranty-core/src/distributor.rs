//! # Serial Distributor
//!
//! Splits a standalone item's own serials across its physical instances.
//!
//! ```text
//!   qty  serials          slots
//!   ───  ───────────────  ───────────────────
//!   1    [A, B]           ["A, B"]
//!   3    [A, B, C]        ["A", "B", "C"]
//!   3    [A, B]           ["A", "B", ""]
//!   2    [A, B, C]        ["A", "B, C"]      overflow lands on the last slot
//! ```

/// Separator used when several serials share a slot.
pub const SERIAL_SEPARATOR: &str = ", ";

/// Distributes `serials` over `qty` slots. `qty == 0` is treated as 1.
///
/// Always returns exactly `max(qty, 1)` entries; slots without a serial are
/// empty strings.
pub fn distribute(qty: u32, serials: &[String]) -> Vec<String> {
    let slots = qty.max(1) as usize;

    if slots == 1 {
        return vec![serials.join(SERIAL_SEPARATOR)];
    }

    let mut result = vec![String::new(); slots];
    if serials.len() <= slots {
        for (slot, serial) in result.iter_mut().zip(serials) {
            slot.clone_from(serial);
        }
        return result;
    }

    for (slot, serial) in result.iter_mut().zip(&serials[..slots - 1]) {
        slot.clone_from(serial);
    }
    result[slots - 1] = serials[slots - 1..].join(SERIAL_SEPARATOR);
    result
}

// =============================================================================
// Unit Tests
// =============================================================================
