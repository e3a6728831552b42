//! # Serial Pool
//!
//! Run-scoped bookkeeping of the order's serial numbers.
//!
//! ## Two Indexes, Built Once
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  order.serial_relationships                                            │
//! │    { sku: "TV", number: "A", quantity: 2 }                             │
//! │    { sku: "TV", number: "B", quantity: 1 }                             │
//! │    { sku: "RC", number: "R1" }                                         │
//! │                     │                                                   │
//! │        build_serial_maps()                                             │
//! │          ┌──────────┴───────────┐                                      │
//! │          ▼                      ▼                                       │
//! │  SerialPool (mutable)       SerialIndex (read-only)                    │
//! │    "TV" → [A, A, B]           "A"  → "TV"                              │
//! │    "RC" → [R1]                "B"  → "TV"                              │
//! │                               "R1" → "RC"                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pool Invariant
//! A serial occupies its SKU queue once per unit of quantity. The pool is
//! only ever drained: by [`consume_standalone_serials`] for serials already
//! tied to standalone items, and by the allocator for bundle components.
//!
//! Items may also carry serials the order never listed. Those have no queue
//! entry to drain, so the pool remembers each one it hands out and refuses
//! it the second time.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::normalize::{expansion_count, non_blank};
use crate::types::{Item, ItemSerial, Order};

// =============================================================================
// Serial Pool
// =============================================================================

/// SKU → FIFO queue of serials not yet handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialPool {
    queues: HashMap<String, VecDeque<String>>,
    /// Every serial the order listed, under any SKU.
    listed: HashSet<String>,
    /// Unlisted serials already claimed this run.
    claimed_unlisted: HashSet<String>,
}

impl SerialPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one unit of `serial` to the back of the SKU's queue.
    pub fn push_back(&mut self, sku: &str, serial: &str) {
        self.listed.insert(serial.to_string());
        self.queues
            .entry(sku.to_string())
            .or_default()
            .push_back(serial.to_string());
    }

    /// Takes the oldest serial of a SKU.
    pub fn pop_front(&mut self, sku: &str) -> Option<String> {
        self.queues.get_mut(sku).and_then(VecDeque::pop_front)
    }

    /// Removes the first occurrence of `serial` from the SKU's queue.
    ///
    /// Returns false if the serial was not there; that is not an error.
    pub fn remove_first(&mut self, sku: &str, serial: &str) -> bool {
        let Some(queue) = self.queues.get_mut(sku) else {
            return false;
        };
        match queue.iter().position(|s| s == serial) {
            Some(idx) => queue.remove(idx).is_some(),
            None => false,
        }
    }

    /// Claims one unit of a specific serial for `sku`.
    ///
    /// A listed serial is claimed by draining one queue entry; once its
    /// entries are gone (or it sits under another SKU) the claim fails. An
    /// unlisted serial can be claimed exactly once per run.
    pub fn claim(&mut self, sku: &str, serial: &str) -> bool {
        if self.remove_first(sku, serial) {
            return true;
        }
        !self.listed.contains(serial) && self.claimed_unlisted.insert(serial.to_string())
    }

    /// Returns true if [`claim`](Self::claim) would succeed.
    pub fn can_claim(&self, sku: &str, serial: &str) -> bool {
        if self.listed.contains(serial) {
            self.queues
                .get(sku)
                .is_some_and(|queue| queue.iter().any(|s| s == serial))
        } else {
            !self.claimed_unlisted.contains(serial)
        }
    }

    /// Number of units still available for a SKU.
    pub fn available(&self, sku: &str) -> usize {
        self.queues.get(sku).map_or(0, VecDeque::len)
    }

    pub fn is_available(&self, sku: &str) -> bool {
        self.available(sku) > 0
    }

    /// Total units left across all SKUs.
    pub fn total_available(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Units left per SKU, in SKU order. Exhausted SKUs report 0.
    pub fn remaining(&self) -> BTreeMap<String, usize> {
        self.queues
            .iter()
            .map(|(sku, queue)| (sku.clone(), queue.len()))
            .collect()
    }
}

// =============================================================================
// Serial Index
// =============================================================================

/// Serial → owning SKU, for attributing an item's own serials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialIndex {
    owners: HashMap<String, String>,
}

impl SerialIndex {
    /// Records the owner of a serial; a later entry for the same serial wins.
    pub fn insert(&mut self, serial: &str, sku: &str) {
        self.owners.insert(serial.to_string(), sku.to_string());
    }

    pub fn sku_of(&self, serial: &str) -> Option<&str> {
        self.owners.get(serial).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builds the pool and the reverse index from the order's serials.
///
/// Entries with a blank SKU or number are skipped. Quantities expand per
/// [`expansion_count`].
pub fn build_serial_maps(order: &Order) -> (SerialPool, SerialIndex) {
    let mut pool = SerialPool::new();
    let mut index = SerialIndex::default();

    for relationship in &order.serial_relationships {
        let sku = non_blank(relationship.sku.as_deref());
        let number = non_blank(relationship.number.as_deref());
        let (Some(sku), Some(number)) = (sku, number) else {
            continue;
        };

        for _ in 0..expansion_count(relationship.quantity) {
            pool.push_back(&sku, &number);
        }
        index.insert(&number, &sku);
    }

    debug!(
        skus = pool.queues.len(),
        units = pool.total_available(),
        serials = index.len(),
        "Serial pool built"
    );
    (pool, index)
}

/// Expands an item's own serial list, one entry per unit.
///
/// ## Example
/// ```rust
/// use warranty_core::pool::expand_item_serials;
/// use warranty_core::types::ItemSerial;
///
/// let serials = vec![ItemSerial::new("A", 2.0), ItemSerial::new("B", 1.0)];
/// assert_eq!(expand_item_serials(&serials), vec!["A", "A", "B"]);
/// ```
pub fn expand_item_serials(list: &[ItemSerial]) -> Vec<String> {
    let mut out = Vec::new();
    for entry in list {
        let Some(number) = non_blank(entry.number.as_deref()) else {
            continue;
        };
        for _ in 0..expansion_count(entry.quantity) {
            out.push(number.clone());
        }
    }
    out
}

// =============================================================================
// Standalone Consumption
// =============================================================================

/// Releases serials already bound to standalone items from the pool.
///
/// Must run before any bundle allocation, so bundle components only see
/// serials that no standalone item claims. Each of an item's serials is
/// [claimed](SerialPool::claim) for its product's SKU; misses are ignored.
pub fn consume_standalone_serials(items: &[Item], pool: &mut SerialPool) {
    for (position, item) in items.iter().enumerate() {
        if item.is_bundle() {
            continue;
        }
        let Some(sku) = item.product.sku() else {
            continue;
        };

        let serials = expand_item_serials(&item.own_serial_relationships);
        let claimed = serials
            .iter()
            .filter(|serial| pool.claim(sku, serial))
            .count();

        if !serials.is_empty() {
            debug!(
                position,
                sku,
                serials = serials.len(),
                claimed,
                "Standalone serials consumed"
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
