//! # Serial Allocator
//!
//! Hands out serials to bundle components, one unit at a time.
//!
//! ## Allocation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  allocate_one("TV")                                                     │
//! │                                                                         │
//! │   1. local["TV"] non-empty?  ──yes──► pop front, claim in pool         │
//! │              │                          claimed? return it             │
//! │              no / nothing claimable     else try the next local entry  │
//! │              ▼                                                          │
//! │   2. pool["TV"] non-empty?   ──yes──► pop front                        │
//! │              │                                                          │
//! │              no                                                         │
//! │              ▼                                                          │
//! │   3. None                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every path that returns a serial also claims it in the pool, so a serial
//! is handed out at most once per run no matter which source it came from.
//! A local entry another item already took is dropped, not returned.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::pool::{SerialIndex, SerialPool};

// =============================================================================
// Local Queues
// =============================================================================

/// Per-SKU queues built from one bundle item's own serials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalQueues {
    queues: HashMap<String, VecDeque<String>>,
}

impl LocalQueues {
    /// Attributes each serial to its owning SKU through the order index.
    ///
    /// A serial unknown to the index goes to `fallback_sku` (the bundle's own
    /// SKU). With no fallback either, the serial is dropped.
    pub fn from_item_serials(
        serials: &[String],
        index: &SerialIndex,
        fallback_sku: Option<&str>,
    ) -> Self {
        let mut queues: HashMap<String, VecDeque<String>> = HashMap::new();

        for serial in serials {
            let Some(sku) = index.sku_of(serial).or(fallback_sku) else {
                continue;
            };
            queues
                .entry(sku.to_string())
                .or_default()
                .push_back(serial.clone());
        }

        LocalQueues { queues }
    }

    fn pop_front(&mut self, sku: &str) -> Option<String> {
        self.queues.get_mut(sku).and_then(VecDeque::pop_front)
    }

    fn queued(&self, sku: &str) -> impl Iterator<Item = &String> {
        self.queues.get(sku).into_iter().flatten()
    }

    /// Number of local units queued for a SKU.
    pub fn available(&self, sku: &str) -> usize {
        self.queues.get(sku).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }
}

// =============================================================================
// Allocator
// =============================================================================

/// Allocates serials for one bundle item.
///
/// Borrows the run's pool mutably for the duration of the item, so no other
/// code can touch the pool while components are being served.
#[derive(Debug)]
pub struct SerialAllocator<'a> {
    pool: &'a mut SerialPool,
    local: LocalQueues,
}

impl<'a> SerialAllocator<'a> {
    pub fn new(pool: &'a mut SerialPool, local: LocalQueues) -> Self {
        SerialAllocator { pool, local }
    }

    /// Allocates one serial for `sku`, local queue first.
    ///
    /// A blank SKU never allocates.
    pub fn allocate_one(&mut self, sku: &str) -> Option<String> {
        if sku.trim().is_empty() {
            return None;
        }

        while let Some(serial) = self.local.pop_front(sku) {
            if self.pool.claim(sku, &serial) {
                trace!(sku, serial = %serial, source = "local", "Serial allocated");
                return Some(serial);
            }
            trace!(sku, serial = %serial, "Local serial already taken");
        }

        let serial = self.pool.pop_front(sku)?;
        trace!(sku, serial = %serial, source = "pool", "Serial allocated");
        Some(serial)
    }

    /// Returns true if [`allocate_one`](Self::allocate_one) would succeed.
    pub fn has_available(&self, sku: &str) -> bool {
        if sku.trim().is_empty() {
            return false;
        }
        self.local
            .queued(sku)
            .any(|serial| self.pool.can_claim(sku, serial))
            || self.pool.is_available(sku)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
