//! # warranty-core: Serial Allocation & Warranty Engine
//!
//! Turns an order's line items and its inventory of serial numbers into one
//! warranty certificate [`Record`] per physical unit sold.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Warranty Pages Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            warranty-pages CLI (apps/warranty-cli)               │   │
//! │  │    config file ──► read JSON ──► engine ──► text / JSON pages   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ warranty-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  ingest  │  │   pool    │  │ allocator │  │ generator │   │   │
//! │  │   │  types   │─►│ SerialPool│─►│distributor│─►│  Record   │   │   │
//! │  │   └──────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                        ┌───────────┐  ┌───────────┐            │   │
//! │  │                        │ warranty  │  │   money   │            │   │
//! │  │                        │ statutory │  │ formatter │            │   │
//! │  │                        └───────────┘  └───────────┘            │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • SINGLE PASS • NEVER FAILS ON BAD DATA               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Input model (Order, Item, Product) with lenient fields
//! - [`ingest`] - Document parsing with empty-on-failure fallback
//! - [`normalize`] - Quantity and text normalization
//! - [`pool`] - Serial pool, reverse index, standalone consumption
//! - [`allocator`] - One-at-a-time serial allocation for bundle components
//! - [`distributor`] - Standalone serial distribution across instances
//! - [`warranty`] - Configured, statutory and effective warranty
//! - [`money`] - Price display formatting
//! - [`record`] - Output records
//! - [`generator`] - The generation run
//! - [`config`] - Engine configuration
//! - [`error`] - Boundary error types
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same order, items and config give the same records
//! 2. **No I/O**: files, environment and terminals belong to the app
//! 3. **Degrade, Don't Fail**: bad numbers default, lookup misses leave fields empty
//! 4. **Issue Once**: a serial unit lands on at most one page per run
//!
//! ## Example Usage
//!
//! ```rust
//! use warranty_core::{CertificateGenerator, EngineConfig};
//! use warranty_core::ingest::{parse_items, parse_order};
//!
//! let order = parse_order(r#"{
//!     "currency": "HUF",
//!     "product_number_relationship_list": [
//!         { "product_sku": "TV-55", "number": "SN-001", "quantity": 1 }
//!     ]
//! }"#);
//! let items = parse_items(r#"[{
//!     "product": { "sku": "TV-55", "warranty_period": 1, "warranty_period_unit": 365 },
//!     "quantity": 1,
//!     "gross_price": 300000,
//!     "product_number_relationship_list": [{ "number": "SN-001", "quantity": 1 }]
//! }]"#);
//!
//! let generation = CertificateGenerator::new(EngineConfig::default()).generate(&order, &items);
//! let page = &generation.records[0];
//!
//! // 300 000 HUF lifts the one-year warranty to the three-year minimum
//! assert_eq!(page.product.warranty.as_deref(), Some("3 év"));
//! assert_eq!(page.price.as_deref(), Some("300 000 Ft"));
//! assert_eq!(page.serials.as_deref(), Some("SN-001"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod config;
pub mod distributor;
pub mod error;
pub mod generator;
pub mod ingest;
pub mod money;
pub mod normalize;
pub mod pool;
pub mod record;
pub mod types;
pub mod warranty;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{EngineConfig, MoneyConfig};
pub use error::{CoreError, CoreResult, ValidationError};
pub use generator::{CertificateGenerator, Generation};
pub use money::{Amount, MoneyFormatter};
pub use record::{ComponentRecord, ProductFields, Record};
pub use types::*;
pub use warranty::{StatutoryRule, StatutoryTier};
