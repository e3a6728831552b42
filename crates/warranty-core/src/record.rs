//! # Certificate Records
//!
//! The engine's output: one [`Record`] per physical unit sold, ready for a
//! renderer to lay out as a page.
//!
//! ## Record Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record  (instance k of n)                                              │
//! │    product: ProductFields    category, type, SKU, warranty, maker ...  │
//! │    serials: "A, B"           standalone items only                     │
//! │    comment, price                                                       │
//! │    components: [                                                        │
//! │      ComponentRecord (copy r of m) { product, serial }                 │
//! │      ...                                                                │
//! │    ]                          bundles only, may be empty                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every optional field is `None` when its value would be blank, so a
//! renderer only has to skip absent rows.

use serde::Serialize;
use ts_rs::TS;

use crate::normalize::non_blank;
use crate::types::Product;

// =============================================================================
// Product Fields
// =============================================================================

/// Product rows shared by top-level and component records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    /// Product name (primary category).
    pub category_name: Option<String>,
    /// Product type.
    pub display_name: Option<String>,
    pub sku: Option<String>,
    /// Effective warranty label, e.g. `"3 év"`.
    pub warranty: Option<String>,
    pub manufacturer_name: Option<String>,
    pub country_of_origin: Option<String>,
}

impl ProductFields {
    /// Copies the printable fields of a product with an already computed
    /// warranty label.
    pub fn from_product(product: &Product, warranty: Option<String>) -> Self {
        ProductFields {
            category_name: non_blank(product.category_name.as_deref()),
            display_name: non_blank(product.display_name.as_deref()),
            sku: non_blank(product.sku.as_deref()),
            warranty: warranty.filter(|w| !w.trim().is_empty()),
            manufacturer_name: non_blank(product.manufacturer_name.as_deref()),
            country_of_origin: non_blank(product.country_of_origin.as_deref()),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One certificate page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// 1-based instance number.
    pub instance: u32,
    /// Number of instances of the item.
    pub of: u32,
    pub product: ProductFields,
    /// Serials of this instance, comma-separated. Always `None` for bundles.
    pub serials: Option<String>,
    /// Free-text identification data.
    pub comment: Option<String>,
    /// Formatted gross price of the line.
    pub price: Option<String>,
    pub components: Vec<ComponentRecord>,
}

/// One copy of a bundle component under a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// 1-based copy number within this component.
    pub instance: u32,
    /// Copies of this component per bundle instance.
    pub of: u32,
    pub product: ProductFields,
    pub serial: Option<String>,
}

impl Record {
    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }

    /// Every serial printed on the page, component serials included.
    pub fn all_serials(&self) -> Vec<&str> {
        let own = self
            .serials
            .iter()
            .flat_map(|s| s.split(crate::distributor::SERIAL_SEPARATOR));
        let components = self.components.iter().filter_map(|c| c.serial.as_deref());
        own.chain(components).collect()
    }
}
