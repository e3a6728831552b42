//! # Domain Types
//!
//! Input types consumed by the engine: the order with its serial inventory,
//! the order's line items and the products they reference.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────────┐        ┌──────────────────────────────┐     │
//! │  │        Order          │        │            Item              │     │
//! │  │  ───────────────────  │        │  ──────────────────────────  │     │
//! │  │  currency             │        │  product ──► Product         │     │
//! │  │  serial_relationships │        │  quantity, gross_price       │     │
//! │  │   [{sku, number, qty}]│        │  comment                     │     │
//! │  └───────────────────────┘        │  bundle_elements             │     │
//! │                                   │   [{product, quantity}]      │     │
//! │                                   │  own_serial_relationships    │     │
//! │                                   │   [{number, quantity}]       │     │
//! │                                   └──────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Fields
//! Upstream JSON is produced by a template engine and is loosely typed:
//! numbers arrive as strings, optional fields arrive as `null`, list entries
//! can be `null`. Every field here has a default, and numeric fields that
//! cannot be read become `None` instead of failing the whole document.

use serde::{Deserialize, Serialize};

use crate::money::Amount;

// =============================================================================
// Order
// =============================================================================

/// The order being documented: its currency and serialized inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// ISO 4217 currency code (e.g. "HUF").
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub currency: String,

    /// Every serial number tied to the order, with the SKU it belongs to.
    #[serde(
        default,
        rename = "product_number_relationship_list",
        alias = "serialRelationships",
        deserialize_with = "lenient::seq"
    )]
    pub serial_relationships: Vec<SerialRelationship>,
}

/// One serial number of the order's inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialRelationship {
    /// SKU the serial belongs to.
    #[serde(
        default,
        rename = "product_sku",
        alias = "sku",
        deserialize_with = "lenient::text"
    )]
    pub sku: Option<String>,

    /// The serial number itself.
    #[serde(default, deserialize_with = "lenient::text")]
    pub number: Option<String>,

    /// How many physical units carry this serial.
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
}

impl SerialRelationship {
    pub fn new(sku: &str, number: &str, quantity: f64) -> Self {
        SerialRelationship {
            sku: Some(sku.to_string()),
            number: Some(number.to_string()),
            quantity: Some(quantity),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as referenced by an item or a bundle component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stock Keeping Unit.
    #[serde(default, deserialize_with = "lenient::text")]
    pub sku: Option<String>,

    /// Product type shown on the certificate.
    #[serde(default, deserialize_with = "lenient::text")]
    pub display_name: Option<String>,

    /// Product name (primary category) shown on the certificate.
    #[serde(
        default,
        rename = "primary_category_name",
        alias = "categoryName",
        deserialize_with = "lenient::text"
    )]
    pub category_name: Option<String>,

    #[serde(
        default,
        rename = "manufacturer__name",
        alias = "manufacturerName",
        deserialize_with = "lenient::text"
    )]
    pub manufacturer_name: Option<String>,

    #[serde(default, alias = "countryOfOrigin", deserialize_with = "lenient::text")]
    pub country_of_origin: Option<String>,

    /// Merchant-configured warranty length, in `warranty_period_unit`s.
    #[serde(default, alias = "warrantyPeriod", deserialize_with = "lenient::number")]
    pub warranty_period: Option<f64>,

    /// Days per warranty unit (1 = day, 7 = week, 30 = month, 365 = year).
    #[serde(
        default,
        alias = "warrantyPeriodUnit",
        deserialize_with = "lenient::number"
    )]
    pub warranty_period_unit: Option<f64>,
}

impl Product {
    /// Creates a product with only a SKU set.
    pub fn new(sku: &str) -> Self {
        Product {
            sku: Some(sku.to_string()),
            ..Product::default()
        }
    }

    /// Sets the configured warranty (`period` × `unit_days`).
    pub fn with_warranty(mut self, period: f64, unit_days: f64) -> Self {
        self.warranty_period = Some(period);
        self.warranty_period_unit = Some(unit_days);
        self
    }

    /// The SKU when it is non-blank.
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Item
// =============================================================================

/// A line item of the order.
///
/// An item is a **bundle** iff it has at least one bundle element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub product: Product,

    /// Number of physical units; normalized by [`crate::normalize::normalize_quantity`].
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,

    /// What the customer paid for the whole line, as given upstream.
    #[serde(default, alias = "grossPrice", deserialize_with = "lenient::amount")]
    pub gross_price: Option<Amount>,

    /// Free-text identification data printed on the certificate.
    #[serde(default, deserialize_with = "lenient::text")]
    pub comment: Option<String>,

    #[serde(default, alias = "bundleElements", deserialize_with = "lenient::seq")]
    pub bundle_elements: Vec<BundleElement>,

    /// Serials explicitly tied to this line item.
    #[serde(
        default,
        rename = "product_number_relationship_list",
        alias = "ownSerialRelationships",
        deserialize_with = "lenient::seq"
    )]
    pub own_serial_relationships: Vec<ItemSerial>,
}

impl Item {
    /// Creates a single-unit item for a product.
    pub fn new(product: Product) -> Self {
        Item {
            product,
            ..Item::default()
        }
    }

    /// Returns true if the item has sub-components.
    pub fn is_bundle(&self) -> bool {
        !self.bundle_elements.is_empty()
    }
}

/// A sub-product nested in a bundle item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleElement {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub product: Product,

    /// Copies of this component per bundle unit.
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
}

/// A serial number scoped to one item (no SKU; resolved via the order index).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSerial {
    #[serde(default, deserialize_with = "lenient::text")]
    pub number: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
}

impl ItemSerial {
    pub fn new(number: &str, quantity: f64) -> Self {
        ItemSerial {
            number: Some(number.to_string()),
            quantity: Some(quantity),
        }
    }
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

/// Field deserializers that degrade instead of failing.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::money::Amount;

    /// Number, numeric string, or anything else → `None`.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(number_from_value))
    }

    /// String or number (stringified) → text; anything else → `None`.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// A price kept in the form it was given.
    pub fn amount<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(Amount::Text(s)),
            Some(Value::Number(n)) => n.as_f64().map(Amount::Number),
            _ => None,
        })
    }

    /// `null` → `T::default()`.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// `null` list → empty; `null` entries → `T::default()`.
    pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        let entries = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
        Ok(entries
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    fn number_from_value(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
