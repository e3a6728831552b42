//! # Certificate Generator
//!
//! Drives one generation run: builds the serial pool, releases standalone
//! serials, then walks the items in order and emits a [`Record`] per
//! physical unit.
//!
//! ## Run Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. build_serial_maps(order)         pool + index                      │
//! │  2. consume_standalone_serials       pool minus standalone serials     │
//! │  3. for item in items (in order):                                      │
//! │       skip unless warranty data or own serials                         │
//! │       standalone → distribute own serials over qty pages               │
//! │       bundle     → per page, per component copy: allocate_one()        │
//! │  4. Generation { records, remaining }                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Phase 2 finishes before any allocation in phase 3. Items and components
//! are served strictly in source order; that ordering is what keeps a serial
//! from being issued twice.
//!
//! ## Usage
//! ```rust
//! use warranty_core::config::EngineConfig;
//! use warranty_core::generator::CertificateGenerator;
//! use warranty_core::types::{Item, Order, Product, SerialRelationship};
//!
//! let order = Order {
//!     currency: "HUF".to_string(),
//!     serial_relationships: vec![SerialRelationship::new("TV", "SN-1", 1.0)],
//! };
//! let mut tv = Item::new(Product::new("TV").with_warranty(1.0, 365.0));
//! tv.own_serial_relationships = vec![warranty_core::types::ItemSerial::new("SN-1", 1.0)];
//!
//! let generation = CertificateGenerator::new(EngineConfig::default()).generate(&order, &[tv]);
//! assert_eq!(generation.records.len(), 1);
//! assert_eq!(generation.records[0].serials.as_deref(), Some("SN-1"));
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::allocator::{LocalQueues, SerialAllocator};
use crate::config::EngineConfig;
use crate::distributor::distribute;
use crate::money::{Amount, MoneyFormatter};
use crate::normalize::{non_blank, normalize_quantity};
use crate::pool::{build_serial_maps, consume_standalone_serials, expand_item_serials};
use crate::record::{ComponentRecord, ProductFields, Record};
use crate::types::{BundleElement, Item, Order};
use crate::warranty::{effective_label, has_warranty_data};

// =============================================================================
// Generation Result
// =============================================================================

/// Output of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// One record per physical unit, in item order.
    pub records: Vec<Record>,
    /// Serial units left in the pool per SKU.
    pub remaining: BTreeMap<String, usize>,
}

// =============================================================================
// Generator
// =============================================================================

/// Stateless between runs; every [`generate`](Self::generate) call builds
/// and drops its own pool.
#[derive(Debug, Clone)]
pub struct CertificateGenerator {
    config: EngineConfig,
    money: MoneyFormatter,
}

/// Per-item values shared by all of the item's pages.
struct LineContext<'a> {
    currency: &'a str,
    price: Option<f64>,
}

impl CertificateGenerator {
    pub fn new(config: EngineConfig) -> Self {
        let money = MoneyFormatter::from_config(&config.money);
        CertificateGenerator { config, money }
    }

    /// Runs the full allocation pass over `items`.
    pub fn generate(&self, order: &Order, items: &[Item]) -> Generation {
        let currency = order.currency.trim();
        let (mut pool, index) = build_serial_maps(order);
        consume_standalone_serials(items, &mut pool);

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (position, item) in items.iter().enumerate() {
            if !should_render(item) {
                debug!(
                    position,
                    sku = item.product.sku().unwrap_or_default(),
                    "Item skipped: no warranty data and no serials"
                );
                skipped += 1;
                continue;
            }

            let qty = normalize_quantity(item.quantity);
            let line = LineContext {
                currency,
                price: item.gross_price.as_ref().and_then(Amount::as_number),
            };
            let product = ProductFields::from_product(
                &item.product,
                effective_label(
                    &item.product,
                    line.price,
                    line.currency,
                    &self.config.statutory,
                ),
            );
            let comment = non_blank(item.comment.as_deref());
            let price = non_blank(Some(
                self.money
                    .format(item.gross_price.as_ref(), currency)
                    .as_str(),
            ));
            let serials = expand_item_serials(&item.own_serial_relationships);

            let page = |instance: u32, serials: Option<String>, components: Vec<ComponentRecord>| {
                Record {
                    instance,
                    of: qty,
                    product: product.clone(),
                    serials,
                    comment: comment.clone(),
                    price: price.clone(),
                    components,
                }
            };

            if item.is_bundle() {
                let local = LocalQueues::from_item_serials(&serials, &index, item.product.sku());
                let mut allocator = SerialAllocator::new(&mut pool, local);
                for k in 0..qty {
                    let components =
                        self.bundle_components(&item.bundle_elements, &line, &mut allocator);
                    records.push(page(k + 1, None, components));
                }
            } else {
                for (k, slot) in (1..=qty).zip(distribute(qty, &serials)) {
                    records.push(page(k, non_blank(Some(slot.as_str())), Vec::new()));
                }
            }
        }

        let remaining = pool.remaining();
        info!(
            items = items.len(),
            skipped,
            records = records.len(),
            serials_left = remaining.values().sum::<usize>(),
            "Certificates generated"
        );

        Generation { records, remaining }
    }

    /// Component block of one bundle page.
    ///
    /// A component is listed when it has configured warranty data or a serial
    /// is still available for it; availability is checked against the live
    /// pool on every page.
    fn bundle_components(
        &self,
        elements: &[BundleElement],
        line: &LineContext<'_>,
        allocator: &mut SerialAllocator<'_>,
    ) -> Vec<ComponentRecord> {
        let mut components = Vec::new();

        for element in elements {
            let product = &element.product;
            let sku = product.sku();
            let available = sku.is_some_and(|sku| allocator.has_available(sku));
            if !has_warranty_data(product) && !available {
                continue;
            }

            let fields = ProductFields::from_product(
                product,
                effective_label(product, line.price, line.currency, &self.config.statutory),
            );
            let copies = normalize_quantity(element.quantity);

            for r in 1..=copies {
                let serial = sku.and_then(|sku| allocator.allocate_one(sku));
                if serial.is_none() {
                    debug!(
                        sku = sku.unwrap_or_default(),
                        copy = r,
                        of = copies,
                        "Component copy left without serial"
                    );
                }
                components.push(ComponentRecord {
                    instance: r,
                    of: copies,
                    product: fields.clone(),
                    serial,
                });
            }
        }

        components
    }
}

impl Default for CertificateGenerator {
    fn default() -> Self {
        CertificateGenerator::new(EngineConfig::default())
    }
}

/// An item gets pages when it or any of its components has configured
/// warranty data, or when it carries serials of its own.
///
/// Statutory eligibility alone does not qualify an item.
pub fn should_render(item: &Item) -> bool {
    has_warranty_data(&item.product)
        || item
            .bundle_elements
            .iter()
            .any(|element| has_warranty_data(&element.product))
        || !expand_item_serials(&item.own_serial_relationships).is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemSerial, Product, SerialRelationship};
    use crate::warranty::YEAR;

    fn order(currency: &str, relationships: Vec<SerialRelationship>) -> Order {
        Order {
            currency: currency.to_string(),
            serial_relationships: relationships,
        }
    }

    fn component(sku: &str, quantity: f64) -> BundleElement {
        BundleElement {
            product: Product::new(sku),
            quantity: Some(quantity),
        }
    }

    #[test]
    fn test_item_without_warranty_or_serials_is_skipped() {
        let mut item = Item::new(Product::new("CABLE"));
        item.gross_price = Some(Amount::Number(300000.0));
        let generator = CertificateGenerator::default();

        let generation = generator.generate(&order("HUF", vec![]), &[item.clone()]);
        assert!(generation.records.is_empty());

        // One serial is enough to get exactly one page
        item.own_serial_relationships = vec![ItemSerial::new("C-1", 1.0)];
        let generation = generator.generate(&order("HUF", vec![]), &[item]);
        assert_eq!(generation.records.len(), 1);
        assert_eq!(generation.records[0].serials.as_deref(), Some("C-1"));
        assert_eq!(generation.records[0].product.warranty.as_deref(), Some("3 év"));
    }

    #[test]
    fn test_standalone_pages_and_distribution() {
        let mut item = Item::new(Product::new("TV").with_warranty(1.0, YEAR));
        item.quantity = Some(2.0);
        item.comment = Some("Kijelző: 55\"".to_string());
        item.gross_price = Some(Amount::Number(199990.0));
        item.own_serial_relationships = vec![
            ItemSerial::new("A", 1.0),
            ItemSerial::new("B", 1.0),
            ItemSerial::new("C", 1.0),
        ];

        let generation = CertificateGenerator::default().generate(&order("HUF", vec![]), &[item]);
        let records = &generation.records;

        assert_eq!(records.len(), 2);
        assert_eq!((records[0].instance, records[0].of), (1, 2));
        assert_eq!((records[1].instance, records[1].of), (2, 2));
        assert_eq!(records[0].serials.as_deref(), Some("A"));
        assert_eq!(records[1].serials.as_deref(), Some("B, C"));
        assert_eq!(records[0].price.as_deref(), Some("199 990 Ft"));
        assert_eq!(records[0].product.warranty.as_deref(), Some("2 év"));
        assert!(records.iter().all(|r| r.components.is_empty()));
    }

    #[test]
    fn test_standalone_instance_without_serial_has_none() {
        let mut item = Item::new(Product::new("TV").with_warranty(1.0, YEAR));
        item.quantity = Some(3.0);
        item.own_serial_relationships = vec![ItemSerial::new("A", 1.0)];

        let generation = CertificateGenerator::default().generate(&order("EUR", vec![]), &[item]);
        let serials: Vec<_> = generation.records.iter().map(|r| r.serials.clone()).collect();
        assert_eq!(serials, vec![Some("A".to_string()), None, None]);
    }

    #[test]
    fn test_bundle_components_come_from_pool_not_standalone() {
        let order = order(
            "HUF",
            vec![
                SerialRelationship::new("MOUSE", "M-1", 1.0),
                SerialRelationship::new("MOUSE", "M-2", 1.0),
                SerialRelationship::new("MOUSE", "M-3", 1.0),
            ],
        );

        // The bundle comes first, yet M-1 is already claimed by the standalone mouse
        let mut bundle = Item::new(Product::new("PC-SET").with_warranty(1.0, YEAR));
        bundle.gross_price = Some(Amount::Number(400000.0));
        bundle.bundle_elements = vec![component("MOUSE", 2.0)];

        let mut mouse = Item::new(Product::new("MOUSE"));
        mouse.own_serial_relationships = vec![ItemSerial::new("M-1", 1.0)];

        let generation = CertificateGenerator::default().generate(&order, &[bundle, mouse]);
        let records = &generation.records;

        assert_eq!(records.len(), 2);
        let bundle_page = &records[0];
        assert_eq!(bundle_page.serials, None);
        assert_eq!(bundle_page.components.len(), 2);
        assert_eq!(bundle_page.components[0].serial.as_deref(), Some("M-2"));
        assert_eq!(bundle_page.components[1].serial.as_deref(), Some("M-3"));
        assert_eq!((bundle_page.components[1].instance, bundle_page.components[1].of), (2, 2));
        // Components inherit the statutory minimum from the bundle's price
        assert_eq!(
            bundle_page.components[0].product.warranty.as_deref(),
            Some("3 év")
        );
        assert_eq!(records[1].serials.as_deref(), Some("M-1"));
        assert_eq!(generation.remaining.get("MOUSE"), Some(&0));
    }

    #[test]
    fn test_bundle_allocates_fresh_serials_per_instance() {
        let order = order(
            "HUF",
            vec![
                SerialRelationship::new("KB", "K-1", 1.0),
                SerialRelationship::new("KB", "K-2", 1.0),
            ],
        );
        let mut bundle = Item::new(Product::new("SET").with_warranty(1.0, YEAR));
        bundle.quantity = Some(3.0);
        bundle.bundle_elements = vec![component("KB", 1.0)];

        let generation = CertificateGenerator::default().generate(&order, &[bundle]);
        let records = &generation.records;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].components[0].serial.as_deref(), Some("K-1"));
        assert_eq!(records[1].components[0].serial.as_deref(), Some("K-2"));
        // Pool exhausted and no warranty data: component dropped on page 3
        assert!(records[2].components.is_empty());
    }

    #[test]
    fn test_component_copies_beyond_supply_render_without_serial() {
        let order = order("HUF", vec![SerialRelationship::new("SPK", "S-1", 1.0)]);
        let mut bundle = Item::new(Product::new("AUDIO"));
        bundle.bundle_elements = vec![component("SPK", 3.0)];

        let generation = CertificateGenerator::default().generate(&order, &[bundle]);
        // No warranty data anywhere and no own serials: skipped
        assert!(generation.records.is_empty());

        let mut bundle = Item::new(Product::new("AUDIO"));
        bundle.bundle_elements = vec![BundleElement {
            product: Product::new("SPK").with_warranty(6.0, 30.0),
            quantity: Some(3.0),
        }];
        let generation = CertificateGenerator::default().generate(&order, &[bundle]);
        let serials: Vec<_> = generation.records[0]
            .components
            .iter()
            .map(|c| c.serial.clone())
            .collect();
        assert_eq!(serials, vec![Some("S-1".to_string()), None, None]);
        assert_eq!(
            generation.records[0].components[0].product.warranty.as_deref(),
            Some("6 hónap")
        );
    }

    #[test]
    fn test_bundle_own_serials_feed_local_queue() {
        let order = order(
            "HUF",
            vec![
                SerialRelationship::new("CAM", "C-1", 1.0),
                SerialRelationship::new("CAM", "C-2", 1.0),
                SerialRelationship::new("LENS", "L-1", 1.0),
            ],
        );
        let mut bundle = Item::new(Product::new("KIT"));
        bundle.own_serial_relationships = vec![ItemSerial::new("C-2", 1.0)];
        bundle.bundle_elements = vec![component("CAM", 2.0), component("LENS", 1.0)];

        let generation = CertificateGenerator::default().generate(&order, &[bundle]);
        let components = &generation.records[0].components;

        assert_eq!(components.len(), 3);
        assert_eq!(components[0].serial.as_deref(), Some("C-2"));
        assert_eq!(components[1].serial.as_deref(), Some("C-1"));
        assert_eq!(components[2].serial.as_deref(), Some("L-1"));
        assert_eq!(generation.remaining.values().sum::<usize>(), 0);
    }

    #[test]
    fn test_bundles_sharing_an_own_serial_get_it_once() {
        let order = order("HUF", vec![SerialRelationship::new("KB", "K-1", 1.0)]);
        let bundle = |sku: &str| {
            let mut bundle = Item::new(Product::new(sku).with_warranty(1.0, YEAR));
            bundle.own_serial_relationships = vec![ItemSerial::new("K-1", 1.0)];
            bundle.bundle_elements = vec![BundleElement {
                product: Product::new("KB").with_warranty(1.0, YEAR),
                quantity: Some(1.0),
            }];
            bundle
        };

        let generation =
            CertificateGenerator::default().generate(&order, &[bundle("SET"), bundle("SET2")]);
        let records = &generation.records;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].components[0].serial.as_deref(), Some("K-1"));
        assert_eq!(records[1].components[0].serial, None);
        assert_eq!(generation.remaining.get("KB"), Some(&0));
    }

    #[test]
    fn test_bundle_own_serial_held_by_standalone_is_skipped() {
        let order = order(
            "HUF",
            vec![
                SerialRelationship::new("KB", "K-1", 1.0),
                SerialRelationship::new("KB", "K-2", 1.0),
            ],
        );
        let mut bundle = Item::new(Product::new("SET").with_warranty(1.0, YEAR));
        bundle.own_serial_relationships = vec![ItemSerial::new("K-1", 1.0)];
        bundle.bundle_elements = vec![component("KB", 1.0)];

        let mut keyboard = Item::new(Product::new("KB"));
        keyboard.own_serial_relationships = vec![ItemSerial::new("K-1", 1.0)];

        let generation = CertificateGenerator::default().generate(&order, &[bundle, keyboard]);
        assert_eq!(generation.records[0].components[0].serial.as_deref(), Some("K-2"));
        assert_eq!(generation.records[1].serials.as_deref(), Some("K-1"));
    }

    #[test]
    fn test_component_without_sku_gets_no_serial() {
        let order = order("HUF", vec![SerialRelationship::new("X", "X-1", 1.0)]);
        let mut bundle = Item::new(Product::new("SET"));
        bundle.bundle_elements = vec![BundleElement {
            product: Product::default().with_warranty(2.0, YEAR),
            quantity: Some(1.0),
        }];

        let generation = CertificateGenerator::default().generate(&order, &[bundle]);
        let component = &generation.records[0].components[0];
        assert_eq!(component.serial, None);
        assert_eq!(component.product.sku, None);
        assert_eq!(generation.remaining.get("X"), Some(&1));
    }

    #[test]
    fn test_main_warranty_uses_effective_days() {
        let mut item = Item::new(Product::new("FRIDGE").with_warranty(4.0, YEAR));
        item.gross_price = Some(Amount::Number(50000.0));

        let generation = CertificateGenerator::default().generate(&order("EUR", vec![]), &[item]);
        let record = &generation.records[0];
        assert_eq!(record.product.warranty.as_deref(), Some("4 év"));
        assert_eq!(record.price.as_deref(), Some("50 000 EUR"));
    }

    #[test]
    fn test_empty_inputs() {
        let generation = CertificateGenerator::default().generate(&Order::default(), &[]);
        assert_eq!(generation, Generation::default());
    }

    #[test]
    fn test_should_render() {
        assert!(!should_render(&Item::default()));
        assert!(should_render(&Item::new(Product::new("A").with_warranty(1.0, 1.0))));

        let mut bundle = Item::new(Product::new("SET"));
        bundle.bundle_elements = vec![BundleElement {
            product: Product::new("C").with_warranty(1.0, YEAR),
            quantity: None,
        }];
        assert!(should_render(&bundle));
    }
}

// =============================================================================
// Property Tests
// =============================================================================
