//! # Page Rendering
//!
//! Turns engine records into printable output.
//!
//! ## Text Page Layout
//! ```text
//! ────────────────────────────────────────
//! Példány: 1 / 2
//! Termék megnevezése: Televízió
//! Termék típusa: 55" OLED
//! SKU: TV-55
//! Jótállási idő: 3 év
//! Gyártó: Visiona
//! Származási ország: KR
//! Gyáriszám(ok): TV-001
//! További (azonosító) adat(ok): ...
//! Vételár: 1 234 567 Ft
//! Csomag összetevők
//!   Összetevő példány: 1 / 1
//!   ...
//! ```
//! Rows whose value is absent are left out.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use warranty_core::{ComponentRecord, ProductFields, Record};

const PAGE_RULE: &str = "────────────────────────────────────────";
const COMPONENT_INDENT: &str = "  ";

pub const LABEL_INSTANCE: &str = "Példány";
pub const LABEL_CATEGORY: &str = "Termék megnevezése";
pub const LABEL_DISPLAY_NAME: &str = "Termék típusa";
pub const LABEL_SKU: &str = "SKU";
pub const LABEL_WARRANTY: &str = "Jótállási idő";
pub const LABEL_MANUFACTURER: &str = "Gyártó";
pub const LABEL_COUNTRY: &str = "Származási ország";
pub const LABEL_SERIALS: &str = "Gyáriszám(ok)";
pub const LABEL_COMMENT: &str = "További (azonosító) adat(ok)";
pub const LABEL_PRICE: &str = "Vételár";
pub const LABEL_COMPONENTS: &str = "Csomag összetevők";
pub const LABEL_COMPONENT_INSTANCE: &str = "Összetevő példány";

// =============================================================================
// Text Output
// =============================================================================

/// Plain-text rendering of a record list, one page per record.
pub struct TextPages<'a>(pub &'a [Record]);

impl fmt::Display for TextPages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.0 {
            writeln!(f, "{}", PAGE_RULE)?;
            write_record(f, record)?;
        }
        Ok(())
    }
}

fn write_record(f: &mut fmt::Formatter<'_>, record: &Record) -> fmt::Result {
    let instance = ordinal(record.instance, record.of);
    row(f, "", LABEL_INSTANCE, Some(instance.as_str()))?;
    write_product(f, "", &record.product)?;
    row(f, "", LABEL_SERIALS, record.serials.as_deref())?;
    row(f, "", LABEL_COMMENT, record.comment.as_deref())?;
    row(f, "", LABEL_PRICE, record.price.as_deref())?;

    if record.has_components() {
        writeln!(f, "{}", LABEL_COMPONENTS)?;
        for component in &record.components {
            write_component(f, component)?;
        }
    }
    Ok(())
}

fn write_component(f: &mut fmt::Formatter<'_>, component: &ComponentRecord) -> fmt::Result {
    let indent = COMPONENT_INDENT;
    let instance = ordinal(component.instance, component.of);
    row(f, indent, LABEL_COMPONENT_INSTANCE, Some(instance.as_str()))?;
    write_product(f, indent, &component.product)?;
    row(f, indent, LABEL_SERIALS, component.serial.as_deref())
}

fn write_product(f: &mut fmt::Formatter<'_>, indent: &str, product: &ProductFields) -> fmt::Result {
    row(f, indent, LABEL_CATEGORY, product.category_name.as_deref())?;
    row(f, indent, LABEL_DISPLAY_NAME, product.display_name.as_deref())?;
    row(f, indent, LABEL_SKU, product.sku.as_deref())?;
    row(f, indent, LABEL_WARRANTY, product.warranty.as_deref())?;
    row(f, indent, LABEL_MANUFACTURER, product.manufacturer_name.as_deref())?;
    row(f, indent, LABEL_COUNTRY, product.country_of_origin.as_deref())
}

fn row(f: &mut fmt::Formatter<'_>, indent: &str, label: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(value) if !value.trim().is_empty() => writeln!(f, "{}{}: {}", indent, label, value),
        _ => Ok(()),
    }
}

fn ordinal(instance: u32, of: u32) -> String {
    format!("{} / {}", instance, of)
}

pub fn render_text(records: &[Record]) -> String {
    TextPages(records).to_string()
}

// =============================================================================
// JSON Output
// =============================================================================

/// JSON envelope around one run's records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOutput<'a> {
    pub generated_at: DateTime<Utc>,
    pub currency: &'a str,
    pub records: &'a [Record],
    pub remaining: &'a BTreeMap<String, usize>,
}

pub fn render_json(output: &JsonOutput<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn standalone() -> Record {
        Record {
            instance: 1,
            of: 2,
            product: ProductFields {
                category_name: Some("Televízió".to_string()),
                sku: Some("TV-55".to_string()),
                warranty: Some("3 év".to_string()),
                ..ProductFields::default()
            },
            serials: Some("TV-001".to_string()),
            comment: None,
            price: Some("1 234 567 Ft".to_string()),
            components: Vec::new(),
        }
    }

    #[test]
    fn test_text_page_rows() {
        let text = render_text(&[standalone()]);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                PAGE_RULE,
                "Példány: 1 / 2",
                "Termék megnevezése: Televízió",
                "SKU: TV-55",
                "Jótállási idő: 3 év",
                "Gyáriszám(ok): TV-001",
                "Vételár: 1 234 567 Ft",
            ]
        );
    }

    #[test]
    fn test_text_bundle_components() {
        let record = Record {
            instance: 1,
            of: 1,
            serials: None,
            components: vec![
                ComponentRecord {
                    instance: 1,
                    of: 2,
                    product: ProductFields {
                        sku: Some("KB".to_string()),
                        ..ProductFields::default()
                    },
                    serial: Some("KB-01".to_string()),
                },
                ComponentRecord {
                    instance: 2,
                    of: 2,
                    product: ProductFields {
                        sku: Some("KB".to_string()),
                        ..ProductFields::default()
                    },
                    serial: None,
                },
            ],
            ..standalone()
        };

        let text = render_text(&[record]);
        assert!(!text.contains("Gyáriszám(ok): TV-001"));
        assert!(text.contains("Csomag összetevők\n  Összetevő példány: 1 / 2\n  SKU: KB\n  Gyáriszám(ok): KB-01\n"));
        assert!(text.ends_with("  Összetevő példány: 2 / 2\n  SKU: KB\n"));
    }

    #[test]
    fn test_text_no_records() {
        assert_eq!(render_text(&[]), "");
    }

    #[test]
    fn test_json_envelope() {
        let records = vec![standalone()];
        let remaining = BTreeMap::from([("TV-55".to_string(), 1usize)]);
        let output = JsonOutput {
            generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            currency: "HUF",
            records: &records,
            remaining: &remaining,
        };

        let value: serde_json::Value = serde_json::from_str(&render_json(&output).unwrap()).unwrap();
        assert_eq!(value["generatedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(value["currency"], "HUF");
        assert_eq!(value["records"][0]["product"]["sku"], "TV-55");
        assert_eq!(value["remaining"]["TV-55"], 1);
    }
}
