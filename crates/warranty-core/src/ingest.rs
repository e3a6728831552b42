//! # Ingestion Boundary
//!
//! Parses the order and items documents handed over by the upstream
//! template.
//!
//! ## Two Flavours
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  try_parse_order / try_parse_items    → CoreResult<T>                  │
//! │      for callers that want to report why a document was rejected       │
//! │                                                                         │
//! │  parse_order / parse_items            → T (never fails)                │
//! │      blank input      → empty value                                    │
//! │      malformed input  → warn! + empty value                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field-level looseness (numbers as strings, `null` lists) is absorbed by
//! the deserializers in [`crate::types`]; only a broken document as a whole
//! is rejected here.

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::types::{Item, Order};

/// Parses an order document.
///
/// Blank input is an empty order, not an error.
pub fn try_parse_order(raw: &str) -> CoreResult<Order> {
    if raw.trim().is_empty() {
        return Ok(Order::default());
    }
    serde_json::from_str(raw).map_err(|e| CoreError::MalformedInput {
        what: "order",
        reason: e.to_string(),
    })
}

/// Parses an items document (a JSON array).
///
/// Blank input is an empty list, not an error.
pub fn try_parse_items(raw: &str) -> CoreResult<Vec<Item>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<Option<Item>> =
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedInput {
            what: "items",
            reason: e.to_string(),
        })?;
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}

/// Lenient [`try_parse_order`]: a malformed document becomes an empty order.
pub fn parse_order(raw: &str) -> Order {
    try_parse_order(raw).unwrap_or_else(|e| {
        warn!(error = %e, "Order document discarded");
        Order::default()
    })
}

/// Lenient [`try_parse_items`]: a malformed document becomes an empty list.
pub fn parse_items(raw: &str) -> Vec<Item> {
    try_parse_items(raw).unwrap_or_else(|e| {
        warn!(error = %e, "Items document discarded");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_documents_are_empty() {
        assert_eq!(try_parse_order("").unwrap(), Order::default());
        assert!(try_parse_items("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let err = try_parse_order("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::MalformedInput { what: "order", .. }));

        // An object where an array is expected
        let err = try_parse_items(r#"{"product": {}}"#).unwrap_err();
        assert!(err.to_string().starts_with("Malformed items input"));
    }

    #[test]
    fn test_lenient_parsers_degrade_to_empty() {
        assert_eq!(parse_order("[1, 2"), Order::default());
        assert!(parse_items("null garbage").is_empty());
    }

    #[test]
    fn test_null_item_entries_default() {
        let items = parse_items(r#"[null, {"product": {"sku": "A"}, "quantity": "2"}]"#);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Item::default());
        assert_eq!(items[1].product.sku(), Some("A"));
        assert_eq!(items[1].quantity, Some(2.0));
    }

    #[test]
    fn test_order_parses() {
        let order = parse_order(
            r#"{"currency": "HUF", "product_number_relationship_list": [
                {"product_sku": "TV", "number": "SN-1", "quantity": 1}
            ]}"#,
        );
        assert_eq!(order.currency, "HUF");
        assert_eq!(order.serial_relationships.len(), 1);
    }
}
