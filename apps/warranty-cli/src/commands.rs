//! # Commands
//!
//! One function per subcommand. Each returns the text to print so the
//! commands can be exercised without a terminal.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use warranty_core::ingest::{parse_items, parse_order, try_parse_items, try_parse_order};
use warranty_core::{CertificateGenerator, Item, Order};

use crate::config::{AppConfig, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::render::{render_json, render_text, JsonOutput};

/// Arguments of `warranty-pages generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub order: PathBuf,
    pub items: PathBuf,
    /// Overrides the order's own currency.
    pub currency: Option<String>,
    /// Overrides the configured output format.
    pub format: Option<OutputFormat>,
    /// Reject malformed documents instead of treating them as empty.
    pub strict: bool,
}

/// Reads both documents, runs the engine, renders the pages.
pub fn generate(config: &AppConfig, args: &GenerateArgs) -> AppResult<String> {
    let order_raw = read_document(&args.order)?;
    let items_raw = read_document(&args.items)?;
    generate_from_documents(config, &order_raw, &items_raw, args)
}

/// [`generate`] on already loaded documents.
pub fn generate_from_documents(
    config: &AppConfig,
    order_raw: &str,
    items_raw: &str,
    args: &GenerateArgs,
) -> AppResult<String> {
    let (mut order, items): (Order, Vec<Item>) = if args.strict {
        (try_parse_order(order_raw)?, try_parse_items(items_raw)?)
    } else {
        (parse_order(order_raw), parse_items(items_raw))
    };

    if let Some(currency) = args.currency.as_deref() {
        debug!(currency, "Overriding order currency");
        order.currency = currency.trim().to_string();
    }

    let generator = CertificateGenerator::new(config.engine.clone());
    let generation = generator.generate(&order, &items);

    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Text => Ok(render_text(&generation.records)),
        OutputFormat::Json => {
            let output = JsonOutput {
                generated_at: Utc::now(),
                currency: &order.currency,
                records: &generation.records,
                remaining: &generation.remaining,
            };
            Ok(render_json(&output)?)
        }
    }
}

/// `warranty-pages config`: the effective configuration as TOML.
pub fn show_config(config: &AppConfig) -> AppResult<String> {
    Ok(config.to_toml()?)
}

fn read_document(path: &Path) -> AppResult<String> {
    info!(?path, "Reading document");
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: &str = r#"{
        "currency": "HUF",
        "product_number_relationship_list": [
            { "product_sku": "TV", "number": "SN-1", "quantity": 1 }
        ]
    }"#;

    const ITEMS: &str = r#"[{
        "product": { "sku": "TV", "warranty_period": 1, "warranty_period_unit": 365 },
        "gross_price": 300000,
        "product_number_relationship_list": [{ "number": "SN-1" }]
    }]"#;

    fn args(format: OutputFormat) -> GenerateArgs {
        GenerateArgs {
            order: PathBuf::from("order.json"),
            items: PathBuf::from("items.json"),
            currency: None,
            format: Some(format),
            strict: false,
        }
    }

    #[test]
    fn test_generate_text() {
        let text =
            generate_from_documents(&AppConfig::default(), ORDER, ITEMS, &args(OutputFormat::Text))
                .unwrap();
        assert!(text.contains("Példány: 1 / 1"));
        assert!(text.contains("Jótállási idő: 3 év"));
        assert!(text.contains("Gyáriszám(ok): SN-1"));
        assert!(text.contains("Vételár: 300 000 Ft"));
    }

    #[test]
    fn test_generate_json() {
        let json =
            generate_from_documents(&AppConfig::default(), ORDER, ITEMS, &args(OutputFormat::Json))
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["currency"], "HUF");
        assert_eq!(value["records"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["remaining"]["TV"], 0);
    }

    #[test]
    fn test_currency_override() {
        let mut args = args(OutputFormat::Text);
        args.currency = Some("EUR".to_string());
        let text = generate_from_documents(&AppConfig::default(), ORDER, ITEMS, &args).unwrap();

        // No statutory minimum outside HUF; the configured year stands
        assert!(text.contains("Jótállási idő: 1 év"));
        assert!(text.contains("Vételár: 300 000 EUR"));
    }

    #[test]
    fn test_format_falls_back_to_config() {
        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Json;
        let mut args = args(OutputFormat::Text);
        args.format = None;

        let out = generate_from_documents(&config, ORDER, ITEMS, &args).unwrap();
        assert!(out.trim_start().starts_with('{'));
    }

    #[test]
    fn test_malformed_input_lenient_and_strict() {
        let mut args = args(OutputFormat::Text);
        let out = generate_from_documents(&AppConfig::default(), ORDER, "[{", &args).unwrap();
        assert_eq!(out, "");

        args.strict = true;
        let err = generate_from_documents(&AppConfig::default(), ORDER, "[{", &args).unwrap_err();
        assert!(matches!(err, AppError::Core(_)));
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let mut args = args(OutputFormat::Text);
        args.order = PathBuf::from("/nonexistent/order.json");
        let err = generate(&AppConfig::default(), &args).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn test_show_config() {
        let toml = show_config(&AppConfig::default()).unwrap();
        assert!(toml.contains("[statutory]"));
        assert!(toml.contains("[output]"));
    }
}
