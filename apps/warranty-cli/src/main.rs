//! # warranty-pages
//!
//! Generates one warranty certificate page per physical unit of an order.
//!
//! ## Usage
//! ```bash
//! # Plain-text pages
//! warranty-pages generate --order order.json --items items.json
//!
//! # JSON for an external renderer, priced in EUR
//! warranty-pages generate --order order.json --items items.json --currency EUR --format json
//!
//! # Show the effective configuration
//! warranty-pages --config shop.toml config
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging (stderr, RUST_LOG)                              │
//! │  2. Parse arguments                                                    │
//! │  3. Load AppConfig (defaults → TOML → env)                             │
//! │  4. Run the subcommand, print its output to stdout                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod error;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::GenerateArgs;
use config::{AppConfig, OutputFormat};

const DEFAULT_LOG_FILTER: &str = "info,warranty_core=info";

#[derive(Parser)]
#[command(name = "warranty-pages")]
#[command(version)]
#[command(about = "Warranty certificate pages with serial allocation and statutory warranty")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate certificate pages for an order
    Generate {
        /// Order JSON document (currency + serial inventory)
        #[arg(long)]
        order: PathBuf,

        /// Items JSON document (array of line items)
        #[arg(long)]
        items: PathBuf,

        /// ISO currency code overriding the order's own
        #[arg(long)]
        currency: Option<String>,

        /// Output format (overrides config and environment)
        #[arg(long, short = 'f', value_enum)]
        format: Option<OutputFormat>,

        /// Fail on malformed documents instead of treating them as empty
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let output = match cli.command {
        Commands::Generate {
            order,
            items,
            currency,
            format,
            strict,
        } => {
            let args = GenerateArgs {
                order,
                items,
                currency,
                format,
                strict,
            };
            commands::generate(&config, &args).context("Generation failed")?
        }
        Commands::Config => commands::show_config(&config)?,
    };

    print!("{}", output);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Skipped items, pool sizes
/// - `RUST_LOG=warranty_core=trace` - Every serial allocation
/// - Default: INFO
///
/// Logs go to stderr; stdout carries only the rendered output.
fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_subscriber(log_filter(directives.as_deref())).init();
}

/// `RUST_LOG` directives, or the default when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// The filter is the only level gate on this subscriber.
fn build_subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

// =============================================================================
// Unit Tests
// =============================================================================
