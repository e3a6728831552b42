//! # CLI Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConfigError ─┐                                                         │
//! │  CoreError  ──┼──► AppError ──► anyhow::Error (main) ──► stderr        │
//! │  io::Error  ──┤                                                         │
//! │  serde_json ──┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine degrades instead of failing, so these errors only come from
//! the edges: missing files, a broken config file, `--strict` input checks
//! and output encoding.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use warranty_core::CoreError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum AppError {
    /// An input document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rejected input in `--strict` mode.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type AppResult<T> = Result<T, AppError>;
