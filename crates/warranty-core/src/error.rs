//! # Error Types
//!
//! Domain-specific error types for warranty-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warranty-core errors (this file)                                      │
//! │  ├── CoreError        - Ingestion and configuration failures           │
//! │  └── ValidationError  - Configuration value checks                     │
//! │                                                                         │
//! │  warranty-cli errors (app)                                             │
//! │  └── AppError         - File I/O, config file parsing, output          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Engine Itself Never Fails
//! Allocation and warranty computation are total functions: malformed
//! numbers become safe defaults and lookup misses become empty fields.
//! These errors exist only at the edges, where a caller may want to know
//! *why* an input was discarded before the lenient fallback kicks in.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised at the engine's boundaries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order or items document could not be parsed.
    ///
    /// ## When This Occurs
    /// - The upstream template produced invalid JSON
    /// - The document has the wrong top-level shape (object vs array)
    ///
    /// The lenient parsers in [`crate::ingest`] turn this into an empty value.
    #[error("Malformed {what} input: {reason}")]
    MalformedInput { what: &'static str, reason: String },

    /// Engine configuration is unusable.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Configuration value validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
