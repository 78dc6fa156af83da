//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── CoreError        - Selection against the warehouse set            │
//! │  └── ValidationError  - Operator input rejected before any I/O         │
//! │                                                                         │
//! │  depot-client errors (separate crate)                                  │
//! │  └── ClientError      - Network / backend / store failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → UI shell            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::WarehouseId;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by selection against a warehouse set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Selection was requested against an empty warehouse set.
    #[error("No warehouses available")]
    NoWarehouses,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised synchronously, before any gateway call is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. a quantity that is not a whole number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The warehouse id does not resolve to a member of the current set.
    #[error("Warehouse {0} is not in the current list")]
    UnknownWarehouse(WarehouseId),

    /// Duplicate value (e.g. two warehouses sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}
