//! # Validation Module
//!
//! Operator input validation for Depot.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                     │
//! │  ├── Required-field hints                                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any network call)                        │
//! │  ├── Warehouse id is in the loaded set (checked by the store)          │
//! │  ├── Product name non-empty                                            │
//! │  ├── Quantity is a non-negative whole number                           │
//! │  └── Order fields present                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Warehouse backend                                            │
//! │  └── Rejections surface as ClientError::Rejected                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use depot_core::validation::{parse_quantity, validate_product_name};
//!
//! assert!(validate_product_name("Widget").is_ok());
//! assert_eq!(parse_quantity("12").unwrap(), 12);
//! assert!(parse_quantity("-1").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name the backend accepts.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;


// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (whitespace-only counts as empty)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "product name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the delivery address on an order.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    if address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    Ok(())
}

/// Validates the product id on an order.
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a stock quantity typed by the operator.
///
/// ## Rules
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Manage Inventory dialog: Quantity field                               │
/// │                                                                         │
/// │  "12"   ──► Ok(12)                                                      │
/// │  " 0 "  ──► Ok(0)          (zero clears stock)                          │
/// │  ""     ──► Required                                                    │
/// │  "-1"   ──► MustBeNonNegative                                           │
/// │  "2.5"  ──► InvalidFormat  (whole units only)                           │
/// │  "abc"  ──► InvalidFormat                                               │
/// │  "9999999999" ──► OutOfRange                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity(raw: &str) -> ValidationResult<u32> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let value: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not a whole number", raw),
    })?;

    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 0.0,
        max: f64::from(u32::MAX),
    })
}
