//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  kirana-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  kirana-db errors (separate crate)                                  │
//! │  ├── DbError          - Storage failures (fatal to a transaction)   │
//! │  └── CheckoutError    - Core | Db at the engine boundary            │
//! │                                                                     │
//! │  kirana-pos errors                                                  │
//! │  └── PosError         - What the session surface returns            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Include context in messages (scan code, requested vs. available)
//! 3. Every stock error is checked BEFORE any mutation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations. All variants are recoverable: the caller can
/// adjust the bill and retry, and no state change has occurred.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product carries this scan code.
    #[error("no product with scan code {0}")]
    ProductNotFound(String),

    /// The product exists but has zero on-hand stock, so it cannot be
    /// added to a bill at all.
    #[error("{name} ({scan_code}) is out of stock")]
    OutOfStock { scan_code: String, name: String },

    /// A requested line quantity exceeds current on-hand stock.
    ///
    /// Raised by the bill builder's quantity edit, which re-checks the
    /// live catalog rather than the pinned snapshot.
    #[error("insufficient stock for {scan_code}: requested {requested}, available {available}")]
    InsufficientStock {
        scan_code: String,
        requested: i64,
        available: i64,
    },

    /// Checkout validation found a line whose stock shrank since it was
    /// added to the bill.
    ///
    /// ## Guarantee
    /// Always raised before any deduction; the bill is left unmodified so
    /// the cashier can lower the quantity and retry.
    #[error("stock conflict on {scan_code}: requested {requested}, available {available}")]
    StockConflict {
        scan_code: String,
        requested: i64,
        available: i64,
    },

    /// Quantity edits must be at least 1; zero-quantity lines are removed,
    /// not edited.
    #[error("invalid quantity {0}, must be >= 1")]
    InvalidQuantity(i64),

    /// Checkout requires a non-empty bill.
    #[error("bill has no lines")]
    EmptyBill,

    /// Bill has exceeded the maximum number of distinct lines.
    #[error("bill cannot have more than {max} lines")]
    BillTooLarge { max: usize },

    /// Line quantity exceeds the per-line cap.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Line index does not exist in the bill.
    #[error("no bill line at index {0}")]
    LineOutOfRange(usize),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. scan code with whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must not be negative (prices, quantities).
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_conflict_message_names_the_offender() {
        let err = CoreError::StockConflict {
            scan_code: "SUGAR1".to_string(),
            requested: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "stock conflict on SUGAR1: requested 2, available 1"
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            scan_code: "BREAD01".to_string(),
            requested: 10,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for BREAD01: requested 10, available 5"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "scan_code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
