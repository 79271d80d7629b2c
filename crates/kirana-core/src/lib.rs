//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! This crate is the heart of the system: catalog types, bill math,
//! low-stock detection and the error taxonomy, all as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Kirana Data Flow                              │
//! │                                                                     │
//! │  Session layer (kirana-pos)                                        │
//! │    reads catalog ──► builds Bill ──► invokes checkout              │
//! │       │                                                             │
//! │  ┌────▼──────────────────────────────────────────────────────────┐ │
//! │  │              ★ kirana-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐          │ │
//! │  │   │  types  │ │  money  │ │  bill   │ │ lowstock │          │ │
//! │  │   │ Product │ │  Money  │ │  Bill   │ │ detect() │          │ │
//! │  │   │SaleLine │ │ TaxRate │ │BillLine │ │  Alert   │          │ │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘          │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │  kirana-db (SQLite storage, checkout transaction)                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output
//! 2. **Integer money**: all amounts are paise (`i64`), never floats
//! 3. **Explicit errors**: typed variants, never strings or panics
//! 4. **Stock over price**: availability is always re-validated live;
//!    prices are pinned at add-time (intentional asymmetry)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod lowstock;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::{Bill, BillLine, BillTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use lowstock::{detect, LowStockAlert};
pub use money::Money;
pub use types::{Product, SaleLine, SaleRecord, StockHistoryEntry, TaxRate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity below which a product is flagged for restock attention.
///
/// The dashboard and the post-checkout alert step both compare against
/// this unless the session config overrides it.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Customer label recorded when the cashier leaves the field blank.
pub const WALK_IN_CUSTOMER: &str = "Walk-in";

/// Maximum distinct lines allowed in a single bill.
///
/// Prevents runaway bills; a single-till shop never legitimately hits this.
pub const MAX_BILL_LINES: usize = 100;

/// Maximum quantity of a single line in a bill.
///
/// Catches fat-finger entries (1000 instead of 10) before they reach
/// the stock check.
pub const MAX_LINE_QUANTITY: i64 = 999;
