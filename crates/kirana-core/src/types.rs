//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ┌───────────────┐  ┌──────────────────┐  ┌───────────────┐        │
//! │  │   Product     │  │ StockHistoryEntry│  │  SaleRecord   │        │
//! │  │ ────────────  │  │ ──────────────── │  │ ────────────  │        │
//! │  │ id            │  │ id (sequence)    │  │ id (sequence) │        │
//! │  │ scan_code (U) │  │ item_id (FK)     │  │ sold_at       │        │
//! │  │ price_paise   │  │ recorded_at      │  │ lines (JSON)  │        │
//! │  │ quantity >= 0 │  │ quantity (level) │  │ total_paise   │        │
//! │  └───────────────┘  └──────────────────┘  └───────────────┘        │
//! │                                                                     │
//! │  StockHistoryEntry.quantity is the POST-CHANGE level, not a delta. │
//! │  History rows and sale rows reference products by stable identity  │
//! │  only; they own nothing and never cascade.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// The shop runs a single fixed rate, zero by default; keeping the bps
/// representation means a future configurable rate changes no call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog row: one product available for sale.
///
/// ## Invariants
/// - `scan_code` is unique and immutable once created (enforced by the
///   catalog store)
/// - `quantity >= 0` at all times; only the checkout engine's deduction
///   or a restock may change it
/// - never deleted in normal operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Database identity.
    pub id: i64,

    /// Barcode; the external business identifier.
    pub scan_code: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Category label (Dairy, Snacks, ...).
    pub category: String,

    /// Unit price in paise.
    pub price_paise: i64,

    /// On-hand quantity. Never negative.
    pub quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Checks whether any stock remains.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Stock History
// =============================================================================

/// One observation in a product's stock time series.
///
/// Append-only: entries are written once per product per checkout commit
/// (and once at seeding) and never updated or deleted. `quantity` is the
/// resulting level after the change, so the series can be plotted
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockHistoryEntry {
    /// Auto-incrementing sequence number; insertion order is the
    /// authoritative order for ties at the same timestamp.
    pub id: i64,

    /// The product this observation belongs to.
    pub item_id: i64,

    /// When the level was observed.
    pub recorded_at: DateTime<Utc>,

    /// Stock level at this point (post-change snapshot, not a delta).
    pub quantity: i64,
}

// =============================================================================
// Sale Record
// =============================================================================

/// One line inside a recorded sale.
///
/// Snapshot pattern: name and price are frozen at commit time so the
/// ledger stays truthful even if the catalog row changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub scan_code: String,
    pub name: String,
    /// Unit price in paise at time of sale (frozen).
    pub price_paise: i64,
    /// Quantity sold.
    pub quantity: i64,
}

impl SaleLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.price_paise) * self.quantity
    }
}

/// A completed transaction in the sales ledger. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Auto-incrementing ledger id.
    pub id: i64,

    /// Commit timestamp.
    pub sold_at: DateTime<Utc>,

    /// Full snapshot of the bill's lines at commit time.
    pub lines: Vec<SaleLine>,

    /// Grand total in paise (subtotal + tax).
    pub total_paise: i64,

    /// Customer label; `WALK_IN_CUSTOMER` when none was given.
    pub customer: String,
}

impl SaleRecord {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_default_is_zero() {
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_sale_line_total() {
        let line = SaleLine {
            scan_code: "LAYS50".to_string(),
            name: "Lays Chips 50g".to_string(),
            price_paise: 2000,
            quantity: 5,
        };
        assert_eq!(line.line_total().paise(), 10000);
    }

    #[test]
    fn test_sale_lines_round_trip_json() {
        // The ledger stores lines as a JSON snapshot column.
        let lines = vec![SaleLine {
            scan_code: "MILK500".to_string(),
            name: "Milk 500ml".to_string(),
            price_paise: 3000,
            quantity: 3,
        }];
        let json = serde_json::to_string(&lines).unwrap();
        let back: Vec<SaleLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lines);
    }
}
