//! # Bill Builder
//!
//! The in-progress bill: an ordered list of lines accumulated against a
//! catalog snapshot. One bill is active per session; the checkout engine
//! consumes it as a whole.
//!
//! ## Price Pinned, Stock Live
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  add_product()      price copied from catalog row  ──► PINNED      │
//! │                     a later admin price edit does not change an    │
//! │                     already-added line                             │
//! │                                                                     │
//! │  set_quantity()     checked against the catalog's CURRENT stock,   │
//! │                     passed in by the caller  ──► LIVE              │
//! │                                                                     │
//! │  Stock is the correctness-critical constraint; price is not.       │
//! │  This asymmetry is intentional.                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is pure: live availability is an argument, never a query.
//! The session layer (kirana-pos) feeds it catalog reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleLine, TaxRate};
use crate::{MAX_BILL_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Bill Line
// =============================================================================

/// One line of the in-progress bill.
///
/// Identity within a bill is the scan code: adding the same product again
/// increments quantity instead of duplicating the line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    /// Scan code of the product (line identity within the bill).
    pub scan_code: String,

    /// Product name at add-time.
    pub name: String,

    /// Unit price in paise, pinned when the line was created.
    pub unit_price_paise: i64,

    /// Quantity, always >= 1.
    pub quantity: i64,

    /// When this line was first added.
    pub added_at: DateTime<Utc>,
}

impl BillLine {
    fn from_product(product: &Product) -> Self {
        BillLine {
            scan_code: product.scan_code.clone(),
            name: product.name.clone(),
            unit_price_paise: product.price_paise,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Line total (pinned price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.unit_price_paise) * self.quantity
    }
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Derived totals, computed fresh from the current lines. Pure and
/// idempotent: two calls without mutation yield identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    pub subtotal_paise: i64,
    pub tax_paise: i64,
    pub total_paise: i64,
}

impl BillTotals {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_paise(self.tax_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// The single active bill: an ordered sequence of lines.
///
/// ## Invariants
/// - lines are unique by scan code (same product merges)
/// - every line quantity >= 1
/// - at most `MAX_BILL_LINES` lines, `MAX_LINE_QUANTITY` per line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bill {
    lines: Vec<BillLine>,
}

impl Bill {
    /// Creates a new empty bill.
    pub fn new() -> Self {
        Bill { lines: Vec::new() }
    }

    /// Adds one unit of a product, merging with an existing line for the
    /// same scan code.
    ///
    /// ## Errors
    /// - `OutOfStock` if the product's on-hand quantity is zero. The
    ///   caller passes the product as read from the live catalog, so this
    ///   check reflects current stock.
    /// - `QuantityTooLarge` / `BillTooLarge` at the guard-rail caps.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        if !product.in_stock() {
            return Err(CoreError::OutOfStock {
                scan_code: product.scan_code.clone(),
                name: product.name.clone(),
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.scan_code == product.scan_code)
        {
            if line.quantity + 1 > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + 1,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity += 1;
            return Ok(());
        }

        if self.lines.len() >= MAX_BILL_LINES {
            return Err(CoreError::BillTooLarge {
                max: MAX_BILL_LINES,
            });
        }

        self.lines.push(BillLine::from_product(product));
        Ok(())
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// `available` is the catalog's CURRENT on-hand quantity for the
    /// line's product, read live by the caller — deliberately not the
    /// quantity pinned in the bill.
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity < 1`
    /// - `InsufficientStock` if `quantity > available`
    /// - `LineOutOfRange` for a bad index
    pub fn set_quantity(&mut self, index: usize, quantity: i64, available: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity(quantity));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineOutOfRange(index))?;

        if quantity > available {
            return Err(CoreError::InsufficientStock {
                scan_code: line.scan_code.clone(),
                requested: quantity,
                available,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes the line at `index` and returns it.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<BillLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Drops all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Computes (subtotal, tax, total) fresh from the current lines.
    pub fn totals(&self, rate: TaxRate) -> BillTotals {
        let subtotal: i64 = self.lines.iter().map(|l| l.line_total().paise()).sum();
        let tax = Money::from_paise(subtotal).tax_at(rate).paise();
        BillTotals {
            subtotal_paise: subtotal,
            tax_paise: tax,
            total_paise: subtotal + tax,
        }
    }

    /// Snapshots the lines for the sales ledger.
    pub fn to_sale_lines(&self) -> Vec<SaleLine> {
        self.lines
            .iter()
            .map(|l| SaleLine {
                scan_code: l.scan_code.clone(),
                name: l.name.clone(),
                price_paise: l.unit_price_paise,
                quantity: l.quantity,
            })
            .collect()
    }

    /// The lines in bill order.
    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    /// Checks if the bill has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, price_paise: i64, quantity: i64) -> Product {
        Product {
            id: 1,
            scan_code: code.to_string(),
            name: format!("Product {}", code),
            category: "Test".to_string(),
            price_paise,
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_same_product_merges_line() {
        // Scenario A: three adds of MILK500 at ₹30.00 produce one line
        // with quantity 3 and a ₹90.00 subtotal.
        let mut bill = Bill::new();
        let milk = product("MILK500", 3000, 20);

        bill.add_product(&milk).unwrap();
        bill.add_product(&milk).unwrap();
        bill.add_product(&milk).unwrap();

        assert_eq!(bill.line_count(), 1);
        assert_eq!(bill.lines()[0].quantity, 3);
        assert_eq!(bill.totals(TaxRate::zero()).subtotal_paise, 9000);
    }

    #[test]
    fn test_add_out_of_stock_rejected() {
        let mut bill = Bill::new();
        let gone = product("SOAP001", 3500, 0);

        let err = bill.add_product(&gone).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(bill.is_empty());
    }

    #[test]
    fn test_set_quantity_beyond_available_fails() {
        // Scenario B: 5 on hand, requesting 10 fails and changes nothing.
        let mut bill = Bill::new();
        let bread = product("BREAD01", 4000, 5);
        bill.add_product(&bread).unwrap();

        let err = bill.set_quantity(0, 10, 5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                requested: 10,
                available: 5,
                ..
            }
        ));
        assert_eq!(bill.lines()[0].quantity, 1);
    }

    #[test]
    fn test_set_quantity_below_one_invalid() {
        let mut bill = Bill::new();
        bill.add_product(&product("RICE1KG", 7000, 20)).unwrap();

        assert!(matches!(
            bill.set_quantity(0, 0, 20),
            Err(CoreError::InvalidQuantity(0))
        ));
        assert!(matches!(
            bill.set_quantity(0, -3, 20),
            Err(CoreError::InvalidQuantity(-3))
        ));
    }

    #[test]
    fn test_price_pinned_at_add_time() {
        let mut bill = Bill::new();
        let mut sugar = product("SUGAR1", 4500, 20);
        bill.add_product(&sugar).unwrap();

        // Catalog price changes mid-bill; the pinned line must not move.
        sugar.price_paise = 9999;
        assert_eq!(bill.lines()[0].unit_price_paise, 4500);
        assert_eq!(bill.totals(TaxRate::zero()).total_paise, 4500);
    }

    #[test]
    fn test_totals_idempotent() {
        let mut bill = Bill::new();
        bill.add_product(&product("ATTA1KG", 5500, 20)).unwrap();
        bill.add_product(&product("ATTA1KG", 5500, 20)).unwrap();

        let first = bill.totals(TaxRate::zero());
        let second = bill.totals(TaxRate::zero());
        assert_eq!(first, second);
    }

    #[test]
    fn test_remove_line_and_clear() {
        let mut bill = Bill::new();
        bill.add_product(&product("KITKAT", 2500, 20)).unwrap();
        bill.add_product(&product("DAIRYM", 2000, 20)).unwrap();

        let removed = bill.remove_line(0).unwrap();
        assert_eq!(removed.scan_code, "KITKAT");
        assert_eq!(bill.line_count(), 1);

        assert!(matches!(
            bill.remove_line(5),
            Err(CoreError::LineOutOfRange(5))
        ));

        bill.clear();
        assert!(bill.is_empty());
    }

    #[test]
    fn test_sale_line_snapshot_preserves_order() {
        let mut bill = Bill::new();
        bill.add_product(&product("PANEER2", 7500, 20)).unwrap();
        bill.add_product(&product("CHEESE1", 12000, 20)).unwrap();
        bill.add_product(&product("PANEER2", 7500, 20)).unwrap();

        let lines = bill.to_sale_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].scan_code, "PANEER2");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].scan_code, "CHEESE1");
    }
}
