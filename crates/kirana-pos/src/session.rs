//! # Till Session
//!
//! One cashier, one active bill, one store. The session is the only
//! place the in-memory bill and the durable store meet.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  scan ──► add_by_code ──► bill grows (stock checked live)           │
//! │                 │                                                   │
//! │  adjust ──► set_line_quantity / remove_line                         │
//! │                 │                                                   │
//! │  checkout(customer)                                                 │
//! │       ├── engine.settle()      one atomic transaction               │
//! │       ├── bill cleared         only on success                      │
//! │       └── notifier.notify()    non-fatal, sale already committed    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed checkout leaves the bill exactly as it was, so the cashier
//! can drop the conflicting line and settle again.

use chrono::Utc;
use tracing::{debug, info, warn};

use kirana_core::validation::{validate_price, validate_product_name, validate_scan_code};
use kirana_core::{Bill, BillLine, BillTotals, CoreError, LowStockAlert, Product};
use kirana_db::repository::catalog::NewProduct;
use kirana_db::{CheckoutOutcome, DbError, Store};

use crate::config::PosConfig;
use crate::error::{PosError, PosResult};
use crate::notify::{AlertNotifier, LogNotifier};
use crate::receipt;

/// An open till session.
pub struct Session {
    store: Store,
    config: PosConfig,
    cashier: String,
    bill: Bill,
    notifier: Box<dyn AlertNotifier>,
}

impl Session {
    /// Opens a session over the given store, logging alerts by default.
    pub fn new(store: Store, config: PosConfig) -> Self {
        Session {
            store,
            config,
            cashier: "till-1".to_string(),
            bill: Bill::new(),
            notifier: Box::new(LogNotifier),
        }
    }

    /// Sets the cashier label recorded in checkout logs.
    pub fn with_cashier(mut self, cashier: impl Into<String>) -> Self {
        self.cashier = cashier.into();
        self
    }

    /// Replaces the alert notifier.
    pub fn with_notifier(mut self, notifier: Box<dyn AlertNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // =========================================================================
    // Catalog Views
    // =========================================================================

    /// The full catalog, sorted by name.
    pub async fn catalog_snapshot(&self) -> PosResult<Vec<Product>> {
        Ok(self.store.catalog().list_all().await?)
    }

    /// Case-insensitive search across name, scan code and category.
    pub async fn search(&self, term: &str) -> PosResult<Vec<Product>> {
        Ok(self.store.catalog().search(term).await?)
    }

    /// Every product currently below the session's low-stock threshold.
    pub async fn low_stock_report(&self) -> PosResult<Vec<LowStockAlert>> {
        let products = self.store.catalog().list_all().await?;
        Ok(kirana_core::detect(&products, self.config.low_stock_threshold))
    }

    // =========================================================================
    // Catalog Administration
    // =========================================================================

    /// Adds a new product to the catalog, with its first stock-history
    /// observation. Fails on a duplicate scan code.
    pub async fn add_catalog_product(
        &self,
        scan_code: &str,
        name: &str,
        category: &str,
        price_paise: i64,
        quantity: i64,
    ) -> PosResult<Product> {
        validate_scan_code(scan_code).map_err(CoreError::from)?;
        validate_product_name(name).map_err(CoreError::from)?;
        validate_price(price_paise).map_err(CoreError::from)?;
        if quantity < 0 {
            return Err(CoreError::InvalidQuantity(quantity).into());
        }

        let new = NewProduct {
            scan_code: scan_code.trim().to_string(),
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price_paise,
            quantity,
            created_at: Utc::now(),
        };

        let product = self
            .store
            .catalog()
            .insert_if_absent(&new)
            .await?
            .ok_or_else(|| DbError::UniqueViolation {
                field: "scan_code".to_string(),
                value: new.scan_code.clone(),
            })?;

        self.store
            .history()
            .append(product.id, product.created_at, product.quantity)
            .await?;

        info!(scan_code = %product.scan_code, quantity, "product added to catalog");
        Ok(product)
    }

    /// Receives new units of an existing product, recording the
    /// resulting level in the stock history.
    pub async fn restock(&self, scan_code: &str, units: i64) -> PosResult<i64> {
        if units < 1 {
            return Err(CoreError::InvalidQuantity(units).into());
        }

        let new_quantity = self.store.catalog().adjust_quantity(scan_code, units).await?;
        let product = self
            .store
            .catalog()
            .find_by_code(scan_code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(scan_code.to_string()))?;
        self.store
            .history()
            .append(product.id, Utc::now(), new_quantity)
            .await?;

        info!(scan_code = %scan_code, units, new_quantity, "restocked");
        Ok(new_quantity)
    }

    // =========================================================================
    // Bill Building
    // =========================================================================

    /// Scans one unit of a product onto the bill.
    ///
    /// Repeated scans of the same code merge into one line. The unit
    /// price is pinned at first scan; availability is always checked
    /// against the live catalog. Lookup is trimmed and case-insensitive
    /// (scanner vs. hand entry), and the line carries the catalog's
    /// canonical code regardless of how it was typed.
    pub async fn add_by_code(&mut self, code: &str) -> PosResult<()> {
        validate_scan_code(code).map_err(CoreError::from)?;
        let code = code.trim();

        let product = self
            .store
            .catalog()
            .find_by_code(code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))?;

        self.bill.add_product(&product)?;
        debug!(scan_code = %code, lines = self.bill.line_count(), "line added");
        Ok(())
    }

    /// Sets the quantity of an existing line, re-reading live stock so
    /// a quantity the shelf cannot cover is refused immediately.
    pub async fn set_line_quantity(&mut self, index: usize, quantity: i64) -> PosResult<()> {
        let scan_code = self
            .bill
            .lines()
            .get(index)
            .ok_or(CoreError::LineOutOfRange(index))?
            .scan_code
            .clone();

        let product = self
            .store
            .catalog()
            .find_by_code(&scan_code)
            .await?
            .ok_or(CoreError::ProductNotFound(scan_code))?;

        self.bill.set_quantity(index, quantity, product.quantity)?;
        Ok(())
    }

    /// Removes a line from the bill.
    pub fn remove_line(&mut self, index: usize) -> PosResult<BillLine> {
        Ok(self.bill.remove_line(index)?)
    }

    /// Abandons the current bill.
    pub fn clear_bill(&mut self) {
        self.bill.clear();
    }

    /// The active bill's lines.
    pub fn bill_lines(&self) -> &[BillLine] {
        self.bill.lines()
    }

    /// Subtotal, tax and total of the active bill at the session rate.
    pub fn totals(&self) -> BillTotals {
        self.bill.totals(self.config.tax_rate)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Settles the active bill as one atomic sale.
    ///
    /// On success the bill is cleared and any low-stock alerts among
    /// the sold lines are handed to the notifier; a delivery failure is
    /// logged and swallowed, since the sale is already committed. On
    /// any error the bill is left untouched for the cashier to fix up.
    pub async fn checkout(&mut self, customer: &str) -> PosResult<CheckoutOutcome> {
        let engine = self
            .store
            .checkout(self.config.tax_rate, self.config.low_stock_threshold);

        let outcome = engine.settle(&self.bill, customer).await?;

        self.bill.clear();
        debug!(cashier = %self.cashier, sale_id = outcome.sale.id, "bill settled and cleared");

        if !outcome.alerts.is_empty() {
            if let Err(e) = self.notifier.notify(&outcome.alerts) {
                warn!(error = %e, "low-stock alert delivery failed");
            }
        }

        Ok(outcome)
    }

    /// Renders a printable receipt for a committed sale, headed by the
    /// shop name and this session's cashier.
    pub fn receipt(&self, outcome: &CheckoutOutcome) -> String {
        receipt::render(&self.config.shop_name, &self.cashier, &outcome.sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_db::StoreConfig;

    async fn open_session() -> Session {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        Session::new(store, PosConfig::default())
    }

    #[tokio::test]
    async fn test_repeated_scans_merge_into_one_line() {
        let mut session = open_session().await;

        session.add_by_code("MILK500").await.unwrap();
        session.add_by_code("MILK500").await.unwrap();
        session.add_by_code("MILK500").await.unwrap();

        assert_eq!(session.bill_lines().len(), 1);
        assert_eq!(session.bill_lines()[0].quantity, 3);
        // 3 × 3000 paise, zero tax
        assert_eq!(session.totals().subtotal_paise, 9000);
        assert_eq!(session.totals().total_paise, 9000);
    }

    #[tokio::test]
    async fn test_quantity_beyond_live_stock_is_refused() {
        let mut session = open_session().await;

        session.add_by_code("SOAP001").await.unwrap();

        // Seeded stock is 20
        let err = session.set_line_quantity(0, 25).await.unwrap_err();
        assert!(matches!(
            err,
            PosError::Core(CoreError::InsufficientStock { .. })
        ));

        // Bill unchanged by the failure
        assert_eq!(session.bill_lines()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_scan_tolerates_case_and_padding() {
        let mut session = open_session().await;

        // Hand entry, scanner padding and case variants all hit the
        // same catalog row and merge into one line
        session.add_by_code("MILK500").await.unwrap();
        session.add_by_code("  MILK500  ").await.unwrap();
        session.add_by_code("milk500").await.unwrap();

        assert_eq!(session.bill_lines().len(), 1);
        assert_eq!(session.bill_lines()[0].quantity, 3);
        // The line carries the canonical stored code
        assert_eq!(session.bill_lines()[0].scan_code, "MILK500");

        // Quantity edits and restocks resolve the same way
        session.set_line_quantity(0, 5).await.unwrap();
        assert_eq!(session.restock(" lays50 ", 5).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_unknown_code_is_reported() {
        let mut session = open_session().await;

        let err = session.add_by_code("NOPE999").await.unwrap_err();
        assert!(matches!(
            err,
            PosError::Core(CoreError::ProductNotFound(_))
        ));
        assert!(session.bill_lines().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_clears_bill_and_prints_receipt() {
        let mut session = open_session().await.with_cashier("Sunita");

        session.add_by_code("BREAD01").await.unwrap();
        session.add_by_code("PARLEG1").await.unwrap();

        let outcome = session.checkout("").await.unwrap();

        assert!(session.bill_lines().is_empty());
        assert_eq!(outcome.sale.customer, "Walk-in");
        // 4000 + 1000 paise
        assert_eq!(outcome.sale.total_paise, 5000);

        let text = session.receipt(&outcome);
        assert!(text.contains("Cashier: Sunita"));
        assert!(text.contains("Bread (400g)"));
        assert!(text.contains("Parle-G (100g)"));
        assert!(text.contains("₹50.00"));
    }

    #[tokio::test]
    async fn test_failed_checkout_preserves_bill() {
        let mut session = open_session().await;

        session.add_by_code("RICE1KG").await.unwrap();
        session.set_line_quantity(0, 3).await.unwrap();

        // Shelf drained behind the bill's back
        session
            .store
            .catalog()
            .adjust_quantity("RICE1KG", -19)
            .await
            .unwrap();

        let err = session.checkout("").await.unwrap_err();
        assert!(matches!(
            err,
            PosError::Core(CoreError::StockConflict { .. })
        ));

        // Still there for the cashier to adjust
        assert_eq!(session.bill_lines().len(), 1);
        assert_eq!(session.bill_lines()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_low_stock_report_covers_whole_catalog() {
        let mut session = open_session().await;
        session.config.low_stock_threshold = 10;

        assert!(session.low_stock_report().await.unwrap().is_empty());

        session
            .store
            .catalog()
            .adjust_quantity("KITKAT", -15)
            .await
            .unwrap();

        let report = session.low_stock_report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].scan_code, "KITKAT");
        assert_eq!(report[0].remaining, 5);
    }

    #[tokio::test]
    async fn test_add_catalog_product_then_sell_it() {
        let mut session = open_session().await;

        let product = session
            .add_catalog_product("TEA250", "Tea 250g", "Grocery", 12500, 8)
            .await
            .unwrap();
        assert_eq!(product.quantity, 8);

        // Duplicate scan code is refused
        let err = session
            .add_catalog_product("TEA250", "Tea again", "Grocery", 100, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, PosError::Db(DbError::UniqueViolation { .. })));

        session.add_by_code("TEA250").await.unwrap();
        let outcome = session.checkout("").await.unwrap();
        assert_eq!(outcome.sale.total_paise, 12500);
    }

    #[tokio::test]
    async fn test_restock_records_new_level() {
        let session = open_session().await;

        // 20 + 30 = 50
        let new_quantity = session.restock("SUGAR1", 30).await.unwrap();
        assert_eq!(new_quantity, 50);

        // Zero or negative receipts are rejected
        assert!(matches!(
            session.restock("SUGAR1", 0).await.unwrap_err(),
            PosError::Core(CoreError::InvalidQuantity(0))
        ));

        let sugar = session
            .store
            .catalog()
            .find_by_code("SUGAR1")
            .await
            .unwrap()
            .unwrap();
        let entries = session.store.history().for_item(sugar.id).await.unwrap();
        let levels: Vec<i64> = entries.iter().map(|e| e.quantity).collect();
        assert_eq!(levels, vec![20, 50]);
    }

    #[tokio::test]
    async fn test_search_reaches_the_catalog() {
        let session = open_session().await;

        let hits = session.search("dairy").await.unwrap();
        assert!(hits.iter().any(|p| p.scan_code == "MILK500"));
        assert!(hits.iter().any(|p| p.scan_code == "PANEER2"));
    }
}
