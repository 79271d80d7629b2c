//! # Checkout Engine
//!
//! The one algorithm in the system with real correctness obligations:
//! turn a bill into a committed sale, atomically.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  settle(bill, customer)          ── one SQLite transaction ──       │
//! │                                                                     │
//! │  1. VALIDATE   re-read every line's current stock                   │
//! │                any shortfall ► StockConflict, nothing written,      │
//! │                bill untouched, caller may adjust and retry          │
//! │                                                                     │
//! │  2. DEDUCT     per line, in bill order:                             │
//! │                guarded UPDATE (quantity can never go negative)      │
//! │                └─► append history row with the RESULTING level      │
//! │                                                                     │
//! │  3. LEDGER     append one sale row (line snapshot, total, customer) │
//! │                                                                     │
//! │  ── COMMIT ──  the atomicity boundary: any storage failure above    │
//! │                rolls the whole transaction back (fatal, nothing     │
//! │                observably applied)                                  │
//! │                                                                     │
//! │  4. ALERTS     re-read the sold products, run the low-stock         │
//! │                detector; delivery is the CALLER's job and can       │
//! │                never block or reverse the committed sale            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All history rows of one commit share one timestamp; insertion order
//! breaks the ties, so per-product level sequences chain correctly.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use kirana_core::validation::normalize_customer;
use kirana_core::{detect, Bill, CoreError, LowStockAlert, Product, SaleRecord, TaxRate};

use crate::error::{DbError, DbResult};

// =============================================================================
// Errors & Outcome
// =============================================================================

/// Errors at the engine boundary.
///
/// `Core` variants (notably `StockConflict`) are recoverable and always
/// raised before any write. `Db` variants are fatal to the attempted
/// transaction; the rollback guarantees nothing was applied.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// What a successful checkout hands back to the session layer.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The committed, immutable ledger record.
    pub sale: SaleRecord,

    /// Products among the sold lines now below the low-stock threshold.
    /// Scoped to this transaction's lines, not the whole catalog.
    pub alerts: Vec<LowStockAlert>,
}

// =============================================================================
// Engine
// =============================================================================

/// The checkout engine, bound to a store pool and the shop's fixed tax
/// rate and low-stock threshold.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
    tax_rate: TaxRate,
    low_stock_threshold: i64,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool, tax_rate: TaxRate, low_stock_threshold: i64) -> Self {
        CheckoutEngine {
            pool,
            tax_rate,
            low_stock_threshold,
        }
    }

    /// Settles a bill: validate, deduct, record history, record the
    /// sale — as a single transaction — then report low-stock alerts.
    ///
    /// ## Errors
    /// - `CoreError::EmptyBill` for a bill with no lines
    /// - `CoreError::ProductNotFound` if a line's scan code vanished
    /// - `CoreError::StockConflict` when live stock no longer covers a
    ///   line (the offender, requested and available are all named)
    /// - `DbError::*` for storage failures; the transaction rolls back
    ///
    /// On any error the bill is left unmodified; a conflict is expected
    /// cashier-facing feedback, not a fault.
    pub async fn settle(
        &self,
        bill: &Bill,
        customer: &str,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if bill.is_empty() {
            return Err(CoreError::EmptyBill.into());
        }

        let customer = normalize_customer(customer);
        debug!(lines = bill.line_count(), customer = %customer, "settling bill");

        // Dropped transactions roll back, so every early return below
        // leaves the store untouched.
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // --- Step 1: validate every line against current stock --------------
        let mut item_ids = Vec::with_capacity(bill.line_count());
        for line in bill.lines() {
            let row: Option<(i64, i64)> =
                sqlx::query_as("SELECT id, quantity FROM products WHERE scan_code = ?1")
                    .bind(&line.scan_code)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(DbError::from)?;

            let (item_id, available) = match row {
                Some(row) => row,
                None => return Err(CoreError::ProductNotFound(line.scan_code.clone()).into()),
            };

            if available < line.quantity {
                return Err(CoreError::StockConflict {
                    scan_code: line.scan_code.clone(),
                    requested: line.quantity,
                    available,
                }
                .into());
            }

            item_ids.push(item_id);
        }

        // One logical instant for the whole commit; insertion order
        // breaks the ties per product.
        let now = Utc::now();

        // --- Step 2: deduct + history, per line, in bill order --------------
        for (line, item_id) in bill.lines().iter().zip(&item_ids) {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?1
                WHERE id = ?2 AND quantity >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            // Validation ran in this same transaction, so the guard can
            // only refuse if another writer slipped in between; surface
            // it as the same conflict the cashier already understands.
            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                        .bind(item_id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(DbError::from)?;
                return Err(CoreError::StockConflict {
                    scan_code: line.scan_code.clone(),
                    requested: line.quantity,
                    available,
                }
                .into());
            }

            let remaining: i64 = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(item_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(DbError::from)?;

            sqlx::query("INSERT INTO stock_history (item_id, recorded_at, quantity) VALUES (?1, ?2, ?3)")
                .bind(item_id)
                .bind(now)
                .bind(remaining)
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;

            debug!(scan_code = %line.scan_code, sold = line.quantity, remaining, "line deducted");
        }

        // --- Step 3: ledger --------------------------------------------------
        let totals = bill.totals(self.tax_rate);
        let lines = bill.to_sale_lines();
        let lines_json = serde_json::to_string(&lines)
            .map_err(|e| DbError::Internal(format!("serializing sale lines: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (sold_at, lines_json, total_paise, customer)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(now)
        .bind(&lines_json)
        .bind(totals.total_paise)
        .bind(&customer)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let sale_id = result.last_insert_rowid();

        tx.commit().await.map_err(DbError::from)?;

        info!(
            sale_id,
            total = %totals.total(),
            lines = lines.len(),
            customer = %customer,
            "sale committed"
        );

        let sale = SaleRecord {
            id: sale_id,
            sold_at: now,
            lines,
            total_paise: totals.total_paise,
            customer,
        };

        // --- Step 4: post-commit low-stock report ---------------------------
        let alerts = self.sold_line_alerts(&sale).await?;

        Ok(CheckoutOutcome { sale, alerts })
    }

    /// Re-reads the products named by the sale's lines and runs the
    /// detector over them. Read-only and strictly after commit.
    async fn sold_line_alerts(&self, sale: &SaleRecord) -> DbResult<Vec<LowStockAlert>> {
        let mut sold_products: Vec<Product> = Vec::with_capacity(sale.lines.len());
        for line in &sale.lines {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, scan_code, name, category, price_paise, quantity, created_at
                FROM products
                WHERE scan_code = ?1
                "#,
            )
            .bind(&line.scan_code)
            .fetch_one(&self.pool)
            .await?;
            sold_products.push(product);
        }

        Ok(detect(&sold_products, self.low_stock_threshold))
    }
}
