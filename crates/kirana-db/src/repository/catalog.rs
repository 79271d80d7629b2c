//! # Catalog Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - listing and lookup by scan code
//! - guarded quantity adjustment (never below zero)
//! - idempotent insert for seeding / admin add
//!
//! Every successful write here is durable before the call returns; the
//! checkout engine relies on read-after-write consistency within one
//! commit.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kirana_core::Product;

/// A catalog row waiting to be inserted (no id yet; SQLite assigns it).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub scan_code: String,
    pub name: String,
    pub category: String,
    pub price_paise: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists the whole catalog, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, scan_code, name, category, price_paise, quantity, created_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive substring search across name, scan code and
    /// category (the billing page's search box).
    pub async fn search(&self, term: &str) -> DbResult<Vec<Product>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_all().await;
        }

        debug!(term = %term, "searching catalog");

        let pattern = format!("%{}%", term);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, scan_code, name, category, price_paise, quantity, created_at
            FROM products
            WHERE name LIKE ?1 COLLATE NOCASE
               OR scan_code LIKE ?1 COLLATE NOCASE
               OR category LIKE ?1 COLLATE NOCASE
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Looks a product up by scan code.
    ///
    /// Barcode scanners and hand entry disagree on case and padding, so
    /// matching is trimmed and case-insensitive. The returned row always
    /// carries the canonical stored code.
    pub async fn find_by_code(&self, scan_code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, scan_code, name, category, price_paise, quantity, created_at
            FROM products
            WHERE scan_code = ?1 COLLATE NOCASE
            "#,
        )
        .bind(scan_code.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Looks a product up by database id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, scan_code, name, category, price_paise, quantity, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Adjusts on-hand quantity by `delta` (negative for sales, positive
    /// for restocking) and returns the new quantity.
    ///
    /// ## Guarded Update
    /// ```text
    /// UPDATE products SET quantity = quantity + Δ
    /// WHERE scan_code = ? AND quantity + Δ >= 0
    /// ```
    /// A refused adjustment surfaces as [`DbError::StockUnderflow`]
    /// instead of tripping the table's CHECK constraint, so callers get
    /// a typed error with the scan code attached.
    pub async fn adjust_quantity(&self, scan_code: &str, delta: i64) -> DbResult<i64> {
        let scan_code = scan_code.trim();
        debug!(scan_code = %scan_code, delta = %delta, "adjusting quantity");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?1
            WHERE scan_code = ?2 COLLATE NOCASE AND quantity + ?1 >= 0
            "#,
        )
        .bind(delta)
        .bind(scan_code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Missing row and refused underflow both affect zero rows;
            // tell them apart for the caller.
            return match self.find_by_code(scan_code).await? {
                None => Err(DbError::not_found("product", scan_code)),
                Some(_) => Err(DbError::StockUnderflow {
                    scan_code: scan_code.to_string(),
                }),
            };
        }

        let quantity: i64 =
            sqlx::query_scalar("SELECT quantity FROM products WHERE scan_code = ?1 COLLATE NOCASE")
                .bind(scan_code)
                .fetch_one(&self.pool)
                .await?;

        Ok(quantity)
    }

    /// Inserts a product if its scan code is not already present.
    ///
    /// Returns the inserted row, or `None` when the scan code already
    /// existed (the existing row is left untouched). Idempotent per scan
    /// code; used by seeding and admin add.
    pub async fn insert_if_absent(&self, new: &NewProduct) -> DbResult<Option<Product>> {
        debug!(scan_code = %new.scan_code, "inserting product if absent");

        // The UNIQUE index is case-sensitive but lookup identity is not;
        // a case variant of an existing code counts as present.
        if self.find_by_code(&new.scan_code).await?.is_some() {
            return Ok(None);
        }

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO products
                (scan_code, name, category, price_paise, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&new.scan_code)
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price_paise)
        .bind(new.quantity)
        .bind(new.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_code(&new.scan_code).await
    }

    /// Counts catalog rows (seed guard / diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
