//! # Sales Ledger Repository
//!
//! The append-only record of completed transactions.
//!
//! ## Snapshot Column
//! Line items are stored as a serialized JSON snapshot
//! (`{scan_code, name, price_paise, quantity}` per line) rather than
//! joined rows: the ledger must stay truthful after later catalog edits,
//! and nothing ever queries individual sold lines relationally.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kirana_core::{SaleLine, SaleRecord};

/// Raw ledger row; `lines_json` decoded at the edge.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    sold_at: DateTime<Utc>,
    lines_json: String,
    total_paise: i64,
    customer: String,
}

impl SaleRow {
    fn decode(self) -> DbResult<SaleRecord> {
        let lines: Vec<SaleLine> = serde_json::from_str(&self.lines_json)
            .map_err(|e| DbError::CorruptRow(format!("sale {}: {}", self.id, e)))?;
        Ok(SaleRecord {
            id: self.id,
            sold_at: self.sold_at,
            lines,
            total_paise: self.total_paise,
            customer: self.customer,
        })
    }
}

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    /// Creates a new SalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRepository { pool }
    }

    /// Appends one completed sale and returns it with its assigned id.
    pub async fn append(
        &self,
        sold_at: DateTime<Utc>,
        lines: &[SaleLine],
        total_paise: i64,
        customer: &str,
    ) -> DbResult<SaleRecord> {
        debug!(total_paise, customer = %customer, lines = lines.len(), "appending sale");

        let lines_json = serde_json::to_string(lines)
            .map_err(|e| DbError::Internal(format!("serializing sale lines: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (sold_at, lines_json, total_paise, customer)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(sold_at)
        .bind(&lines_json)
        .bind(total_paise)
        .bind(customer)
        .execute(&self.pool)
        .await?;

        Ok(SaleRecord {
            id: result.last_insert_rowid(),
            sold_at,
            lines: lines.to_vec(),
            total_paise,
            customer: customer.to_string(),
        })
    }

    /// Gets one sale by ledger id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleRecord>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, sold_at, lines_json, total_paise, customer
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SaleRow::decode).transpose()
    }

    /// The most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, sold_at, lines_json, total_paise, customer
            FROM sales
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::decode).collect()
    }

    /// Total number of recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    fn lines() -> Vec<SaleLine> {
        vec![SaleLine {
            scan_code: "LAYS50".to_string(),
            name: "Lays Chips 50g".to_string(),
            price_paise: 2000,
            quantity: 5,
        }]
    }

    #[tokio::test]
    async fn test_append_and_get_round_trip() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let sales = store.sales();

        let recorded = sales
            .append(Utc::now(), &lines(), 10000, "Walk-in")
            .await
            .unwrap();
        assert!(recorded.id > 0);

        let fetched = sales.get_by_id(recorded.id).await.unwrap().unwrap();
        assert_eq!(fetched.lines, lines());
        assert_eq!(fetched.total_paise, 10000);
        assert_eq!(fetched.customer, "Walk-in");
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let sales = store.sales();

        sales.append(Utc::now(), &lines(), 100, "A").await.unwrap();
        sales.append(Utc::now(), &lines(), 200, "B").await.unwrap();

        let recent = sales.list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].customer, "B");
        assert_eq!(recent[1].customer, "A");
        assert_eq!(sales.count().await.unwrap(), 2);
    }
}
