//! # Stock History Repository
//!
//! The append-only stock level time series. There is deliberately no
//! update or delete here: once observed, a level stays observed. The
//! analytics view plots `for_item` directly.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kirana_core::StockHistoryEntry;

/// Repository for the stock history table.
#[derive(Debug, Clone)]
pub struct StockHistoryRepository {
    pool: SqlitePool,
}

impl StockHistoryRepository {
    /// Creates a new StockHistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockHistoryRepository { pool }
    }

    /// Appends one observation: the product's level at `recorded_at`,
    /// AFTER whatever change prompted the observation.
    pub async fn append(
        &self,
        item_id: i64,
        recorded_at: DateTime<Utc>,
        quantity: i64,
    ) -> DbResult<i64> {
        debug!(item_id, quantity, "appending stock history entry");

        let result = sqlx::query(
            r#"
            INSERT INTO stock_history (item_id, recorded_at, quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(item_id)
        .bind(recorded_at)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All observations for one product, in insertion (id) order.
    ///
    /// Id order matches time order by the append-only invariant, and
    /// additionally breaks ties for multi-line commits that share one
    /// timestamp.
    pub async fn for_item(&self, item_id: i64) -> DbResult<Vec<StockHistoryEntry>> {
        let entries = sqlx::query_as::<_, StockHistoryEntry>(
            r#"
            SELECT id, item_id, recorded_at, quantity
            FROM stock_history
            WHERE item_id = ?1
            ORDER BY id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// The most recent observation for one product, if any.
    pub async fn latest_for_item(&self, item_id: i64) -> DbResult<Option<StockHistoryEntry>> {
        let entry = sqlx::query_as::<_, StockHistoryEntry>(
            r#"
            SELECT id, item_id, recorded_at, quantity
            FROM stock_history
            WHERE item_id = ?1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Total number of observations (diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    #[tokio::test]
    async fn test_append_and_read_in_order() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let history = store.history();

        let milk = store
            .catalog()
            .find_by_code("MILK500")
            .await
            .unwrap()
            .unwrap();

        let now = Utc::now();
        history.append(milk.id, now, 15).await.unwrap();
        history.append(milk.id, now, 12).await.unwrap();

        let entries = history.for_item(milk.id).await.unwrap();
        // Seed wrote the first entry (20), then ours
        let levels: Vec<i64> = entries.iter().map(|e| e.quantity).collect();
        assert_eq!(levels, vec![20, 15, 12]);

        let latest = history.latest_for_item(milk.id).await.unwrap().unwrap();
        assert_eq!(latest.quantity, 12);
    }
}
