//! # Default Catalog Seeding
//!
//! A fresh store starts with the shop's default 15-item catalog and one
//! initial stock-history observation per product, so the time series has
//! a starting point to chain from.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::catalog::{CatalogRepository, NewProduct};
use crate::repository::history::StockHistoryRepository;

/// The default catalog: (scan code, name, category, price in paise,
/// starting quantity).
pub const DEFAULT_CATALOG: &[(&str, &str, &str, i64, i64)] = &[
    ("MILK500", "Milk 500ml", "Dairy", 3000, 20),
    ("BREAD01", "Bread (400g)", "Bakery", 4000, 20),
    ("PARLEG1", "Parle-G (100g)", "Snacks", 1000, 20),
    ("SUGAR1", "Sugar 1kg", "Grocery", 4500, 20),
    ("RICE1KG", "Rice 1kg", "Grocery", 7000, 20),
    ("ATTA1KG", "Atta/Flour 1kg", "Grocery", 5500, 20),
    ("PANEER2", "Paneer 200g", "Dairy", 7500, 20),
    ("CHEESE1", "Cheese Slice Pack", "Dairy", 12000, 20),
    ("DAIRYM", "Dairy Milk 65g", "Snacks", 2000, 20),
    ("LAYS50", "Lays Chips 50g", "Snacks", 2000, 20),
    ("KITKAT", "KitKat 2-finger", "Snacks", 2500, 20),
    ("SHAMPOO_S", "Shampoo Sachet", "Personal Care", 500, 50),
    ("SHAMPOO_B", "Shampoo Bottle 200ml", "Personal Care", 9500, 20),
    ("SOAP001", "Soap (Lux)", "Personal Care", 3500, 20),
    ("BAGPLST", "Plastic Carry Bag", "General", 500, 100),
];

/// Seeds the default catalog into an empty products table.
///
/// Executed once at store construction. Idempotent twice over: it is a
/// no-op when any product exists, and the underlying insert is
/// INSERT OR IGNORE keyed on scan code.
///
/// Returns the number of products inserted (0 when already seeded).
pub async fn ensure_seeded(pool: &SqlitePool) -> DbResult<usize> {
    let catalog = CatalogRepository::new(pool.clone());
    let history = StockHistoryRepository::new(pool.clone());

    if catalog.count().await? > 0 {
        debug!("catalog already populated, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    let mut inserted = 0usize;

    for &(scan_code, name, category, price_paise, quantity) in DEFAULT_CATALOG {
        let new = NewProduct {
            scan_code: scan_code.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price_paise,
            quantity,
            created_at: now,
        };

        if let Some(product) = catalog.insert_if_absent(&new).await? {
            // First observation in the product's time series.
            history.append(product.id, now, product.quantity).await?;
            inserted += 1;
        }
    }

    info!(inserted, "seeded default catalog");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = Store::open(StoreConfig::in_memory().seed_defaults(false))
            .await
            .unwrap();

        let first = ensure_seeded(store.pool()).await.unwrap();
        assert_eq!(first, DEFAULT_CATALOG.len());

        let second = ensure_seeded(store.pool()).await.unwrap();
        assert_eq!(second, 0);

        assert_eq!(
            store.catalog().count().await.unwrap(),
            DEFAULT_CATALOG.len() as i64
        );
    }

    #[tokio::test]
    async fn test_seed_writes_initial_history() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        let milk = store
            .catalog()
            .find_by_code("MILK500")
            .await
            .unwrap()
            .unwrap();
        let entries = store.history().for_item(milk.id).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 20);
    }
}
