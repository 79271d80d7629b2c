//! # Store: Pool Management and Entry Point
//!
//! Connection pool creation and configuration for the SQLite store.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  StoreConfig::new(path)  ← configure pool settings                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Store::open(config).await                                          │
//! │       ├── create pool (WAL mode, foreign keys on)                   │
//! │       ├── run embedded migrations                                   │
//! │       └── ensure_seeded() ← idempotent default catalog              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  store.catalog() / store.history() / store.sales()                  │
//! │  store.checkout(rate, threshold) ← the transaction engine           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! Write-Ahead Logging is enabled so dashboard reads never block the
//! checkout writer, plus better crash recovery.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use kirana_core::TaxRate;

use crate::checkout::CheckoutEngine;
use crate::error::{DbError, DbResult};
use crate::repository::catalog::CatalogRepository;
use crate::repository::history::StockHistoryRepository;
use crate::repository::sales::SalesRepository;
use crate::{migrations, seed};

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./kirana.db").max_connections(5);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (one till only ever has one writer)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    pub min_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    pub idle_timeout: Duration,

    /// Whether to run migrations on open. Default: true.
    pub run_migrations: bool,

    /// Whether to seed the default catalog into an empty products table.
    /// Default: true.
    pub seed_defaults: bool,
}

impl StoreConfig {
    /// Creates a configuration for the given path. The file is created
    /// on open if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            seed_defaults: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets whether to seed the default catalog.
    pub fn seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// In-memory store configuration (for tests).
    ///
    /// Single connection: each in-memory connection is its own database,
    /// so pooling more than one would split the data.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            seed_defaults: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the durable store: three tables, one SQLite file.
///
/// Cloning is cheap (the pool is internally reference-counted); every
/// repository accessor hands out a pool-bound repository.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if needed) the store, runs migrations and the
    /// idempotent default-catalog seed.
    ///
    /// Seeding here, once, at construction replaces the scattered
    /// "count rows, else insert" checks a first draft tends to grow.
    pub async fn open(config: StoreConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "opening store");

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            // WAL: dashboard reads never block the checkout writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL: durable against corruption; at worst the last
            // transaction is lost on power failure, never half of one
            .synchronous(SqliteSynchronous::Normal)
            // stock_history.item_id references products.id
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "store pool created");

        let store = Store { pool };

        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        if config.seed_defaults {
            seed::ensure_seeded(&store.pool).await?;
        }

        Ok(store)
    }

    /// Returns a reference to the connection pool, for queries not
    /// covered by the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the catalog repository.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Returns the stock history repository.
    pub fn history(&self) -> StockHistoryRepository {
        StockHistoryRepository::new(self.pool.clone())
    }

    /// Returns the sales ledger repository.
    pub fn sales(&self) -> SalesRepository {
        SalesRepository::new(self.pool.clone())
    }

    /// Returns a checkout engine bound to this store.
    pub fn checkout(&self, tax_rate: TaxRate, low_stock_threshold: i64) -> CheckoutEngine {
        CheckoutEngine::new(self.pool.clone(), tax_rate, low_stock_threshold)
    }

    /// Closes the connection pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("closing store pool");
        self.pool.close().await;
    }

    /// Checks if the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_opens_and_seeds() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        assert!(store.health_check().await);
        // Default catalog present
        assert!(store.catalog().count().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/kirana-test.db")
            .max_connections(10)
            .min_connections(2)
            .seed_defaults(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.seed_defaults);
    }
}
