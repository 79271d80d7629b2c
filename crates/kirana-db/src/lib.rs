//! # kirana-db: SQLite Storage for Kirana POS
//!
//! Owns the durable state of the shop: the product catalog, the
//! append-only stock history and the append-only sales ledger, plus the
//! transactional checkout engine that ties the three together.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        One SQLite File                              │
//! │                                                                     │
//! │   products          mutable ── current catalog truth               │
//! │   stock_history     append-only ── level AFTER each change         │
//! │   sales             append-only ── immutable sale snapshots        │
//! │                                                                     │
//! │   ┌──────────────┐  ┌──────────────┐  ┌──────────────┐            │
//! │   │   catalog    │  │   history    │  │    sales     │            │
//! │   │  repository  │  │  repository  │  │  repository  │            │
//! │   └──────┬───────┘  └──────┬───────┘  └──────┬───────┘            │
//! │          └────────── checkout engine ────────┘                     │
//! │                  (one transaction per sale)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Point
//! ```rust,ignore
//! let store = Store::open(StoreConfig::new("./kirana.db")).await?;
//! let products = store.catalog().list_all().await?;
//! let outcome = store.checkout(TaxRate::zero(), 10).settle(&bill, "").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{CheckoutEngine, CheckoutError, CheckoutOutcome};
pub use error::{DbError, DbResult};
pub use pool::{Store, StoreConfig};
pub use repository::catalog::{CatalogRepository, NewProduct};
pub use repository::history::StockHistoryRepository;
pub use repository::sales::SalesRepository;
pub use seed::{ensure_seeded, DEFAULT_CATALOG};
