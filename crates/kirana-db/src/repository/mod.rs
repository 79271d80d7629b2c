//! # Repository Module
//!
//! Pool-bound repository implementations, one per durable table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Session layer                                                      │
//! │       │   store.catalog().find_by_code("MILK500")                   │
//! │       ▼                                                             │
//! │  CatalogRepository ── SQL isolated here ──► SQLite                  │
//! │                                                                     │
//! │  The one multi-table write path (checkout) does NOT go through      │
//! │  these: it runs its own transaction in crate::checkout so the       │
//! │  validate+deduct+history+ledger sequence is one commit scope.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - product rows, quantity adjustment
//! - [`history::StockHistoryRepository`] - append-only stock time series
//! - [`sales::SalesRepository`] - append-only sales ledger

pub mod catalog;
pub mod history;
pub mod sales;
