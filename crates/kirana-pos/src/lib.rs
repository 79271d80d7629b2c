//! # kirana-pos: Till Session Layer
//!
//! The surface a till UI or CLI talks to. It owns one active bill,
//! mediates every catalog read, and drives checkout through the
//! storage layer's transaction engine.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Session ── the only stateful object at this level                  │
//! │     │                                                               │
//! │     ├── Bill (kirana-core)        in-memory, per-customer           │
//! │     ├── Store (kirana-db)         durable catalog/history/ledger    │
//! │     ├── receipt::render           pure text formatting              │
//! │     └── AlertNotifier             pluggable, post-commit only       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod notify;
pub mod receipt;
pub mod session;

pub use config::PosConfig;
pub use error::{PosError, PosResult};
pub use notify::{AlertNotifier, LogNotifier, NotifyError};
pub use session::Session;
