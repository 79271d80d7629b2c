//! Session-level error type.
//!
//! The session layer surfaces the same split the engine draws:
//! `Core` errors are cashier-facing and recoverable (adjust the bill,
//! try again), `Db` errors mean the store itself failed.

use thiserror::Error;

use kirana_core::CoreError;
use kirana_db::{CheckoutError, DbError};

/// Errors surfaced to the till.
#[derive(Debug, Error)]
pub enum PosError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<CheckoutError> for PosError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Core(e) => PosError::Core(e),
            CheckoutError::Db(e) => PosError::Db(e),
        }
    }
}

/// Result type for session operations.
pub type PosResult<T> = Result<T, PosError>;
