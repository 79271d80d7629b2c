//! Low-stock alert delivery.
//!
//! Delivery is a pluggable collaborator: the session calls it after a
//! committed checkout and treats failure as a warning, never as a
//! reason to unwind the sale.

use thiserror::Error;
use tracing::warn;

use kirana_core::LowStockAlert;

/// Alert delivery failure. Non-fatal by contract.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("alert delivery failed: {0}")]
    Delivery(String),
}

/// Receives low-stock alerts after a committed checkout.
///
/// Implementations must not block the till: do the minimum here and
/// queue anything slow (mail, webhooks) elsewhere.
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, alerts: &[LowStockAlert]) -> Result<(), NotifyError>;
}

/// Default notifier: writes each alert to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn notify(&self, alerts: &[LowStockAlert]) -> Result<(), NotifyError> {
        for alert in alerts {
            warn!(
                scan_code = %alert.scan_code,
                name = %alert.name,
                remaining = alert.remaining,
                "low stock, restock needed"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_accepts_alerts() {
        let alerts = vec![LowStockAlert {
            scan_code: "MILK500".to_string(),
            name: "Milk 500ml".to_string(),
            remaining: 3,
        }];
        assert!(LogNotifier.notify(&alerts).is_ok());
    }
}
