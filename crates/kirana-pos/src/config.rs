//! Session configuration.

use kirana_core::{TaxRate, LOW_STOCK_THRESHOLD};

/// Till-level settings, fixed for the lifetime of a session.
///
/// One shop, one till, one tax regime: the rate applies uniformly to
/// every bill and is not per-product.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Shop name printed on receipt headers.
    pub shop_name: String,

    /// Tax rate applied to every bill subtotal.
    pub tax_rate: TaxRate,

    /// Quantity below which sold products raise a restock alert.
    pub low_stock_threshold: i64,
}

impl PosConfig {
    pub fn new(shop_name: impl Into<String>) -> Self {
        PosConfig {
            shop_name: shop_name.into(),
            tax_rate: TaxRate::zero(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }

    /// Sets the tax rate.
    pub fn tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Sets the low-stock threshold.
    pub fn low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }
}

impl Default for PosConfig {
    fn default() -> Self {
        PosConfig::new("Kirana Store")
    }
}
