//! # Low-Stock Detection
//!
//! A pure function over catalog rows. Two callers share it: the stock
//! dashboard (whole catalog) and the checkout engine (only the lines just
//! sold, so alerts are scoped to the transaction that triggered them).

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// A product flagged for restock attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub scan_code: String,
    pub name: String,
    pub remaining: i64,
}

impl LowStockAlert {
    fn from_product(product: &Product) -> Self {
        LowStockAlert {
            scan_code: product.scan_code.clone(),
            name: product.name.clone(),
            remaining: product.quantity,
        }
    }
}

/// Returns the subset of `products` with `quantity < threshold`,
/// stable-sorted by name. No side effects.
pub fn detect(products: &[Product], threshold: i64) -> Vec<LowStockAlert> {
    let mut alerts: Vec<LowStockAlert> = products
        .iter()
        .filter(|p| p.quantity < threshold)
        .map(LowStockAlert::from_product)
        .collect();
    alerts.sort_by(|a, b| a.name.cmp(&b.name));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(code: &str, name: &str, quantity: i64) -> Product {
        Product {
            id: 0,
            scan_code: code.to_string(),
            name: name.to_string(),
            category: "Test".to_string(),
            price_paise: 1000,
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_detect_below_threshold_only() {
        let products = vec![
            product("A1", "Atta", 12),
            product("B1", "Bread", 7),
            product("C1", "Cheese", 10),
        ];

        let alerts = detect(&products, 10);
        // 10 is NOT below a threshold of 10
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].scan_code, "B1");
        assert_eq!(alerts[0].remaining, 7);
    }

    #[test]
    fn test_detect_sorted_by_name() {
        let products = vec![
            product("Z9", "Zeera", 1),
            product("A1", "Atta", 2),
            product("M5", "Milk", 3),
        ];

        let names: Vec<String> = detect(&products, 10).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Atta", "Milk", "Zeera"]);
    }

    #[test]
    fn test_detect_empty_when_all_healthy() {
        let products = vec![product("A1", "Atta", 50)];
        assert!(detect(&products, 10).is_empty());
    }
}
