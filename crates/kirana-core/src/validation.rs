//! # Validation Module
//!
//! Input validation for fields that cross the session boundary. Business
//! rules (stock checks, bill caps) live in [`crate::bill`]; this module
//! only normalizes and rejects malformed input before logic runs.

use crate::error::ValidationError;
use crate::WALK_IN_CUSTOMER;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a scan code (barcode).
///
/// ## Rules
/// - not empty after trimming
/// - at most 50 characters
/// - alphanumeric plus hyphen/underscore only
///
/// ```rust
/// use kirana_core::validation::validate_scan_code;
///
/// assert!(validate_scan_code("MILK500").is_ok());
/// assert!(validate_scan_code("   ").is_err());
/// assert!(validate_scan_code("MILK 500").is_err());
/// ```
pub fn validate_scan_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "scan_code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "scan_code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "scan_code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in paise (must not be negative).
pub fn validate_price(price_paise: i64) -> ValidationResult<()> {
    if price_paise < 0 {
        return Err(ValidationError::Negative {
            field: "price_paise".to_string(),
        });
    }
    Ok(())
}

/// Normalizes a customer label: trimmed, defaulting to the walk-in
/// sentinel when blank.
///
/// ```rust
/// use kirana_core::validation::normalize_customer;
///
/// assert_eq!(normalize_customer("  Asha  "), "Asha");
/// assert_eq!(normalize_customer(""), "Walk-in");
/// ```
pub fn normalize_customer(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        WALK_IN_CUSTOMER.to_string()
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_code_rules() {
        assert!(validate_scan_code("LAYS50").is_ok());
        assert!(validate_scan_code("SHAMPOO_S").is_ok());
        assert!(validate_scan_code("").is_err());
        assert!(validate_scan_code("HAS SPACE").is_err());
        assert!(validate_scan_code(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_price_must_not_be_negative() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(4500).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_customer_defaults_to_walk_in() {
        assert_eq!(normalize_customer("Ravi"), "Ravi");
        assert_eq!(normalize_customer("   "), WALK_IN_CUSTOMER);
    }
}
