//! # Validation Module
//!
//! Input validation utilities for Loom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms                                              │
//! │  └── Immediate feedback (empty fields, number inputs)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Server handlers                                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules, run before any write                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document store                                               │
//! │  └── Nothing. The store accepts any JSON object.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loom_core::validation::{validate_product_code, validate_quantity};
//!
//! validate_product_code("LWN-2041").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_ITEM_QUANTITY, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, numbers, hyphens, underscores and slashes only
///
/// ## Example
/// ```rust
/// use loom_core::validation::validate_product_code;
///
/// assert!(validate_product_code("LWN-2041").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("code"));
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/')
    {
        return Err(ValidationError::invalid_format(
            "code",
            "must contain only letters, numbers, hyphens, underscores and slashes",
        ));
    }

    Ok(())
}

/// Validates a required display name (product, employee, counterparty).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// Spaces, dashes, parentheses and a leading `+` are allowed; between 7 and
/// 15 digits must remain.
///
/// ## Example
/// ```rust
/// use loom_core::validation::validate_phone;
///
/// assert!(validate_phone("+92 300 1234567").is_ok());
/// assert!(validate_phone("12ab").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+');
    if !phone.chars().all(allowed) {
        return Err(ValidationError::invalid_format(
            "phone",
            "may contain only digits, spaces, dashes, parentheses and +",
        ));
    }

    let digits = digits_only(phone);
    if digits.len() < 7 || digits.len() > 15 {
        return Err(ValidationError::invalid_format(
            "phone",
            "must have between 7 and 15 digits",
        ));
    }

    Ok(())
}

/// Validates an email address (shape only).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(ValidationError::invalid_format(
            "email",
            "must look like name@example.com",
        ));
    }

    Ok(())
}

/// Strips everything but ASCII digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a money amount.
///
/// ## Rules
/// - Not negative
/// - At most [`MAX_AMOUNT`]
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    within_max_amount(field, amount)
}

/// Validates a stock counter: not negative, at most [`MAX_STOCK`].
pub fn validate_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if count > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }
    Ok(())
}

/// Validates that an amount is strictly positive and at most [`MAX_AMOUNT`].
pub fn validate_positive(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    within_max_amount(field, amount)
}

fn within_max_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.units() > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Validates a product's price ladder.
///
/// ## Rules
/// - No price may be negative
/// - `min_sale_price ≤ current_price ≤ max_sale_price`
///
/// ## Example
/// ```rust
/// use loom_core::money::Money;
/// use loom_core::validation::validate_price_range;
///
/// let m = Money::from_units;
/// assert!(validate_price_range(m(1000), m(1200), m(1500)).is_ok());
/// assert!(validate_price_range(m(1300), m(1200), m(1500)).is_err());
/// ```
pub fn validate_price_range(min: Money, current: Money, max: Money) -> ValidationResult<()> {
    validate_amount("minSalePrice", min)?;
    validate_amount("currentPrice", current)?;
    validate_amount("maxSalePrice", max)?;

    if min > max {
        return Err(ValidationError::PriceRange {
            reason: format!("minimum {} is above maximum {}", min, max),
        });
    }

    if current < min || current > max {
        return Err(ValidationError::PriceRange {
            reason: format!(
                "current price {} must be between {} and {}",
                current, min, max
            ),
        });
    }

    Ok(())
}

/// Validates a percentage (commission rates, bargain percentages).
pub fn validate_percentage(field: &str, pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points (0 – 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "taxRateBps".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// ID Validators
// =============================================================================

/// Validates a document id.
///
/// Ids are generated as UUID v4 but imported data may carry other ids, so
/// only emptiness and path separators are rejected.
pub fn validate_document_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    if id.contains('/') {
        return Err(ValidationError::invalid_format(field, "must not contain '/'"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("LWN-2041").is_ok());
        assert!(validate_product_code("KHD_01/B").is_ok());
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
        assert!(validate_product_code("LWN 2041").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_amounts_are_capped() {
        let m = Money::from_units;
        assert!(validate_amount("price", m(0)).is_ok());
        assert!(validate_amount("price", m(MAX_AMOUNT)).is_ok());
        assert!(validate_amount("price", m(-1)).is_err());
        assert!(matches!(
            validate_amount("price", m(MAX_AMOUNT + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_positive("amount", m(i64::MAX)).is_err());
        assert!(validate_count("stock", MAX_STOCK).is_ok());
        assert!(validate_count("stock", MAX_STOCK + 1).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0300-1234567").is_ok());
        assert!(validate_phone("+92 (300) 1234567").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0300-CALL-ME").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@loom.pk").is_ok());
        assert!(validate_email("owner").is_err());
        assert!(validate_email("@loom.pk").is_err());
        assert!(validate_email("owner@loom").is_err());
    }

    #[test]
    fn test_validate_price_range() {
        let m = Money::from_units;
        assert!(validate_price_range(m(100), m(100), m(100)).is_ok());
        assert!(validate_price_range(m(200), m(150), m(100)).is_err());
        assert!(validate_price_range(m(100), m(250), m(200)).is_err());
        assert!(validate_price_range(m(-1), m(0), m(10)).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("commissionRate", 2.5).is_ok());
        assert!(validate_percentage("commissionRate", 100.0).is_ok());
        assert!(validate_percentage("commissionRate", -0.1).is_err());
        assert!(validate_percentage("commissionRate", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_document_id() {
        assert!(validate_document_id("id", "0b6f3c1e").is_ok());
        assert!(validate_document_id("id", "").is_err());
        assert!(validate_document_id("id", "a/b").is_err());
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+92 (300) 123-4567"), "923001234567");
    }
}
