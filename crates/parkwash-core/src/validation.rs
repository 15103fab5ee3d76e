//! # Validation Module
//!
//! Input validation utilities for ParkWash POS.
//!
//! Validation here covers business-rule input checks; NOT NULL and unique
//! constraints are re-enforced by the database schema.
//!
//! ## Usage
//! ```rust
//! use parkwash_core::validation::{normalize_plate, validate_quantity};
//!
//! // Plates are trimmed and uppercased before storage
//! assert_eq!(normalize_plate(" abc-123 ").unwrap(), "ABC-123");
//!
//! // Quantities are bounded
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_PLATE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Plate
// =============================================================================

/// Validates and normalizes a licence plate.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PLATE_LEN`] characters
/// - Only letters, digits and hyphens
///
/// ## Returns
/// The trimmed, uppercased plate. All lookups and the duplicate-active
/// invariant run against this normalized form.
pub fn normalize_plate(plate: &str) -> ValidationResult<String> {
    let plate = plate.trim();

    if plate.is_empty() {
        return Err(ValidationError::Required {
            field: "plate".to_string(),
        });
    }

    if plate.len() > MAX_PLATE_LEN {
        return Err(ValidationError::TooLong {
            field: "plate".to_string(),
            max: MAX_PLATE_LEN,
        });
    }

    if !plate.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "plate".to_string(),
            reason: "must contain only letters, digits, and hyphens".to_string(),
        });
    }

    Ok(plate.to_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or rate in cents.
///
/// Zero is allowed (complimentary services).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a fraction length in minutes.
///
/// A fraction of zero minutes would make the tariff arithmetic divide by
/// zero; the catalog rejects it here.
pub fn validate_fraction_minutes(minutes: i64) -> ValidationResult<()> {
    if minutes <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "fraction_minutes".to_string(),
        });
    }

    if minutes > 60 {
        return Err(ValidationError::OutOfRange {
            field: "fraction_minutes".to_string(),
            min: 1,
            max: 60,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("abc-123").unwrap(), "ABC-123");
        assert_eq!(normalize_plate("  xyz789  ").unwrap(), "XYZ789");

        assert!(normalize_plate("").is_err());
        assert!(normalize_plate("   ").is_err());
        assert!(normalize_plate("has space").is_err());
        assert!(normalize_plate("WAY-TOO-LONG-PLATE").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(8000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_fraction_minutes() {
        assert!(validate_fraction_minutes(15).is_ok());
        assert!(validate_fraction_minutes(60).is_ok());
        assert!(validate_fraction_minutes(0).is_err());
        assert!(validate_fraction_minutes(61).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
