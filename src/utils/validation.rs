//! Validation utilities

use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is a positive monetary value at scale 2.
///
/// Rejects zero, negatives, and anything finer than two decimal places;
/// all of those are `InvalidAmount` before any mutation is attempted.
pub fn validate_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        return Err(LedgerError::InvalidAmount);
    }

    if amount.normalized().fractional_digit_count() > 2 {
        return Err(LedgerError::InvalidAmount);
    }

    Ok(())
}

/// Validate that an account display name is usable.
///
/// The name stays an opaque label otherwise; only emptiness and an upper
/// length bound are checked at provisioning time.
pub fn validate_display_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "account display name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "account display name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}
