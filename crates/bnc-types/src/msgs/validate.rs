//! Field-level validation helpers shared by the message constructors

use bnc_math::{scale_positive_amount, unscale_amount, MAX_SUPPLY};

use crate::error::ValidationError;

/// Longest token name the chain accepts
pub const MAX_TOKEN_NAME_LEN: usize = 32;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(
            field,
            format!("must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}

/// Positive and no larger than the maximum token supply
pub fn require_max_supply(field: &str, value: i64) -> Result<(), ValidationError> {
    require_positive(field, value)?;
    if value > MAX_SUPPLY {
        return Err(ValidationError::new(
            field,
            format!(
                "must not exceed {}, got {}",
                unscale_amount(MAX_SUPPLY),
                unscale_amount(value)
            ),
        ));
    }
    Ok(())
}

/// Scale a decimal string into a positive on-chain amount
pub fn scale_positive(field: &str, value: &str) -> Result<i64, ValidationError> {
    scale_positive_amount(value).map_err(|e| ValidationError::new(field, e.to_string()))
}

/// A bare token symbol: 3 to 8 ASCII letters or digits
pub fn validate_symbol(field: &str, symbol: &str) -> Result<(), ValidationError> {
    let valid = (3..=8).contains(&symbol.len())
        && symbol.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(ValidationError::new(
            field,
            format!("{symbol:?} must be 3 to 8 alphanumeric characters"),
        ));
    }
    Ok(())
}

/// An issued token symbol: a bare symbol optionally followed by the
/// chain-assigned `-XXX` suffix
pub fn validate_suffixed_symbol(field: &str, symbol: &str) -> Result<(), ValidationError> {
    match symbol.split_once('-') {
        None => validate_symbol(field, symbol),
        Some((base, suffix)) => {
            validate_symbol(field, base)?;
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ValidationError::new(
                    field,
                    format!("{symbol:?} has an invalid suffix"),
                ));
            }
            Ok(())
        }
    }
}

pub fn validate_token_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_TOKEN_NAME_LEN {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_TOKEN_NAME_LEN} characters"),
        ));
    }
    Ok(())
}
