//! Fixed-point amount scaling
//!
//! Amounts are entered as decimal strings and stored on chain as `i64`
//! multiples of 10^-8. Scaling is exact: inputs that would need rounding are
//! rejected rather than truncated.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Number of implied decimal places in an on-chain amount
pub const DECIMALS: u32 = 8;

/// Largest total supply (and mint amount) the chain accepts, in scaled units
pub const MAX_SUPPLY: i64 = 9_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid decimal amount: {0}")]
    Invalid(String),

    #[error("negative amount not allowed: {0}")]
    Negative(String),

    #[error("amount {0} has more than 8 decimal places")]
    TooManyDecimals(String),

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("amount {0} does not fit in a signed 64-bit integer once scaled")]
    Overflow(String),
}

/// Scale a decimal string by 10^8 into the on-chain integer representation
///
/// Zero is accepted; use [`scale_positive_amount`] where the chain requires a
/// strictly positive value.
pub fn scale_amount(input: &str) -> Result<i64, AmountError> {
    let trimmed = input.trim();
    let value =
        Decimal::from_str(trimmed).map_err(|_| AmountError::Invalid(input.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(input.to_string()));
    }

    // Trailing zeros carry no precision.
    let value = value.normalize();
    if value.scale() > DECIMALS {
        return Err(AmountError::TooManyDecimals(input.to_string()));
    }

    value
        .checked_mul(Decimal::from(10i64.pow(DECIMALS)))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| AmountError::Overflow(input.to_string()))
}

/// Scale a decimal string, rejecting zero
pub fn scale_positive_amount(input: &str) -> Result<i64, AmountError> {
    match scale_amount(input)? {
        0 => Err(AmountError::NotPositive),
        scaled => Ok(scaled),
    }
}

/// Render a scaled amount back as a decimal string without trailing zeros
pub fn unscale_amount(scaled: i64) -> String {
    Decimal::new(scaled, DECIMALS).normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_exact() {
        assert_eq!(scale_amount("1.23456789").unwrap(), 123_456_789);
        assert_eq!(scale_amount("1").unwrap(), 100_000_000);
        assert_eq!(scale_amount("0.00000001").unwrap(), 1);
        assert_eq!(scale_amount(" 2.5 ").unwrap(), 250_000_000);
        assert_eq!(scale_amount("0").unwrap(), 0);
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_decimals() {
        assert_eq!(scale_amount("1.1000000000").unwrap(), 110_000_000);
    }

    #[test]
    fn test_scale_rejects_bad_input() {
        assert_eq!(
            scale_amount("abc"),
            Err(AmountError::Invalid("abc".to_string()))
        );
        assert_eq!(
            scale_amount("-1"),
            Err(AmountError::Negative("-1".to_string()))
        );
        assert_eq!(
            scale_amount("0.000000001"),
            Err(AmountError::TooManyDecimals("0.000000001".to_string()))
        );
        assert!(matches!(
            scale_amount("100000000000"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert_eq!(scale_positive_amount("0"), Err(AmountError::NotPositive));
        assert_eq!(scale_positive_amount("0.0"), Err(AmountError::NotPositive));
        assert_eq!(scale_positive_amount("3").unwrap(), 300_000_000);
    }

    #[test]
    fn test_max_supply_boundary() {
        assert_eq!(scale_amount("90000000000").unwrap(), MAX_SUPPLY);
        assert!(scale_amount("90000000000.00000001").unwrap() > MAX_SUPPLY);
    }

    #[test]
    fn test_unscale() {
        assert_eq!(unscale_amount(123_456_789), "1.23456789");
        assert_eq!(unscale_amount(100_000_000), "1");
        assert_eq!(unscale_amount(0), "0");
    }

    proptest! {
        #[test]
        fn prop_scaling_is_lossless(whole in 0i64..1_000_000_000, frac in 0u32..100_000_000) {
            let input = format!("{whole}.{frac:08}");
            let scaled = scale_amount(&input).unwrap();
            prop_assert_eq!(scaled, whole * 100_000_000 + i64::from(frac));
        }
    }
}
