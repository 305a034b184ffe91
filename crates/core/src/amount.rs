//! 18-decimal fixed-point amounts.
//!
//! Every token amount, interest rate, price and leverage the protocol
//! accepts is a `uint256` scaled by [`WAD`]. These helpers convert between
//! that integer form and decimal text (`"1.5"` <-> `1_500_000_000_000_000_000`)
//! without going through floating point.

use alloy::primitives::{uint, U256};

use crate::error::CoreError;
use crate::types::Amount;

/// Number of fractional digits in every scaled amount.
pub const DECIMALS: usize = 18;

/// `10^18`, the fixed-point denominator.
pub const WAD: Amount = uint!(1000000000000000000_U256);

/// `whole` tokens, scaled.
pub fn wad(whole: u64) -> Amount {
    U256::from(whole) * WAD
}

/// Parse a decimal string into a scaled amount.
///
/// Accepts an optional fractional part of at most [`DECIMALS`] digits.
/// `"2"` -> `2 * WAD`, `"0.25"` -> `WAD / 4`.
pub fn parse_units(text: &str) -> Result<Amount, CoreError> {
    let invalid = || CoreError::InvalidAmount(text.to_string());
    let trimmed = text.trim();

    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > DECIMALS {
        return Err(invalid());
    }

    let overflow = || CoreError::Overflow("amount exceeds 256 bits");
    let whole_value = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };
    let frac_value = if frac.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac:0<width$}", width = DECIMALS);
        U256::from_str_radix(&padded, 10).map_err(|_| invalid())?
    };

    whole_value
        .checked_mul(WAD)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

/// Render a scaled amount as decimal text, trimming trailing zeros.
pub fn format_units(value: Amount) -> String {
    let whole = value / WAD;
    let frac = value % WAD;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Sum amounts, failing instead of wrapping.
pub fn checked_sum<I>(values: I) -> Result<Amount, CoreError>
where
    I: IntoIterator<Item = Amount>,
{
    values
        .into_iter()
        .try_fold(U256::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(CoreError::Overflow("sum of amounts exceeds 256 bits"))
}

/// Serde adapter storing an [`Amount`] as a decimal token-unit string.
///
/// Used by the address book so vesting tables read as `"100000"` rather
/// than `100000000000000000000000`.
pub mod units {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_units, parse_units};
    use crate::types::Amount;

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_units(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_units(&text).map_err(serde::de::Error::custom)
    }
}
