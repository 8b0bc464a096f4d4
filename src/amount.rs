//! Amount Parsing
//!
//! Bet amounts travel as decimal strings because the chains involved use
//! different decimal counts (SOL=9, ETH=18, ZEC=8, USDC=6). Parsing goes
//! straight from the string to integer base units; floating point is never
//! involved anywhere in the amount path.

use thiserror::Error;

/// Fixed-point scale used when aggregating amounts across chains.
pub const NORMALIZED_DECIMALS: u32 = 18;

/// Reasons a decimal amount string is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount contains invalid characters")]
    Malformed,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount has more than {0} fractional digits")]
    TooPrecise(u32),
    #[error("amount exceeds the representable range")]
    Overflow,
}

/// Parses a decimal string into integer base units for a chain with the
/// given number of decimal places.
///
/// Fractional digits beyond the chain's precision are rejected unless they
/// are all zeros, so a value can never be silently truncated.
///
/// # Arguments
///
/// * `amount` - Decimal string, e.g. "0.01" or "1500"
/// * `decimals` - Number of decimal places the chain uses
///
/// # Returns
///
/// * `Ok(u128)` - Amount in base units
/// * `Err(AmountError)` - Empty, malformed, non-positive, too precise, or out of range
pub fn parse_decimal(amount: &str, decimals: u32) -> Result<u128, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    // Signs are never valid in a stake; negative amounts fail here rather
    // than deeper in the pipeline.
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(AmountError::Malformed);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Malformed);
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::Malformed);
    }

    let precision = decimals as usize;
    if frac_part.len() > precision && frac_part[precision..].chars().any(|c| c != '0') {
        return Err(AmountError::TooPrecise(decimals));
    }

    let scale = 10u128.checked_pow(decimals).ok_or(AmountError::Overflow)?;
    let int_units = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse::<u128>()
            .map_err(|_| AmountError::Overflow)?
            .checked_mul(scale)
            .ok_or(AmountError::Overflow)?
    };

    let frac_digits: String = frac_part.chars().take(precision).collect();
    let frac_units = if frac_digits.is_empty() {
        0
    } else {
        let parsed = frac_digits.parse::<u128>().map_err(|_| AmountError::Overflow)?;
        parsed * 10u128.pow(decimals - frac_digits.len() as u32)
    };

    let units = int_units.checked_add(frac_units).ok_or(AmountError::Overflow)?;
    if units == 0 {
        return Err(AmountError::NotPositive);
    }
    Ok(units)
}

/// Parses a decimal string into 18-decimal fixed point, the scale used for
/// cross-chain volume aggregation.
pub fn normalize(amount: &str) -> Result<u128, AmountError> {
    parse_decimal(amount, NORMALIZED_DECIMALS)
}
