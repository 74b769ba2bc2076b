use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::error::LedgerError;

/// Parse a user-supplied money amount. Negative values are rejected; zero is allowed.
pub fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    let cleaned = s.trim().replace(['$', ','], "");
    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| LedgerError::InvalidAmount(s.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::NegativeAmount(amount));
    }
    Ok(amount.normalize())
}

/// Read back an amount column. Text that does not parse is logged and counts as zero.
pub fn stored_amount(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|_| {
        warn!(amount = s, "unparseable amount in database, counting it as zero");
        Decimal::ZERO
    })
}

/// Exact sum that fails instead of overflowing `Decimal`.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, LedgerError> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(a).ok_or(LedgerError::AmountOverflow)
    })
}
