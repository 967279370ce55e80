//! Price conversion between stored amounts and payment provider units
//!
//! Course prices are stored as integers. Zero-decimal currencies (XOF) are
//! stored in whole units; every other currency is stored in cents.

use crate::error::DomainError;

/// Currencies whose stored amount already is the provider amount
pub const ZERO_DECIMAL_CURRENCIES: &[&str] = &["XOF"];

/// Check whether a currency has no minor unit
pub fn is_zero_decimal(currency: &str) -> bool {
    ZERO_DECIMAL_CURRENCIES.contains(&currency)
}

/// Convert a stored amount into the units the payment provider expects
pub fn to_provider_units(amount: i64, currency: &str) -> f64 {
    if is_zero_decimal(currency) {
        amount as f64
    } else {
        amount as f64 / 100.0
    }
}

/// Validate and normalize an ISO-4217 style currency code
pub fn normalize_currency(currency: &str) -> Result<String, DomainError> {
    let code = currency.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(DomainError::InvalidCurrency(currency.to_string()))
    }
}
