//! Monetary amounts using decimal arithmetic.
//!
//! Shopify returns money as `{ amount: "19.90", currencyCode: "USD" }`. The
//! amount is kept as a [`Decimal`] so the scale the API sent is preserved
//! exactly (`"19.90"` stays `"19.90"`, it never becomes `19.9`).

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing [`Money`] or a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is not a decimal number.
    #[error("amount {0:?} is not a decimal number")]
    InvalidAmount(String),
    /// The amount is below zero.
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),
    /// The currency code is not three uppercase ASCII letters.
    #[error("currency code {0:?} is not a three-letter ISO 4217 code")]
    InvalidCurrencyCode(String),
}

/// ISO 4217 currency code (e.g., `USD`, `EUR`).
///
/// Any three uppercase ASCII letters are accepted so that new currencies
/// enabled on the shop do not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidCurrencyCode`] unless the input is exactly
    /// three uppercase ASCII letters.
    pub fn parse(code: &str) -> Result<Self, MoneyError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(MoneyError::InvalidCurrencyCode(code.to_owned()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Narrow display symbol for common currencies.
    #[must_use]
    pub fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" | "MXN" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" | "CNY" => Some("¥"),
            "DKK" | "SEK" | "NOK" => Some("kr"),
            _ => None,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A non-negative monetary amount with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    currency_code: CurrencyCode,
}

#[derive(Deserialize)]
struct RawMoney {
    amount: String,
    currency_code: String,
}

impl TryFrom<RawMoney> for Money {
    type Error = MoneyError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Self::parse(&raw.amount, &raw.currency_code)
    }
}

impl Money {
    /// Create money from an already-parsed amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NegativeAmount`] if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Parse money from the wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a plain non-negative decimal
    /// string or the currency code is not three uppercase letters.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, MoneyError> {
        let digits = amount.strip_prefix('-').unwrap_or(amount);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(MoneyError::InvalidAmount(amount.to_owned()));
        }
        let value =
            Decimal::from_str(amount).map_err(|_| MoneyError::InvalidAmount(amount.to_owned()))?;
        Self::new(value, CurrencyCode::parse(currency_code)?)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency code.
    #[must_use]
    pub const fn currency_code(&self) -> &CurrencyCode {
        &self.currency_code
    }

    /// Amount as sent on the wire (scale preserved).
    #[must_use]
    pub fn amount_string(&self) -> String {
        self.amount.to_string()
    }

    /// Format for display, rounded to two decimals (e.g., `"$19.90"`).
    ///
    /// Currencies without a known symbol are prefixed with their code. With
    /// `show_code`, the code is appended after symbol-formatted amounts.
    #[must_use]
    pub fn format(&self, show_code: bool) -> String {
        let mut rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);

        match self.currency_code.symbol() {
            Some(symbol) if show_code => format!("{symbol}{rounded} {}", self.currency_code),
            Some(symbol) => format!("{symbol}{rounded}"),
            None => format!("{} {rounded}", self.currency_code),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_scale() {
        let money = Money::parse("19.90", "USD").unwrap();
        assert_eq!(money.amount_string(), "19.90");
        assert_eq!(money.currency_code().as_str(), "USD");
    }

    #[test]
    fn test_parse_zero() {
        assert!(Money::parse("0.0", "EUR").is_ok());
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(
            Money::parse("-1.00", "USD"),
            Err(MoneyError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for amount in ["", "abc", "1,00", " 1.00", "1.0.0"] {
            assert!(
                matches!(
                    Money::parse(amount, "USD"),
                    Err(MoneyError::InvalidAmount(_))
                ),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_currency_code_validation() {
        assert!(CurrencyCode::parse("USD").is_ok());
        assert!(CurrencyCode::parse("usd").is_err());
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("USDT").is_err());
        assert!(CurrencyCode::parse("").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(Money::parse("19.9", "USD").unwrap().format(false), "$19.90");
        assert_eq!(
            Money::parse("5", "EUR").unwrap().format(true),
            "€5.00 EUR"
        );
        assert_eq!(
            Money::parse("12.345", "CHF").unwrap().format(false),
            "CHF 12.35"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let money = Money::parse("42.50", "GBP").unwrap();
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"amount": "42.50", "currency_code": "GBP"})
        );

        let parsed: Money = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, money);
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = serde_json::json!({"amount": "-3", "currency_code": "GBP"});
        assert!(serde_json::from_value::<Money>(bad).is_err());
    }
}
