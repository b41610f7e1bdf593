//! Currency and exchange rate models.
//!
//! Every monetary output of the engine is expressed in a single reporting
//! currency. [`ExchangeRates`] carries the conversion factors into that
//! currency and is always injected, never read from a constant.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency an amount may be quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee.
    #[serde(alias = "inr")]
    Inr,
    /// United States dollar.
    #[serde(alias = "usd")]
    Usd,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Currency; 2] = [Currency::Inr, Currency::Usd];

    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    /// Parses a currency code, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("unsupported currency '{}'", other)),
        }
    }
}

/// Conversion factors into the reporting currency.
///
/// A rate is the number of reporting-currency units one unit of the
/// source currency is worth. The reporting currency itself always
/// converts at 1, whatever the table says.
///
/// # Example
///
/// ```
/// use accrual_engine::models::{Currency, ExchangeRates};
/// use rust_decimal::Decimal;
///
/// let rates = ExchangeRates::new(Currency::Inr).with_rate(Currency::Usd, Decimal::from(84));
/// assert_eq!(rates.to_reporting(Decimal::from(10), Currency::Usd), Some(Decimal::from(840)));
/// assert_eq!(rates.to_reporting(Decimal::from(10), Currency::Inr), Some(Decimal::from(10)));
/// assert_eq!(rates.to_reporting(Decimal::MAX, Currency::Usd), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// The currency all outputs are expressed in.
    pub reporting_currency: Currency,
    /// Reporting-currency units per unit of each listed currency.
    pub rates: HashMap<Currency, Decimal>,
}

impl ExchangeRates {
    /// Creates a rate table with no foreign rates.
    pub fn new(reporting_currency: Currency) -> Self {
        Self {
            reporting_currency,
            rates: HashMap::new(),
        }
    }

    /// Adds or replaces the rate for a currency.
    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    /// Returns the factor converting `currency` into the reporting currency.
    ///
    /// Returns `None` for a foreign currency with no configured rate.
    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        if currency == self.reporting_currency {
            return Some(Decimal::ONE);
        }
        self.rates.get(&currency).copied()
    }

    /// Converts an amount into the reporting currency.
    ///
    /// A currency without a configured rate converts at 1. Configuration
    /// loading rejects such tables, so this only happens for hand-built
    /// rate sets. Returns `None` when the converted amount overflows.
    pub fn to_reporting(&self, amount: Decimal, currency: Currency) -> Option<Decimal> {
        amount.checked_mul(self.rate(currency).unwrap_or(Decimal::ONE))
    }
}

impl Default for ExchangeRates {
    /// INR reporting with USD at 84.
    fn default() -> Self {
        Self::new(Currency::Inr).with_rate(Currency::Usd, Decimal::from(84))
    }
}
