//! Currency normalization.
//!
//! Amounts are converted into the reporting currency before any rate math,
//! so every downstream figure is in one currency.

use rust_decimal::Decimal;

use crate::models::{AuditStep, AuditWarning, ExchangeRates, Leg, RateTerms};

use super::allocation::overflow_warning;

/// Warning code raised when a currency has no rate in the table.
pub const MISSING_EXCHANGE_RATE: &str = "MISSING_EXCHANGE_RATE";

/// The result of converting one leg's amount, including the audit step.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizationResult {
    /// The amount in the reporting currency.
    pub amount: Decimal,
    /// The audit step recording this conversion.
    pub audit_step: AuditStep,
    /// Missing-rate or overflow warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Converts a leg's quoted amount into the reporting currency.
///
/// A currency with no configured rate converts at 1 and raises
/// `MISSING_EXCHANGE_RATE`. An amount that overflows on conversion becomes 0
/// and raises `AMOUNT_OVERFLOW`.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::normalize_currency;
/// use accrual_engine::models::{Currency, ExchangeRates, Leg, RatePeriod, RateTerms};
/// use rust_decimal::Decimal;
///
/// let terms = RateTerms {
///     amount: Decimal::from(1_000),
///     period: RatePeriod::Monthly,
///     currency: Currency::Usd,
/// };
/// let result = normalize_currency(&terms, Leg::Billing, &ExchangeRates::default(), 1);
/// assert_eq!(result.amount, Decimal::from(84_000));
/// ```
pub fn normalize_currency(
    terms: &RateTerms,
    leg: Leg,
    rates: &ExchangeRates,
    step_number: u32,
) -> CurrencyNormalizationResult {
    let mut warnings = Vec::new();

    let factor = match rates.rate(terms.currency) {
        Some(factor) => factor,
        None => {
            warnings.push(AuditWarning::new(
                MISSING_EXCHANGE_RATE,
                format!(
                    "No {} rate into {}; {} amount converted at 1",
                    terms.currency,
                    rates.reporting_currency,
                    leg.label()
                ),
                "high",
            ));
            Decimal::ONE
        }
    };
    let amount = match rates.to_reporting(terms.amount, terms.currency) {
        Some(amount) => amount,
        None => {
            warnings.push(overflow_warning(leg, "amount in reporting currency"));
            Decimal::ZERO
        }
    };

    let reasoning = if terms.currency == rates.reporting_currency {
        format!(
            "{} amount {} already in reporting currency {}",
            leg.label(),
            terms.amount,
            rates.reporting_currency
        )
    } else {
        format!(
            "{} {} x {} = {} {}",
            terms.amount, terms.currency, factor, amount, rates.reporting_currency
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_currency_normalization", leg.label()),
        rule_name: "Currency Normalization".to_string(),
        input: serde_json::json!({
            "amount": terms.amount.to_string(),
            "currency": terms.currency.code(),
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "currency": rates.reporting_currency.code(),
            "rate": factor.to_string(),
        }),
        reasoning,
    };

    CurrencyNormalizationResult {
        amount,
        audit_step,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, RatePeriod};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn terms(amount: &str, currency: Currency) -> RateTerms {
        RateTerms {
            amount: dec(amount),
            period: RatePeriod::Yearly,
            currency,
        }
    }

    #[test]
    fn test_usd_is_multiplied_by_rate() {
        let result = normalize_currency(
            &terms("1500", Currency::Usd),
            Leg::Salary,
            &ExchangeRates::default(),
            3,
        );

        assert_eq!(result.amount, dec("126000"));
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.rule_id, "salary_currency_normalization");
        assert_eq!(result.audit_step.output["rate"].as_str().unwrap(), "84");
        assert!(result.audit_step.reasoning.contains("1500 USD x 84"));
    }

    #[test]
    fn test_inr_passes_through() {
        let result = normalize_currency(
            &terms("126000", Currency::Inr),
            Leg::Billing,
            &ExchangeRates::default(),
            1,
        );

        assert_eq!(result.amount, dec("126000"));
        assert_eq!(result.audit_step.output["rate"].as_str().unwrap(), "1");
        assert!(result.audit_step.reasoning.contains("already in reporting currency"));
    }

    #[test]
    fn test_injected_rate_replaces_default() {
        let rates = ExchangeRates::new(Currency::Inr).with_rate(Currency::Usd, dec("83.25"));
        let result = normalize_currency(&terms("100", Currency::Usd), Leg::Billing, &rates, 1);
        assert_eq!(result.amount, dec("8325"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_rate_converts_at_one_with_warning() {
        let rates = ExchangeRates::new(Currency::Inr);
        let result = normalize_currency(&terms("100", Currency::Usd), Leg::Billing, &rates, 1);

        assert_eq!(result.amount, dec("100"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, MISSING_EXCHANGE_RATE);
        assert_eq!(result.warnings[0].severity, "high");
    }

    #[test]
    fn test_overflowing_conversion_becomes_zero_with_warning() {
        let result = normalize_currency(
            &terms("1000000000000000000000000000", Currency::Usd),
            Leg::Billing,
            &ExchangeRates::default(),
            1,
        );

        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, "AMOUNT_OVERFLOW");
        assert_eq!(result.audit_step.output["amount"].as_str().unwrap(), "0");
    }
}
