//! Configuration types for accrual calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the
//! [`EngineSettings`] value the calculator is driven by.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Currency, ExchangeRates, WorkingDaysPolicy};

/// How the "year" of a yearly figure is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBasis {
    /// January 1 to December 31.
    #[default]
    Calendar,
    /// Twelve months starting on the first of the fiscal start month.
    Fiscal,
}

/// Assumed working days per year for hourly-equivalent rates in actual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualWorkingDays {
    /// Days per year under [`WorkingDaysPolicy::AllDays`].
    pub all_days: u32,
    /// Days per year under [`WorkingDaysPolicy::WeekdaysOnly`].
    pub weekdays_only: u32,
    /// Days per year under [`WorkingDaysPolicy::SaturdayWorking`].
    pub saturday_working: u32,
}

impl AnnualWorkingDays {
    /// Returns the assumption for a policy.
    pub fn for_policy(&self, policy: WorkingDaysPolicy) -> u32 {
        match policy {
            WorkingDaysPolicy::AllDays => self.all_days,
            WorkingDaysPolicy::WeekdaysOnly => self.weekdays_only,
            WorkingDaysPolicy::SaturdayWorking => self.saturday_working,
        }
    }
}

impl Default for AnnualWorkingDays {
    fn default() -> Self {
        Self {
            all_days: 365,
            weekdays_only: 260,
            saturday_working: 312,
        }
    }
}

/// Contents of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// The currency every output is expressed in.
    pub reporting_currency: Currency,
    /// Hours per day used when an assignment does not specify one.
    pub default_hours_per_day: Decimal,
    /// Delimitation of the yearly reference period.
    #[serde(default)]
    pub year_basis: YearBasis,
    /// First month of the fiscal year (1-12).
    #[serde(default = "default_fiscal_year_start_month")]
    pub fiscal_year_start_month: u32,
    /// Actual-mode annual working-day assumptions.
    #[serde(default)]
    pub actual_annual_working_days: AnnualWorkingDays,
}

fn default_fiscal_year_start_month() -> u32 {
    4
}

/// Exchange rates effective from a date, from one file in `rates/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    /// The first date these rates apply to.
    pub effective_date: NaiveDate,
    /// Reporting-currency units per unit of each currency.
    pub rates: HashMap<Currency, Decimal>,
}

/// Everything the calculator needs besides the assignment itself.
///
/// Settings are plain values passed into every calculation, so results
/// depend only on inputs. [`EngineSettings::default`] gives INR reporting
/// with USD at 84, 8 hours per day, a calendar year basis, an April fiscal
/// start and 365/260/312 annual working days.
///
/// # Example
///
/// ```
/// use accrual_engine::config::{EngineSettings, YearBasis};
/// use accrual_engine::models::Currency;
/// use rust_decimal::Decimal;
///
/// let settings = EngineSettings::default();
/// assert_eq!(settings.exchange_rates.reporting_currency, Currency::Inr);
/// assert_eq!(settings.default_hours_per_day, Decimal::from(8));
/// assert_eq!(settings.year_basis, YearBasis::Calendar);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Conversion into the reporting currency.
    pub exchange_rates: ExchangeRates,
    /// Hours per day used when an assignment does not specify one.
    pub default_hours_per_day: Decimal,
    /// Delimitation of the yearly reference period.
    pub year_basis: YearBasis,
    /// First month of the fiscal year (1-12).
    pub fiscal_year_start_month: u32,
    /// Actual-mode annual working-day assumptions.
    pub annual_working_days: AnnualWorkingDays,
}

impl EngineSettings {
    /// Returns a copy with different exchange rates.
    pub fn with_exchange_rates(mut self, exchange_rates: ExchangeRates) -> Self {
        self.exchange_rates = exchange_rates;
        self
    }

    /// Returns a copy with a different year basis.
    pub fn with_year_basis(mut self, year_basis: YearBasis) -> Self {
        self.year_basis = year_basis;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            exchange_rates: ExchangeRates::default(),
            default_hours_per_day: Decimal::from(8),
            year_basis: YearBasis::Calendar,
            fiscal_year_start_month: default_fiscal_year_start_month(),
            annual_working_days: AnnualWorkingDays::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_working_days_for_policy() {
        let days = AnnualWorkingDays::default();
        assert_eq!(days.for_policy(WorkingDaysPolicy::AllDays), 365);
        assert_eq!(days.for_policy(WorkingDaysPolicy::WeekdaysOnly), 260);
        assert_eq!(days.for_policy(WorkingDaysPolicy::SaturdayWorking), 312);
    }

    #[test]
    fn test_engine_config_defaults_optional_fields() {
        let yaml = "reporting_currency: INR\ndefault_hours_per_day: \"8\"\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.reporting_currency, Currency::Inr);
        assert_eq!(config.year_basis, YearBasis::Calendar);
        assert_eq!(config.fiscal_year_start_month, 4);
        assert_eq!(config.actual_annual_working_days, AnnualWorkingDays::default());
    }

    #[test]
    fn test_rate_config_parses_currency_keys() {
        let yaml = "effective_date: 2024-04-01\nrates:\n  USD: \"84\"\n";
        let config: RateConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.effective_date,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert_eq!(config.rates.get(&Currency::Usd), Some(&Decimal::from(84)));
    }

    #[test]
    fn test_settings_builders() {
        let settings = EngineSettings::default()
            .with_year_basis(YearBasis::Fiscal)
            .with_exchange_rates(ExchangeRates::new(Currency::Usd));

        assert_eq!(settings.year_basis, YearBasis::Fiscal);
        assert_eq!(settings.exchange_rates.reporting_currency, Currency::Usd);
    }
}
