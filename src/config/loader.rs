//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration and exchange rates from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{Currency, ExchangeRates};

use super::types::{EngineConfig, EngineSettings, RateConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml          # Reporting currency, hours per day, year basis
/// └── rates/
///     └── 2024-04-01.yaml  # Exchange rates effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use accrual_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
/// let settings = loader.settings_on(date).unwrap();
/// println!("Reporting in {}", settings.exchange_rates.reporting_currency);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    engine: EngineConfig,
    /// Sorted oldest first.
    rates: Vec<RateConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a required file is missing, contains invalid
    /// YAML, or holds values the engine cannot use.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine = Self::load_yaml::<EngineConfig>(&path.join("engine.yaml"))?;
        let rates = Self::load_rates(&path.join("rates"))?;

        let loader = Self::from_parts(engine, rates)?;
        info!(
            path = %path.display(),
            reporting_currency = %loader.engine.reporting_currency,
            rate_sets = loader.rates.len(),
            "Loaded engine configuration"
        );
        Ok(loader)
    }

    /// Builds a loader from already-parsed parts, validating them.
    pub fn from_parts(engine: EngineConfig, mut rates: Vec<RateConfig>) -> EngineResult<Self> {
        Self::validate_engine(&engine)?;
        for rate_config in &rates {
            Self::validate_rates(engine.reporting_currency, rate_config)?;
        }
        rates.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Ok(Self { engine, rates })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateConfig>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                debug!(path = %path.display(), "Loading rate file");
                rates.push(Self::load_yaml::<RateConfig>(&path)?);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    fn validate_engine(engine: &EngineConfig) -> EngineResult<()> {
        if engine.default_hours_per_day <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "default_hours_per_day".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !(1..=12).contains(&engine.fiscal_year_start_month) {
            return Err(EngineError::InvalidConfig {
                field: "fiscal_year_start_month".to_string(),
                message: format!("{} is not a month number", engine.fiscal_year_start_month),
            });
        }
        let days = &engine.actual_annual_working_days;
        for (field, value) in [
            ("actual_annual_working_days.all_days", days.all_days),
            ("actual_annual_working_days.weekdays_only", days.weekdays_only),
            ("actual_annual_working_days.saturday_working", days.saturday_working),
        ] {
            if value == 0 || value > 366 {
                return Err(EngineError::InvalidConfig {
                    field: field.to_string(),
                    message: format!("{} is outside 1..=366", value),
                });
            }
        }
        Ok(())
    }

    fn validate_rates(reporting: Currency, rate_config: &RateConfig) -> EngineResult<()> {
        for currency in Currency::ALL {
            if currency == reporting {
                continue;
            }
            match rate_config.rates.get(&currency) {
                Some(rate) if *rate > Decimal::ZERO => {}
                Some(rate) => {
                    return Err(EngineError::InvalidConfig {
                        field: format!("rates.{}", currency),
                        message: format!(
                            "rate {} effective {} must be greater than zero",
                            rate, rate_config.effective_date
                        ),
                    });
                }
                None => {
                    return Err(EngineError::InvalidConfig {
                        field: format!("rates.{}", currency),
                        message: format!(
                            "missing from rate set effective {}",
                            rate_config.effective_date
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the parsed `engine.yaml`.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns all rate sets, oldest first.
    pub fn rates(&self) -> &[RateConfig] {
        &self.rates
    }

    /// Gets the exchange rates effective on a date.
    ///
    /// Picks the most recent rate set whose effective date is on or before
    /// `date`.
    pub fn exchange_rates_on(&self, date: NaiveDate) -> EngineResult<ExchangeRates> {
        let rate_config = self
            .rates
            .iter()
            .rfind(|rc| rc.effective_date <= date)
            .ok_or(EngineError::RatesNotFound { date })?;

        Ok(rate_config.rates.iter().fold(
            ExchangeRates::new(self.engine.reporting_currency),
            |rates, (currency, rate)| rates.with_rate(*currency, *rate),
        ))
    }

    /// Builds the calculator settings effective on a date.
    pub fn settings_on(&self, date: NaiveDate) -> EngineResult<EngineSettings> {
        Ok(EngineSettings {
            exchange_rates: self.exchange_rates_on(date)?,
            default_hours_per_day: self.engine.default_hours_per_day,
            year_basis: self.engine.year_basis,
            fiscal_year_start_month: self.engine.fiscal_year_start_month,
            annual_working_days: self.engine.actual_annual_working_days,
        })
    }
}
