//! Error types for the Accrual Allocation Engine.
//!
//! The calculation pipeline itself never fails: degraded inputs are coerced to
//! defaults and reported as warnings. These errors cover the surrounding
//! concerns: configuration loading, reporting windows and data sources.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Accrual Allocation Engine.
///
/// # Example
///
/// ```
/// use accrual_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// No exchange rate set is effective on the requested date.
    #[error("No exchange rates effective on {date}")]
    RatesNotFound {
        /// The date for which rates were requested.
        date: NaiveDate,
    },

    /// A reporting window whose start falls after its end.
    #[error("Invalid reporting window: start {start} is after end {end}")]
    InvalidReportingWindow {
        /// The window start.
        start: NaiveDate,
        /// The window end.
        end: NaiveDate,
    },

    /// A data source could not supply the requested records.
    #[error("Data source '{source_name}' failed: {message}")]
    SourceError {
        /// The name of the failing source.
        source_name: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "default_hours_per_day".to_string(),
            message: "must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value 'default_hours_per_day': must be greater than zero"
        );
    }

    #[test]
    fn test_rates_not_found_displays_date() {
        let error = EngineError::RatesNotFound {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(error.to_string(), "No exchange rates effective on 2020-01-01");
    }

    #[test]
    fn test_invalid_reporting_window_displays_bounds() {
        let error = EngineError::InvalidReportingWindow {
            start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid reporting window: start 2024-05-01 is after end 2024-04-01"
        );
    }

    #[test]
    fn test_source_error_displays_name_and_message() {
        let error = EngineError::SourceError {
            source_name: "time_logs".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Data source 'time_logs' failed: connection reset"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_rates_not_found() -> EngineResult<()> {
            Err(EngineError::RatesNotFound {
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_rates_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
