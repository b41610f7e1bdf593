//! Configuration loading and management for the Accrual Allocation Engine.
//!
//! This module loads the engine settings and effective-dated exchange rates
//! from YAML files, and defines the [`EngineSettings`] value passed into
//! every calculation.
//!
//! # Example
//!
//! ```no_run
//! use accrual_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Reporting currency: {}", config.engine().reporting_currency);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AnnualWorkingDays, EngineConfig, EngineSettings, RateConfig, YearBasis};
