//! Accrual Allocation Engine
//!
//! This crate converts project-employee assignments with billing and salary
//! terms into revenue, cost and profit figures, on either an accrual basis
//! (working days elapsed) or an actual basis (approved hours logged), and
//! spreads accrual figures into monthly buckets for reporting.
//!
//! The calculation core is synchronous and pure: exchange rates, year basis
//! and the "as of" date are all passed in, so identical inputs always give
//! identical results.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod sources;
