//! expense-tracker - personal finance tracking with period-based analytics
//!
//! Accounts, transactions, budget plans, bills and stock holdings, kept in a
//! local JSON store, with an aggregation engine that summarizes spending by category
//! over months, bi-weeks and weeks.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (accounts, transactions, categories, periods, ...)
//! - `storage`: JSON file storage layer
//! - `reports`: Pure aggregation and analytics over transaction sources
//! - `services`: Business logic layer
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `expense` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::reports::{aggregate, expense_composition};
//! use expense_tracker::models::DateRange;
//!
//! let range = DateRange::new(first, last)?;
//! let totals = aggregate(&transactions, &range)?;
//! let composition = expense_composition(&transactions, &range)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
