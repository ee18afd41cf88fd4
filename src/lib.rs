//! Budget Master - household budget tracking for two people
//!
//! This library provides the core of the Budget Master application: a ledger
//! of income and expenses for Jeff and Vanessa, a history of net worth
//! snapshots, and savings goals funded month by month from each month's
//! surplus.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, goals, net worth, categories)
//! - `storage`: JSON file storage layer and ledger queries
//! - `services`: Business logic, including the aggregation and allocation engines
//! - `reports`: Terminal, text and CSV reports
//! - `audit`: Audit logging system
//! - `cli`: Command handlers for the `budget` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_master::context::AppContext;
//! use budget_master::models::Month;
//! use budget_master::services::AggregationService;
//!
//! let ctx = AppContext::load(None)?;
//! let march = Month::new(2025, 3).unwrap();
//! let summary = AggregationService::new(&ctx.storage).monthly_summary(march)?;
//! println!("Saved {} ({:.0}%)", summary.net_savings, summary.savings_rate * 100.0);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
