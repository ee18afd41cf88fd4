//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod allocate;
pub mod audit;
pub mod category;
pub mod goal;
pub mod net_worth;
pub mod period;
pub mod report;
pub mod target;
pub mod transaction;

pub use allocate::{handle_allocate_command, AllocateCommands};
pub use audit::{handle_audit_command, AuditArgs};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use net_worth::{handle_net_worth_command, NetWorthCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use report::{handle_report_command, ReportCommands};
pub use target::{handle_target_command, TargetCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;

pub(crate) fn parse_amount(s: &str) -> BudgetResult<Money> {
    Money::parse(s).map_err(|e| BudgetError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a YYYY-MM-DD date
pub(crate) fn parse_date(s: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", s.trim()))
    })
}

pub(crate) fn parse_date_or(s: Option<&str>, default: NaiveDate) -> BudgetResult<NaiveDate> {
    s.map_or(Ok(default), parse_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert!(parse_date("03/15/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date_or_default() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(parse_date_or(None, today).unwrap(), today);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("twelve").unwrap_err().is_validation());
    }
}
