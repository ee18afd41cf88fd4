//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger data for terminal display,
//! including listings, trees and progress bars.

pub mod category;
pub mod goal;
pub mod report;
pub mod transaction;

pub use category::format_category_tree;
pub use goal::{format_allocation_plan, format_confirm_outcome, format_goal_details, format_goal_list};
pub use transaction::{format_transaction_details, format_transaction_list};
