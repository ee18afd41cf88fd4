//! Core data models for Budget Master
//!
//! This module contains the data structures of the household ledger:
//! transactions, net worth snapshots, savings goals and allocations,
//! categories and monthly budget targets.

pub mod allocation;
pub mod budget_target;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod net_worth;
pub mod period;
pub mod person;
pub mod transaction;

pub use allocation::{AllocationQuery, SavingsAllocation};
pub use budget_target::BudgetTarget;
pub use category::{Category, DEFAULT_CATEGORIES, INCOME_CATEGORY, UNCATEGORIZED};
pub use goal::{GoalProgress, GoalStatus, SavingsGoal, DEFAULT_PRIORITY};
pub use ids::{AllocationId, BudgetTargetId, GoalId, NetWorthEntryId, TransactionId};
pub use money::Money;
pub use net_worth::{AssetKey, AssetType, NetWorthEntry};
pub use period::{DateRange, Month};
pub use person::{Owner, Person};
pub use transaction::{Transaction, TransactionKind};
