//! Service layer for Budget Master
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, closed periods, audit logging and the aggregation and
//! allocation engines.

pub mod aggregation;
pub mod allocation;
pub mod budget_target;
pub mod category;
pub mod goal;
pub mod ledger;
pub mod net_worth;
pub mod period;

pub use aggregation::{AggregationService, GroupBy};
pub use allocation::{AllocationPlan, AllocationService};
pub use budget_target::BudgetTargetService;
pub use category::CategoryService;
pub use goal::{GoalService, GoalUpdate};
pub use ledger::{LedgerService, NewTransaction, TransactionUpdate};
pub use net_worth::NetWorthService;
pub use period::PeriodService;
