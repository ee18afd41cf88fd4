//! Storage layer for Budget Master
//!
//! Each table is a JSON file written atomically and held in memory behind an
//! `RwLock`. [`Storage`] coordinates the repositories, exposes the ledger
//! queries the engines run against, and writes the audit log.

pub mod allocations;
pub mod budget_targets;
pub mod categories;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod net_worth;
pub mod periods;
pub mod transactions;

pub use allocations::AllocationRepository;
pub use budget_targets::BudgetTargetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use net_worth::NetWorthRepository;
pub use periods::PeriodRepository;
pub use transactions::{TransactionFilter, TransactionRepository};

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationQuery, DateRange, GoalId, GoalStatus, Money, Month, NetWorthEntry,
    SavingsAllocation, SavingsGoal, Transaction,
};

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> BudgetResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> BudgetResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// First id to hand out after loading a table
pub(crate) fn next_id_after(stored: u64, ids: impl Iterator<Item = u64>) -> u64 {
    let after_max = ids.max().map_or(1, |max| max + 1);
    stored.max(after_max).max(1)
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    audit: AuditLogger,
    pub transactions: TransactionRepository,
    pub net_worth: NetWorthRepository,
    pub goals: GoalRepository,
    pub allocations: AllocationRepository,
    pub categories: CategoryRepository,
    pub targets: BudgetTargetRepository,
    pub periods: PeriodRepository,
}

impl Storage {
    /// Create a Storage instance without loading any data
    pub fn new(paths: BudgetPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            net_worth: NetWorthRepository::new(paths.net_worth_file()),
            goals: GoalRepository::new(paths.goals_file()),
            allocations: AllocationRepository::new(paths.allocations_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            targets: BudgetTargetRepository::new(paths.targets_file()),
            periods: PeriodRepository::new(paths.periods_file()),
            paths,
        })
    }

    /// Create a Storage instance and load every table from disk
    pub fn open(paths: BudgetPaths) -> BudgetResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> BudgetResult<()> {
        self.transactions.load()?;
        self.net_worth.load()?;
        self.goals.load()?;
        self.allocations.load()?;
        self.categories.load()?;
        self.targets.load()?;
        self.periods.load()?;
        debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    pub fn save_all(&self) -> BudgetResult<()> {
        self.transactions.save()?;
        self.net_worth.save()?;
        self.goals.save()?;
        self.allocations.save()?;
        self.categories.save()?;
        self.targets.save()?;
        self.periods.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    // Ledger queries

    /// Transactions dated within `range` that match `filter`
    pub fn list_transactions(
        &self,
        range: &DateRange,
        filter: &TransactionFilter,
    ) -> BudgetResult<Vec<Transaction>> {
        self.transactions.list(range, filter)
    }

    /// The latest snapshot of each asset at or before `as_of`
    pub fn list_net_worth_entries(&self, as_of: NaiveDate) -> BudgetResult<Vec<NetWorthEntry>> {
        self.net_worth.latest_as_of(as_of)
    }

    /// Goals in allocation order, optionally limited to one status
    pub fn list_goals(&self, status: Option<GoalStatus>) -> BudgetResult<Vec<SavingsGoal>> {
        self.goals.list(status)
    }

    pub fn list_allocations(&self, query: AllocationQuery) -> BudgetResult<Vec<SavingsAllocation>> {
        self.allocations.list(query)
    }

    /// Create or update the single allocation row for (goal, month)
    ///
    /// The change is saved and audit-logged. An unchanged amount writes nothing.
    pub fn upsert_allocation(
        &self,
        goal_id: GoalId,
        month: Month,
        amount: Money,
    ) -> BudgetResult<SavingsAllocation> {
        let goal = self
            .goals
            .get(goal_id)?
            .ok_or_else(|| BudgetError::goal_not_found(goal_id.to_string()))?;

        SavingsAllocation::new(goal_id, month, amount)
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let (stored, before) = self.allocations.upsert(goal_id, month, amount)?;
        let label = Some(format!("{} {}", goal.name, month));

        match before {
            Some(before) if before.amount == stored.amount => return Ok(stored),
            Some(before) => {
                self.allocations.save()?;
                self.log_update(
                    EntityType::SavingsAllocation,
                    stored.id.to_string(),
                    label,
                    &before,
                    &stored,
                    Some(format!("amount: {} -> {}", before.amount, stored.amount)),
                )?;
            }
            None => {
                self.allocations.save()?;
                self.log_create(
                    EntityType::SavingsAllocation,
                    stored.id.to_string(),
                    label,
                    &stored,
                )?;
            }
        }

        Ok(stored)
    }

    /// Subcategories of a registered category, or None if it is unknown
    pub fn subcategories_of(&self, category: &str) -> BudgetResult<Option<Vec<String>>> {
        self.categories.subcategories_of(category)
    }

    // Audit logging

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> BudgetResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_next_id_after() {
        assert_eq!(next_id_after(0, std::iter::empty()), 1);
        assert_eq!(next_id_after(0, [3, 7].into_iter()), 8);
        assert_eq!(next_id_after(12, [3, 7].into_iter()), 12);
    }

    #[test]
    fn test_upsert_allocation_audits_changes_only() {
        let (_temp, storage) = create_test_storage();
        let goal = storage
            .goals
            .insert(SavingsGoal::new("Car", Money::from_dollars(500), 1))
            .unwrap();
        let march = Month::new(2025, 3).unwrap();

        storage
            .upsert_allocation(goal.id, march, Money::from_dollars(100))
            .unwrap();
        storage
            .upsert_allocation(goal.id, march, Money::from_dollars(100))
            .unwrap();
        storage
            .upsert_allocation(goal.id, march, Money::from_dollars(150))
            .unwrap();

        let log = storage.audit().read_all().unwrap();
        let ops: Vec<_> = log.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update]);
        assert_eq!(
            storage.list_allocations(AllocationQuery::Goal(goal.id)).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_upsert_allocation_unknown_goal() {
        let (_temp, storage) = create_test_storage();
        let result = storage.upsert_allocation(
            GoalId::new(99),
            Month::new(2025, 3).unwrap(),
            Money::from_dollars(1),
        );
        assert!(result.unwrap_err().is_not_found());
    }
}
