//! Savings allocation repository
//!
//! Keeps at most one allocation row per (goal, month).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::{AllocationId, AllocationQuery, GoalId, Money, Month, SavingsAllocation};

use super::file_io::{read_json, write_json_atomic};
use super::{next_id_after, read_guard, write_guard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AllocationData {
    #[serde(default)]
    next_id: u64,
    allocations: Vec<SavingsAllocation>,
}

#[derive(Debug, Default)]
struct AllocationTable {
    next_id: u64,
    rows: BTreeMap<AllocationId, SavingsAllocation>,
}

/// Repository for savings allocations
pub struct AllocationRepository {
    path: PathBuf,
    data: RwLock<AllocationTable>,
}

impl AllocationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(AllocationTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: AllocationData = read_json(&self.path)?;
        let mut table = write_guard(&self.data)?;

        table.next_id = next_id_after(
            file_data.next_id,
            file_data.allocations.iter().map(|a| a.id.value()),
        );
        table.rows = file_data
            .allocations
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let table = read_guard(&self.data)?;

        let mut allocations: Vec<_> = table.rows.values().cloned().collect();
        allocations.sort_by(|a, b| a.month.cmp(&b.month).then(a.goal_id.cmp(&b.goal_id)));

        write_json_atomic(
            &self.path,
            &AllocationData {
                next_id: table.next_id,
                allocations,
            },
        )
    }

    /// The allocation for a goal in a month, if any
    pub fn get_for(&self, goal_id: GoalId, month: Month) -> BudgetResult<Option<SavingsAllocation>> {
        Ok(read_guard(&self.data)?
            .rows
            .values()
            .find(|a| a.goal_id == goal_id && a.month == month)
            .cloned())
    }

    /// Create or update the row for (goal, month)
    ///
    /// Returns the stored row and, when a row already existed, its prior state.
    pub fn upsert(
        &self,
        goal_id: GoalId,
        month: Month,
        amount: Money,
    ) -> BudgetResult<(SavingsAllocation, Option<SavingsAllocation>)> {
        let mut table = write_guard(&self.data)?;

        let existing = table
            .rows
            .values_mut()
            .find(|a| a.goal_id == goal_id && a.month == month);

        if let Some(row) = existing {
            let before = row.clone();
            if row.amount != amount {
                row.amount = amount;
                row.updated_at = Utc::now();
            }
            return Ok((row.clone(), Some(before)));
        }

        let mut allocation = SavingsAllocation::new(goal_id, month, amount);
        allocation.id = AllocationId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(allocation.id, allocation.clone());
        Ok((allocation, None))
    }

    pub fn delete(&self, id: AllocationId) -> BudgetResult<Option<SavingsAllocation>> {
        Ok(write_guard(&self.data)?.rows.remove(&id))
    }

    /// Allocations for one goal or one month, ordered by month then goal
    pub fn list(&self, query: AllocationQuery) -> BudgetResult<Vec<SavingsAllocation>> {
        let table = read_guard(&self.data)?;
        let mut allocations: Vec<_> = table
            .rows
            .values()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        allocations.sort_by(|a, b| a.month.cmp(&b.month).then(a.goal_id.cmp(&b.goal_id)));
        Ok(allocations)
    }

    /// Sum allocated to a goal, optionally leaving one month out
    pub fn total_for_goal(&self, goal_id: GoalId, excluding: Option<Month>) -> BudgetResult<Money> {
        let table = read_guard(&self.data)?;
        Ok(table
            .rows
            .values()
            .filter(|a| a.goal_id == goal_id && Some(a.month) != excluding)
            .map(|a| a.amount)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AllocationRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AllocationRepository::new(temp_dir.path().join("allocations.json"));
        (temp_dir, repo)
    }

    fn month(m: u32) -> Month {
        Month::new(2025, m).unwrap()
    }

    #[test]
    fn test_upsert_keeps_one_row_per_goal_month() {
        let (_temp, repo) = create_test_repo();
        let goal = GoalId::new(1);

        let (first, before) = repo.upsert(goal, month(3), Money::from_dollars(100)).unwrap();
        assert!(before.is_none());

        let (second, before) = repo.upsert(goal, month(3), Money::from_dollars(80)).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(before.unwrap().amount, Money::from_dollars(100));
        assert_eq!(repo.list(AllocationQuery::Goal(goal)).unwrap().len(), 1);
    }

    #[test]
    fn test_total_excluding_month() {
        let (_temp, repo) = create_test_repo();
        let goal = GoalId::new(1);
        repo.upsert(goal, month(1), Money::from_dollars(100)).unwrap();
        repo.upsert(goal, month(2), Money::from_dollars(50)).unwrap();
        repo.upsert(GoalId::new(2), month(2), Money::from_dollars(999)).unwrap();

        assert_eq!(
            repo.total_for_goal(goal, None).unwrap(),
            Money::from_dollars(150)
        );
        assert_eq!(
            repo.total_for_goal(goal, Some(month(2))).unwrap(),
            Money::from_dollars(100)
        );
    }

    #[test]
    fn test_list_by_month() {
        let (_temp, repo) = create_test_repo();
        repo.upsert(GoalId::new(2), month(4), Money::from_dollars(10)).unwrap();
        repo.upsert(GoalId::new(1), month(4), Money::from_dollars(20)).unwrap();
        repo.upsert(GoalId::new(1), month(5), Money::from_dollars(30)).unwrap();

        let april = repo.list(AllocationQuery::Month(month(4))).unwrap();
        assert_eq!(april.len(), 2);
        assert_eq!(april[0].goal_id, GoalId::new(1));
    }
}
