//! Savings goal repository

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::{GoalId, GoalStatus, SavingsGoal};

use super::file_io::{read_json, write_json_atomic};
use super::{next_id_after, read_guard, write_guard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GoalData {
    #[serde(default)]
    next_id: u64,
    goals: Vec<SavingsGoal>,
}

#[derive(Debug, Default)]
struct GoalTable {
    next_id: u64,
    rows: BTreeMap<GoalId, SavingsGoal>,
}

/// Repository for savings goals
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<GoalTable>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(GoalTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: GoalData = read_json(&self.path)?;
        let mut table = write_guard(&self.data)?;

        table.next_id =
            next_id_after(file_data.next_id, file_data.goals.iter().map(|g| g.id.value()));
        table.rows = file_data.goals.into_iter().map(|g| (g.id, g)).collect();

        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let table = read_guard(&self.data)?;
        write_json_atomic(
            &self.path,
            &GoalData {
                next_id: table.next_id,
                goals: table.rows.values().cloned().collect(),
            },
        )
    }

    pub fn get(&self, id: GoalId) -> BudgetResult<Option<SavingsGoal>> {
        Ok(read_guard(&self.data)?.rows.get(&id).cloned())
    }

    /// Find a goal by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> BudgetResult<Option<SavingsGoal>> {
        let name = name.trim();
        Ok(read_guard(&self.data)?
            .rows
            .values()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    /// Store a new goal, assigning its id
    pub fn insert(&self, mut goal: SavingsGoal) -> BudgetResult<SavingsGoal> {
        let mut table = write_guard(&self.data)?;
        goal.id = GoalId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(goal.id, goal.clone());
        Ok(goal)
    }

    /// Replace an existing goal. Returns false if the id is unknown.
    pub fn update(&self, goal: SavingsGoal) -> BudgetResult<bool> {
        let mut table = write_guard(&self.data)?;
        match table.rows.get_mut(&goal.id) {
            Some(existing) => {
                *existing = goal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&self, id: GoalId) -> BudgetResult<Option<SavingsGoal>> {
        Ok(write_guard(&self.data)?.rows.remove(&id))
    }

    /// Goals in allocation order (priority, then id), optionally by status
    pub fn list(&self, status: Option<GoalStatus>) -> BudgetResult<Vec<SavingsGoal>> {
        let table = read_guard(&self.data)?;
        let mut goals: Vec<_> = table
            .rows
            .values()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        goals.sort_by_key(|g| g.allocation_order());
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GoalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_list_orders_by_priority_then_id() {
        let (_temp, repo) = create_test_repo();
        let low = repo
            .insert(SavingsGoal::new("Vacation", Money::from_dollars(100), 5))
            .unwrap();
        let high_a = repo
            .insert(SavingsGoal::new("Emergency", Money::from_dollars(100), 1))
            .unwrap();
        let high_b = repo
            .insert(SavingsGoal::new("Car", Money::from_dollars(100), 1))
            .unwrap();

        let ids: Vec<_> = repo.list(None).unwrap().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![high_a.id, high_b.id, low.id]);
    }

    #[test]
    fn test_list_by_status() {
        let (_temp, repo) = create_test_repo();
        let mut paused = repo
            .insert(SavingsGoal::new("Boat", Money::from_dollars(100), 1))
            .unwrap();
        paused.set_status(GoalStatus::Paused);
        repo.update(paused).unwrap();
        repo.insert(SavingsGoal::new("House", Money::from_dollars(100), 2))
            .unwrap();

        let active = repo.list(Some(GoalStatus::Active)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "House");
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let (_temp, repo) = create_test_repo();
        repo.insert(SavingsGoal::new("Emergency Fund", Money::from_dollars(100), 1))
            .unwrap();
        assert!(repo.find_by_name("emergency fund").unwrap().is_some());
        assert!(repo.find_by_name("Vacation").unwrap().is_none());
    }
}
