//! Savings goal service
//!
//! Goal lifecycle management and funding progress.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationQuery, GoalId, GoalProgress, GoalStatus, Money, SavingsGoal, DEFAULT_PRIORITY,
};
use crate::storage::Storage;

/// Field changes for an existing goal. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    /// `Some(None)` clears the target date
    pub target_date: Option<Option<NaiveDate>>,
    pub priority: Option<u32>,
    pub notes: Option<String>,
}

/// A goal paired with its funding progress
#[derive(Debug, Clone)]
pub struct GoalWithProgress {
    pub goal: SavingsGoal,
    pub progress: GoalProgress,
}

/// Service for savings goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new goal
    pub fn create(
        &self,
        name: &str,
        target_amount: Money,
        priority: Option<u32>,
        target_date: Option<NaiveDate>,
    ) -> BudgetResult<SavingsGoal> {
        let name = name.trim();

        if self.storage.goals.find_by_name(name)?.is_some() {
            return Err(BudgetError::Duplicate {
                entity_type: "Savings goal",
                identifier: name.to_string(),
            });
        }

        let mut goal = SavingsGoal::new(name, target_amount, priority.unwrap_or(DEFAULT_PRIORITY));
        goal.target_date = target_date;

        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let goal = self.storage.goals.insert(goal)?;
        self.storage.goals.save()?;

        self.storage.log_create(
            EntityType::SavingsGoal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        info!(id = %goal.id, name = %goal.name, priority = goal.priority, "created savings goal");
        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> BudgetResult<Option<SavingsGoal>> {
        self.storage.goals.get(id)
    }

    /// Find a goal by id ("goal-3" or "3") or by name
    pub fn find(&self, identifier: &str) -> BudgetResult<SavingsGoal> {
        if let Ok(id) = GoalId::parse(identifier) {
            if let Some(goal) = self.get(id)? {
                return Ok(goal);
            }
        }
        self.storage
            .goals
            .find_by_name(identifier)?
            .ok_or_else(|| BudgetError::goal_not_found(identifier.trim()))
    }

    /// Goals in allocation order
    pub fn list(&self, status: Option<GoalStatus>) -> BudgetResult<Vec<SavingsGoal>> {
        self.storage.list_goals(status)
    }

    /// Apply field changes to a goal
    pub fn update(&self, id: GoalId, changes: GoalUpdate) -> BudgetResult<SavingsGoal> {
        let mut goal = self
            .get(id)?
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))?;
        let before = goal.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if let Some(other) = self.storage.goals.find_by_name(&name)? {
                if other.id != id {
                    return Err(BudgetError::Duplicate {
                        entity_type: "Savings goal",
                        identifier: name,
                    });
                }
            }
            goal.name = name;
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = changes.target_date {
            goal.target_date = date;
        }
        if let Some(priority) = changes.priority {
            goal.priority = priority;
        }
        if let Some(notes) = changes.notes {
            goal.notes = notes;
        }

        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        goal.updated_at = chrono::Utc::now();

        self.storage.goals.update(goal.clone())?;
        self.storage.goals.save()?;

        let mut diff = Vec::new();
        if before.name != goal.name {
            diff.push(format!("name: {} -> {}", before.name, goal.name));
        }
        if before.target_amount != goal.target_amount {
            diff.push(format!(
                "target: {} -> {}",
                before.target_amount, goal.target_amount
            ));
        }
        if before.priority != goal.priority {
            diff.push(format!("priority: {} -> {}", before.priority, goal.priority));
        }
        if before.target_date != goal.target_date {
            diff.push("target date changed".to_string());
        }

        self.storage.log_update(
            EntityType::SavingsGoal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
            if diff.is_empty() {
                None
            } else {
                Some(diff.join(", "))
            },
        )?;

        Ok(goal)
    }

    /// Move a goal between active, paused and completed
    pub fn set_status(&self, id: GoalId, status: GoalStatus) -> BudgetResult<SavingsGoal> {
        let mut goal = self
            .get(id)?
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))?;

        if goal.status == status {
            return Ok(goal);
        }

        let before = goal.clone();
        goal.set_status(status);

        self.storage.goals.update(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::SavingsGoal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
            Some(format!("status: {} -> {}", before.status, goal.status)),
        )?;

        info!(id = %goal.id, status = %goal.status, "goal status changed");
        Ok(goal)
    }

    /// Delete a goal that has never been funded
    pub fn delete(&self, id: GoalId) -> BudgetResult<SavingsGoal> {
        let goal = self
            .get(id)?
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))?;

        let funded = self.storage.list_allocations(AllocationQuery::Goal(id))?;
        if !funded.is_empty() {
            return Err(BudgetError::Validation(format!(
                "Cannot delete '{}': it has {} allocation(s). Mark it completed or paused instead.",
                goal.name,
                funded.len()
            )));
        }

        self.storage.goals.delete(id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            EntityType::SavingsGoal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        Ok(goal)
    }

    /// Allocated total, remaining amount and monthly need for one goal
    pub fn progress(&self, goal: &SavingsGoal, today: NaiveDate) -> BudgetResult<GoalProgress> {
        let allocated = self.storage.allocations.total_for_goal(goal.id, None)?;
        Ok(goal.progress(allocated, today))
    }

    /// Progress for every goal, in allocation order
    pub fn progress_all(
        &self,
        status: Option<GoalStatus>,
        today: NaiveDate,
    ) -> BudgetResult<Vec<GoalWithProgress>> {
        self.list(status)?
            .into_iter()
            .map(|goal| {
                let progress = self.progress(&goal, today)?;
                Ok(GoalWithProgress { goal, progress })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::Month;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_goal() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service
            .create("Emergency Fund", Money::from_dollars(10_000), Some(1), None)
            .unwrap();
        assert_eq!(goal.priority, 1);
        assert!(goal.is_active());

        let err = service
            .create("emergency fund", Money::from_dollars(5), None, None)
            .unwrap_err();
        assert!(matches!(err, BudgetError::Duplicate { .. }));
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        assert!(service
            .create("Trip", Money::zero(), None, None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create("Trip", Money::from_dollars(10), Some(0), None)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_find_by_id_or_name() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service
            .create("Vacation", Money::from_dollars(2_000), None, None)
            .unwrap();

        assert_eq!(service.find("vacation").unwrap().id, goal.id);
        assert_eq!(service.find(&goal.id.to_string()).unwrap().id, goal.id);
        assert!(service.find("Boat").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_and_status() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service
            .create("Car", Money::from_dollars(5_000), Some(3), None)
            .unwrap();

        let updated = service
            .update(
                goal.id,
                GoalUpdate {
                    target_amount: Some(Money::from_dollars(6_000)),
                    priority: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.target_amount, Money::from_dollars(6_000));
        assert_eq!(updated.priority, 2);

        let paused = service.set_status(goal.id, GoalStatus::Paused).unwrap();
        assert_eq!(paused.status, GoalStatus::Paused);
        assert!(service.list(Some(GoalStatus::Active)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_refused_with_allocations() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let funded = service
            .create("Funded", Money::from_dollars(100), None, None)
            .unwrap();
        let empty = service
            .create("Empty", Money::from_dollars(100), None, None)
            .unwrap();
        storage
            .upsert_allocation(funded.id, Month::new(2025, 3).unwrap(), Money::from_dollars(10))
            .unwrap();

        assert!(service.delete(funded.id).unwrap_err().is_validation());
        service.delete(empty.id).unwrap();
        assert!(service.get(empty.id).unwrap().is_none());
    }

    #[test]
    fn test_progress_uses_all_allocations() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service
            .create("Laptop", Money::from_dollars(1_000), None, None)
            .unwrap();
        storage
            .upsert_allocation(goal.id, Month::new(2025, 1).unwrap(), Money::from_dollars(300))
            .unwrap();
        storage
            .upsert_allocation(goal.id, Month::new(2025, 2).unwrap(), Money::from_dollars(200))
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let progress = service.progress(&goal, today).unwrap();
        assert_eq!(progress.allocated, Money::from_dollars(500));
        assert_eq!(progress.remaining, Money::from_dollars(500));
        assert!((progress.percent_funded - 50.0).abs() < 1e-9);
    }
}
