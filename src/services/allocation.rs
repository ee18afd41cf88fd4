//! Allocation engine
//!
//! Splits a month's surplus across active savings goals in priority order.
//! A plan is a pure preview; confirming it writes the month's allocation rows
//! so that re-running with the same ledger changes nothing.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::BudgetResult;
use crate::models::{AllocationQuery, GoalId, GoalStatus, Money, Month};
use crate::storage::Storage;

use super::aggregation::AggregationService;

/// One goal's share of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAllocation {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub priority: u32,
    /// Target minus allocations made in other months
    pub remaining: Money,
    pub amount: Money,
}

/// How a month's surplus would be distributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    pub month: Month,
    /// Net savings of the month
    pub surplus: Money,
    /// Every active goal in allocation order, including those receiving nothing
    pub allocations: Vec<GoalAllocation>,
    /// Surplus left after every goal is capped
    pub unallocated: Money,
}

impl AllocationPlan {
    pub fn total_allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    pub fn amount_for(&self, goal_id: GoalId) -> Money {
        self.allocations
            .iter()
            .find(|a| a.goal_id == goal_id)
            .map_or(Money::zero(), |a| a.amount)
    }

    /// The goals that receive something
    pub fn funded(&self) -> impl Iterator<Item = &GoalAllocation> {
        self.allocations.iter().filter(|a| !a.amount.is_zero())
    }
}

/// What confirming a plan changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    pub plan: AllocationPlan,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
}

impl ConfirmOutcome {
    pub fn changed(&self) -> bool {
        self.created + self.updated + self.removed > 0
    }
}

pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Preview the distribution of `month`'s surplus
    pub fn plan(&self, month: Month) -> BudgetResult<AllocationPlan> {
        let surplus = AggregationService::new(self.storage)
            .monthly_summary(month)?
            .net_savings;
        let goals = self.storage.list_goals(Some(GoalStatus::Active))?;

        let mut leftover = if surplus.is_positive() {
            surplus
        } else {
            Money::zero()
        };
        let mut allocations = Vec::with_capacity(goals.len());

        for goal in goals {
            let prior = self
                .storage
                .allocations
                .total_for_goal(goal.id, Some(month))?;
            let remaining = goal.target_amount - prior;

            let amount = if remaining.is_positive() && leftover.is_positive() {
                remaining.min(leftover)
            } else {
                Money::zero()
            };
            leftover -= amount;

            debug!(goal = %goal.id, %remaining, %amount, "planned allocation");
            allocations.push(GoalAllocation {
                goal_id: goal.id,
                goal_name: goal.name,
                priority: goal.priority,
                remaining,
                amount,
            });
        }

        Ok(AllocationPlan {
            month,
            surplus,
            allocations,
            unallocated: leftover,
        })
    }

    /// Persist `month`'s plan
    ///
    /// Each funded goal gets exactly one row for the month. Rows for goals the
    /// plan no longer funds are removed. Other months are never touched.
    pub fn confirm(&self, month: Month) -> BudgetResult<ConfirmOutcome> {
        let plan = self.plan(month)?;
        let mut outcome = ConfirmOutcome {
            plan: plan.clone(),
            created: 0,
            updated: 0,
            unchanged: 0,
            removed: 0,
        };

        for share in plan.funded() {
            let before = self.storage.allocations.get_for(share.goal_id, month)?;
            self.storage
                .upsert_allocation(share.goal_id, month, share.amount)?;
            match before {
                None => outcome.created += 1,
                Some(row) if row.amount == share.amount => outcome.unchanged += 1,
                Some(_) => outcome.updated += 1,
            }
        }

        let stale: Vec<_> = self
            .storage
            .list_allocations(AllocationQuery::Month(month))?
            .into_iter()
            .filter(|row| plan.amount_for(row.goal_id).is_zero())
            .collect();

        if !stale.is_empty() {
            for row in &stale {
                self.storage.allocations.delete(row.id)?;
            }
            self.storage.allocations.save()?;

            for row in &stale {
                self.storage.log_delete(
                    EntityType::SavingsAllocation,
                    row.id.to_string(),
                    Some(format!("{} {}", row.goal_id, row.month)),
                    row,
                )?;
            }
            outcome.removed = stale.len();
        }

        info!(
            %month,
            allocated = %plan.total_allocated(),
            unallocated = %plan.unallocated,
            created = outcome.created,
            updated = outcome.updated,
            removed = outcome.removed,
            "confirmed allocation"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{Person, SavingsGoal, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn march() -> Month {
        Month::new(2025, 3).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    /// Record income and expenses so the month's surplus is `surplus` dollars
    fn with_surplus(storage: &Storage, month_date: NaiveDate, surplus: i64) {
        storage
            .transactions
            .insert(Transaction::income(
                Person::Jeff,
                month_date,
                Money::from_dollars(1_000),
            ))
            .unwrap();
        storage
            .transactions
            .insert(Transaction::expense(
                Person::Vanessa,
                month_date,
                Money::from_dollars(1_000 - surplus),
                "Food",
                None,
            ))
            .unwrap();
    }

    fn goal(storage: &Storage, name: &str, target: i64, priority: u32) -> SavingsGoal {
        storage
            .goals
            .insert(SavingsGoal::new(name, Money::from_dollars(target), priority))
            .unwrap()
    }

    #[test]
    fn test_priority_order() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 120);
        let g2 = goal(&storage, "Second", 500, 2);
        let g1 = goal(&storage, "First", 100, 1);

        let plan = AllocationService::new(&storage).plan(march()).unwrap();
        assert_eq!(plan.surplus, Money::from_dollars(120));
        assert_eq!(plan.allocations[0].goal_id, g1.id);
        assert_eq!(plan.amount_for(g1.id), Money::from_dollars(100));
        assert_eq!(plan.amount_for(g2.id), Money::from_dollars(20));
        assert_eq!(plan.unallocated, Money::zero());
    }

    #[test]
    fn test_equal_priority_breaks_ties_by_id() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 50);
        let older = goal(&storage, "Older", 40, 1);
        let newer = goal(&storage, "Newer", 40, 1);

        let plan = AllocationService::new(&storage).plan(march()).unwrap();
        assert_eq!(plan.amount_for(older.id), Money::from_dollars(40));
        assert_eq!(plan.amount_for(newer.id), Money::from_dollars(10));
    }

    #[test]
    fn test_goal_cap_leaves_unallocated() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 150);
        let only = goal(&storage, "Only", 100, 1);

        let plan = AllocationService::new(&storage).plan(march()).unwrap();
        assert_eq!(plan.amount_for(only.id), Money::from_dollars(100));
        assert_eq!(plan.unallocated, Money::from_dollars(50));
    }

    #[test]
    fn test_other_months_count_toward_remaining() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 100);
        let car = goal(&storage, "Car", 100, 1);
        let feb = march().prev();
        storage
            .upsert_allocation(car.id, feb, Money::from_dollars(70))
            .unwrap();

        let service = AllocationService::new(&storage);
        let plan = service.plan(march()).unwrap();
        assert_eq!(plan.allocations[0].remaining, Money::from_dollars(30));
        assert_eq!(plan.amount_for(car.id), Money::from_dollars(30));
        assert_eq!(plan.unallocated, Money::from_dollars(70));

        service.confirm(march()).unwrap();
        let feb_rows = storage.list_allocations(AllocationQuery::Month(feb)).unwrap();
        assert_eq!(feb_rows.len(), 1);
        assert_eq!(feb_rows[0].amount, Money::from_dollars(70));
    }

    #[test]
    fn test_fully_funded_goal_gets_nothing() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 100);
        let done = goal(&storage, "Done", 50, 1);
        let next = goal(&storage, "Next", 500, 2);
        storage
            .upsert_allocation(done.id, march().prev(), Money::from_dollars(80))
            .unwrap();

        let plan = AllocationService::new(&storage).plan(march()).unwrap();
        assert_eq!(plan.amount_for(done.id), Money::zero());
        assert_eq!(plan.allocations[0].remaining, Money::from_dollars(-30));
        assert_eq!(plan.amount_for(next.id), Money::from_dollars(100));
    }

    #[test]
    fn test_paused_goals_are_skipped() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 100);
        let mut paused = goal(&storage, "Paused", 100, 1);
        paused.set_status(GoalStatus::Paused);
        storage.goals.update(paused.clone()).unwrap();
        let active = goal(&storage, "Active", 100, 2);

        let plan = AllocationService::new(&storage).plan(march()).unwrap();
        assert_eq!(plan.allocations.len(), 1);
        assert_eq!(plan.amount_for(active.id), Money::from_dollars(100));
    }

    #[test]
    fn test_negative_surplus_persists_nothing() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), -200);
        goal(&storage, "Car", 100, 1);

        let service = AllocationService::new(&storage);
        let plan = service.plan(march()).unwrap();
        assert_eq!(plan.surplus, Money::from_dollars(-200));
        assert_eq!(plan.total_allocated(), Money::zero());
        assert_eq!(plan.unallocated, Money::zero());

        let outcome = service.confirm(march()).unwrap();
        assert!(!outcome.changed());
        assert!(storage
            .list_allocations(AllocationQuery::Month(march()))
            .unwrap()
            .is_empty());
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 120);
        goal(&storage, "First", 100, 1);
        goal(&storage, "Second", 500, 2);

        let service = AllocationService::new(&storage);
        let first = service.confirm(march()).unwrap();
        assert_eq!(first.created, 2);
        let rows = storage.list_allocations(AllocationQuery::Month(march())).unwrap();
        let audit_len = storage.audit().read_all().unwrap().len();

        let second = service.confirm(march()).unwrap();
        assert!(!second.changed());
        assert_eq!(second.unchanged, 2);
        assert_eq!(
            storage.list_allocations(AllocationQuery::Month(march())).unwrap(),
            rows
        );
        assert_eq!(storage.audit().read_all().unwrap().len(), audit_len);
    }

    #[test]
    fn test_confirm_updates_and_removes_rows() {
        let (_temp, storage) = create_test_storage();
        with_surplus(&storage, date(3, 1), 120);
        let g1 = goal(&storage, "First", 100, 1);
        let g2 = goal(&storage, "Second", 500, 2);

        let service = AllocationService::new(&storage);
        service.confirm(march()).unwrap();

        // A large expense shrinks the surplus to 60, so only the first goal is funded
        storage
            .transactions
            .insert(Transaction::expense(
                Person::Jeff,
                date(3, 20),
                Money::from_dollars(60),
                "Home",
                None,
            ))
            .unwrap();

        let outcome = service.confirm(march()).unwrap();
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.removed, 1);

        let rows = storage.list_allocations(AllocationQuery::Month(march())).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].goal_id, g1.id);
        assert_eq!(rows[0].amount, Money::from_dollars(60));
        assert!(storage.allocations.get_for(g2.id, march()).unwrap().is_none());
    }
}
