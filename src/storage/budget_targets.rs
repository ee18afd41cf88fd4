//! Budget target repository

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::{BudgetTarget, BudgetTargetId, Month};

use super::file_io::{read_json, write_json_atomic};
use super::{next_id_after, read_guard, write_guard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TargetData {
    #[serde(default)]
    next_id: u64,
    targets: Vec<BudgetTarget>,
}

#[derive(Debug, Default)]
struct TargetTable {
    next_id: u64,
    rows: BTreeMap<BudgetTargetId, BudgetTarget>,
}

/// Repository for monthly budget targets
pub struct BudgetTargetRepository {
    path: PathBuf,
    data: RwLock<TargetTable>,
}

impl BudgetTargetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(TargetTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: TargetData = read_json(&self.path)?;
        let mut table = write_guard(&self.data)?;

        table.next_id =
            next_id_after(file_data.next_id, file_data.targets.iter().map(|t| t.id.value()));
        table.rows = file_data.targets.into_iter().map(|t| (t.id, t)).collect();

        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let table = read_guard(&self.data)?;
        write_json_atomic(
            &self.path,
            &TargetData {
                next_id: table.next_id,
                targets: table.rows.values().cloned().collect(),
            },
        )
    }

    /// Create the target for its (category, subcategory, month) or replace its amount
    ///
    /// Returns the stored target and its prior state when one existed.
    pub fn upsert(
        &self,
        target: BudgetTarget,
    ) -> BudgetResult<(BudgetTarget, Option<BudgetTarget>)> {
        let mut table = write_guard(&self.data)?;

        let existing = table.rows.values_mut().find(|t| {
            t.same_slot(&target.category, target.subcategory.as_deref(), target.month)
        });

        if let Some(row) = existing {
            let before = row.clone();
            row.amount = target.amount;
            row.updated_at = Utc::now();
            return Ok((row.clone(), Some(before)));
        }

        let mut target = target;
        target.id = BudgetTargetId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(target.id, target.clone());
        Ok((target, None))
    }

    pub fn get(&self, id: BudgetTargetId) -> BudgetResult<Option<BudgetTarget>> {
        Ok(read_guard(&self.data)?.rows.get(&id).cloned())
    }

    pub fn delete(&self, id: BudgetTargetId) -> BudgetResult<Option<BudgetTarget>> {
        Ok(write_guard(&self.data)?.rows.remove(&id))
    }

    /// Targets for a month, by category then subcategory
    pub fn list_for_month(&self, month: Month) -> BudgetResult<Vec<BudgetTarget>> {
        let table = read_guard(&self.data)?;
        let mut targets: Vec<_> = table
            .rows
            .values()
            .filter(|t| t.month == month)
            .cloned()
            .collect();
        targets.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.subcategory.cmp(&b.subcategory))
        });
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetTargetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetTargetRepository::new(temp_dir.path().join("targets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_replaces_same_slot() {
        let (_temp, repo) = create_test_repo();
        let march = Month::new(2025, 3).unwrap();

        let (first, _) = repo
            .upsert(BudgetTarget::new(
                "Food",
                Some("Groceries".into()),
                march,
                Money::from_dollars(500),
            ))
            .unwrap();
        let (second, before) = repo
            .upsert(BudgetTarget::new(
                "food",
                Some("groceries".into()),
                march,
                Money::from_dollars(650),
            ))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(before.unwrap().amount, Money::from_dollars(500));
        assert_eq!(repo.list_for_month(march).unwrap().len(), 1);
        assert_eq!(second.amount, Money::from_dollars(650));
    }

    #[test]
    fn test_months_are_separate() {
        let (_temp, repo) = create_test_repo();
        let march = Month::new(2025, 3).unwrap();
        repo.upsert(BudgetTarget::new("Food", None, march, Money::from_dollars(1)))
            .unwrap();
        repo.upsert(BudgetTarget::new("Food", None, march.next(), Money::from_dollars(2)))
            .unwrap();
        assert_eq!(repo.list_for_month(march).unwrap().len(), 1);
        assert_eq!(repo.list_for_month(march.next()).unwrap().len(), 1);
    }
}
