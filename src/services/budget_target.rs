//! Budget target service
//!
//! Monthly spending estimates per category or subcategory.

use tracing::debug;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetTarget, BudgetTargetId, Money, Month};
use crate::storage::Storage;

pub struct BudgetTargetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetTargetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the target for (category, subcategory, month), replacing any prior amount
    pub fn set(
        &self,
        category: &str,
        subcategory: Option<&str>,
        month: Month,
        amount: Money,
    ) -> BudgetResult<BudgetTarget> {
        let registered = self
            .storage
            .categories
            .get(category)?
            .ok_or_else(|| BudgetError::category_not_found(category.trim()))?;

        let subcategory = match subcategory {
            Some(sub) => Some(
                registered
                    .find_subcategory(sub)
                    .map(str::to_string)
                    .ok_or_else(|| BudgetError::subcategory_not_found(&registered.name, sub.trim()))?,
            ),
            None => None,
        };

        let target = BudgetTarget::new(registered.name.clone(), subcategory, month, amount);
        target
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let (stored, before) = self.storage.targets.upsert(target)?;
        self.storage.targets.save()?;

        let label = Some(stored.to_string());
        match before {
            Some(before) => self.storage.log_update(
                EntityType::BudgetTarget,
                stored.id.to_string(),
                label,
                &before,
                &stored,
                Some(format!("amount: {} -> {}", before.amount, stored.amount)),
            )?,
            None => self.storage.log_create(
                EntityType::BudgetTarget,
                stored.id.to_string(),
                label,
                &stored,
            )?,
        }

        debug!(id = %stored.id, amount = %stored.amount, "budget target set");
        Ok(stored)
    }

    pub fn list(&self, month: Month) -> BudgetResult<Vec<BudgetTarget>> {
        self.storage.targets.list_for_month(month)
    }

    pub fn delete(&self, id: BudgetTargetId) -> BudgetResult<BudgetTarget> {
        let target = self.storage.targets.delete(id)?.ok_or_else(|| {
            BudgetError::NotFound {
                entity_type: "Budget target",
                identifier: id.to_string(),
            }
        })?;
        self.storage.targets.save()?;

        self.storage.log_delete(
            EntityType::BudgetTarget,
            target.id.to_string(),
            Some(target.to_string()),
            &target,
        )?;

        Ok(target)
    }

    /// Copy every target of `from` into `to`, keeping targets `to` already has
    ///
    /// Returns how many targets were created.
    pub fn copy_month(&self, from: Month, to: Month) -> BudgetResult<usize> {
        let existing = self.list(to)?;
        let mut created = 0;

        for target in self.list(from)? {
            let taken = existing
                .iter()
                .any(|t| t.same_slot(&target.category, target.subcategory.as_deref(), to));
            if taken {
                continue;
            }
            self.set(&target.category, target.subcategory.as_deref(), to, target.amount)?;
            created += 1;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn march() -> Month {
        Month::new(2025, 3).unwrap()
    }

    #[test]
    fn test_set_replaces_amount() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetTargetService::new(&storage);

        let first = service
            .set("food", Some("groceries"), march(), Money::from_dollars(600))
            .unwrap();
        assert_eq!(first.category, "Food");
        assert_eq!(first.subcategory.as_deref(), Some("Groceries"));

        let second = service
            .set("Food", Some("Groceries"), march(), Money::from_dollars(650))
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.list(march()).unwrap().len(), 1);
    }

    #[test]
    fn test_set_validates() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetTargetService::new(&storage);

        assert!(service
            .set("Boats", None, march(), Money::from_dollars(1))
            .unwrap_err()
            .is_not_found());
        assert!(service
            .set("Food", Some("Caviar"), march(), Money::from_dollars(1))
            .unwrap_err()
            .is_not_found());
        assert!(service
            .set("Food", None, march(), Money::from_dollars(-1))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_copy_month_keeps_existing() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetTargetService::new(&storage);
        let april = march().next();

        service.set("Food", Some("Groceries"), march(), Money::from_dollars(600)).unwrap();
        service.set("Housing", Some("Mortgage"), march(), Money::from_dollars(2_000)).unwrap();
        service.set("Food", Some("Groceries"), april, Money::from_dollars(700)).unwrap();

        assert_eq!(service.copy_month(march(), april).unwrap(), 1);
        let april_targets = service.list(april).unwrap();
        assert_eq!(april_targets.len(), 2);
        let groceries = april_targets
            .iter()
            .find(|t| t.subcategory.as_deref() == Some("Groceries"))
            .unwrap();
        assert_eq!(groceries.amount, Money::from_dollars(700));
    }

    #[test]
    fn test_delete() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetTargetService::new(&storage);
        let target = service.set("Food", None, march(), Money::from_dollars(10)).unwrap();
        service.delete(target.id).unwrap();
        assert!(service.delete(target.id).unwrap_err().is_not_found());
    }
}
