//! Category service
//!
//! Business logic for the category registry: adding categories and
//! subcategories, and removing them once nothing refers to them.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, INCOME_CATEGORY};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> BudgetResult<Vec<Category>> {
        self.storage.categories.all()
    }

    pub fn get(&self, name: &str) -> BudgetResult<Category> {
        self.storage
            .categories
            .get(name)?
            .ok_or_else(|| BudgetError::category_not_found(name.trim()))
    }

    /// Add a category with its "(General)" subcategory
    pub fn add_category(&self, name: &str) -> BudgetResult<Category> {
        let name = name.trim();

        if self.storage.categories.get(name)?.is_some() {
            return Err(BudgetError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category =
            Category::with_subcategories(name, [Category::general_subcategory(name)]);
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.name.clone(),
            Some(category.name.clone()),
            &category,
        )?;

        info!(category = %category.name, "added category");
        Ok(category)
    }

    /// Append a subcategory to an existing category
    pub fn add_subcategory(&self, category: &str, subcategory: &str) -> BudgetResult<Category> {
        let mut updated = self.get(category)?;
        let before = updated.clone();
        let subcategory = subcategory.trim();

        if subcategory.is_empty() {
            return Err(BudgetError::Validation("Subcategory name cannot be empty".into()));
        }
        if !updated.add_subcategory(subcategory) {
            return Err(BudgetError::Duplicate {
                entity_type: "Subcategory",
                identifier: format!("{} / {}", updated.name, subcategory),
            });
        }

        self.storage.categories.upsert(updated.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            updated.name.clone(),
            Some(updated.name.clone()),
            &before,
            &updated,
            Some(format!("added subcategory '{}'", subcategory)),
        )?;

        Ok(updated)
    }

    /// Remove a subcategory that no expense uses
    ///
    /// A category left with no subcategories is removed as well. Returns the
    /// category's remaining state, or None if it was removed.
    pub fn remove_subcategory(
        &self,
        category: &str,
        subcategory: &str,
    ) -> BudgetResult<Option<Category>> {
        let mut updated = self.get(category)?;
        let before = updated.clone();

        let stored_name = updated
            .find_subcategory(subcategory)
            .map(str::to_string)
            .ok_or_else(|| BudgetError::subcategory_not_found(&updated.name, subcategory.trim()))?;

        let in_use = self
            .storage
            .transactions
            .count_using(&updated.name, Some(&stored_name))?;
        if in_use > 0 {
            return Err(BudgetError::Validation(format!(
                "Cannot remove '{} / {}': {} expense(s) use it",
                updated.name, stored_name, in_use
            )));
        }

        updated.remove_subcategory(&stored_name);

        if updated.subcategories.is_empty() && !updated.matches(INCOME_CATEGORY) {
            self.remove_category_unchecked(&before)?;
            info!(category = %before.name, "removed empty category");
            return Ok(None);
        }

        self.storage.categories.upsert(updated.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            updated.name.clone(),
            Some(updated.name.clone()),
            &before,
            &updated,
            Some(format!("removed subcategory '{}'", stored_name)),
        )?;

        Ok(Some(updated))
    }

    /// Remove a category no expense uses
    pub fn remove_category(&self, name: &str) -> BudgetResult<Category> {
        let category = self.get(name)?;

        if category.matches(INCOME_CATEGORY) {
            return Err(BudgetError::Validation(format!(
                "'{}' is required and cannot be removed",
                INCOME_CATEGORY
            )));
        }

        let in_use = self.storage.transactions.count_using(&category.name, None)?;
        if in_use > 0 {
            return Err(BudgetError::Validation(format!(
                "Cannot remove '{}': {} expense(s) use it",
                category.name, in_use
            )));
        }

        self.remove_category_unchecked(&category)?;
        Ok(category)
    }

    fn remove_category_unchecked(&self, category: &Category) -> BudgetResult<()> {
        self.storage.categories.delete(&category.name)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.name.clone(),
            Some(category.name.clone()),
            category,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{Money, Person, Transaction};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_defaults_are_seeded() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.get("food").unwrap();
        assert!(food.find_subcategory("Groceries").is_some());
    }

    #[test]
    fn test_add_category_gets_general_subcategory() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let pets = service.add_category("Pets").unwrap();
        assert_eq!(pets.subcategories, vec!["Pets (General)".to_string()]);

        let err = service.add_category("pets").unwrap_err();
        assert!(matches!(err, BudgetError::Duplicate { .. }));
    }

    #[test]
    fn test_add_subcategory() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let food = service.add_subcategory("Food", "Coffee").unwrap();
        assert_eq!(food.subcategories.last().map(String::as_str), Some("Coffee"));
        assert!(matches!(
            service.add_subcategory("Food", "coffee").unwrap_err(),
            BudgetError::Duplicate { .. }
        ));
        assert!(service
            .add_subcategory("Nope", "Coffee")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove_subcategory_in_use_is_refused() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        storage
            .transactions
            .insert(Transaction::expense(
                Person::Jeff,
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                Money::from_dollars(5),
                "Food",
                Some("Groceries".into()),
            ))
            .unwrap();

        assert!(service
            .remove_subcategory("Food", "Groceries")
            .unwrap_err()
            .is_validation());

        let food = service.remove_subcategory("Food", "take out").unwrap().unwrap();
        assert!(food.find_subcategory("Take Out").is_none());
    }

    #[test]
    fn test_removing_last_subcategory_removes_category() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.add_category("Pets").unwrap();

        let result = service.remove_subcategory("Pets", "Pets (General)").unwrap();
        assert!(result.is_none());
        assert!(service.get("Pets").unwrap_err().is_not_found());
    }

    #[test]
    fn test_income_category_cannot_be_removed() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        assert!(service
            .remove_category(INCOME_CATEGORY)
            .unwrap_err()
            .is_validation());
    }
}
