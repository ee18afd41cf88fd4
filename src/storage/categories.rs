//! Category registry repository
//!
//! Categories are stored in categories.json in display order.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::Category;

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

/// Serializable category data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for the category registry
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;
        *write_guard(&self.categories)? = file_data.categories;
        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let categories = read_guard(&self.categories)?;
        write_json_atomic(
            &self.path,
            &CategoryData {
                categories: categories.clone(),
            },
        )
    }

    /// Find a category by name (case-insensitive)
    pub fn get(&self, name: &str) -> BudgetResult<Option<Category>> {
        Ok(read_guard(&self.categories)?
            .iter()
            .find(|c| c.matches(name))
            .cloned())
    }

    /// All categories in display order
    pub fn all(&self) -> BudgetResult<Vec<Category>> {
        Ok(read_guard(&self.categories)?.clone())
    }

    /// Subcategories of a category, or None if the category is unknown
    pub fn subcategories_of(&self, name: &str) -> BudgetResult<Option<Vec<String>>> {
        Ok(self.get(name)?.map(|c| c.subcategories))
    }

    /// Insert a new category at the end, or replace the one with the same name
    ///
    /// Returns the replaced category, if any.
    pub fn upsert(&self, category: Category) -> BudgetResult<Option<Category>> {
        let mut categories = write_guard(&self.categories)?;
        match categories.iter_mut().find(|c| c.matches(&category.name)) {
            Some(existing) => Ok(Some(std::mem::replace(existing, category))),
            None => {
                categories.push(category);
                Ok(None)
            }
        }
    }

    pub fn delete(&self, name: &str) -> BudgetResult<Option<Category>> {
        let mut categories = write_guard(&self.categories)?;
        Ok(categories
            .iter()
            .position(|c| c.matches(name))
            .map(|idx| categories.remove(idx)))
    }

    pub fn is_empty(&self) -> BudgetResult<bool> {
        Ok(read_guard(&self.categories)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp, repo) = create_test_repo();
        assert!(repo.is_empty().unwrap());

        repo.upsert(Category::with_subcategories("Food", ["Groceries"]))
            .unwrap();
        let replaced = repo
            .upsert(Category::with_subcategories("food", ["Groceries", "Take Out"]))
            .unwrap();
        assert!(replaced.is_some());

        assert_eq!(
            repo.subcategories_of("FOOD").unwrap(),
            Some(vec!["Groceries".to_string(), "Take Out".to_string()])
        );
        assert_eq!(repo.subcategories_of("Pets").unwrap(), None);
    }

    #[test]
    fn test_order_preserved_through_save() {
        let (temp_dir, repo) = create_test_repo();
        for name in ["Housing", "Utilities", "Food"] {
            repo.upsert(Category::new(name)).unwrap();
        }
        repo.save().unwrap();

        let reloaded = CategoryRepository::new(temp_dir.path().join("categories.json"));
        reloaded.load().unwrap();
        let names: Vec<_> = reloaded.all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Housing", "Utilities", "Food"]);
    }

    #[test]
    fn test_delete() {
        let (_temp, repo) = create_test_repo();
        repo.upsert(Category::new("Pets")).unwrap();
        assert!(repo.delete("pets").unwrap().is_some());
        assert!(repo.delete("pets").unwrap().is_none());
    }
}
