//! Storage initialization
//!
//! Handles first-run setup and seeding of the default category registry.

use tracing::info;

use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::models::{Category, DEFAULT_CATEGORIES};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing data is never overwritten.
pub fn initialize_storage(paths: &BudgetPaths) -> Result<(), BudgetError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        create_default_categories(paths)?;
    }

    Ok(())
}

fn create_default_categories(paths: &BudgetPaths) -> Result<(), BudgetError> {
    let categories: Vec<Category> = DEFAULT_CATEGORIES
        .iter()
        .map(|(name, subs)| Category::with_subcategories(*name, subs.iter().copied()))
        .collect();

    info!(count = categories.len(), "seeding default categories");
    write_json_atomic(paths.categories_file(), &CategoryData { categories })
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BudgetPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(data.categories.iter().any(|c| c.name == "Childcare"));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = CategoryData {
            categories: vec![Category::new("Custom")],
        };
        write_json_atomic(paths.categories_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Custom");
    }
}
