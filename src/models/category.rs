//! Category registry model
//!
//! A category owns an ordered list of subcategories. Names are matched
//! case-insensitively but stored with the casing they were created with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category that income entries are filed under
pub const INCOME_CATEGORY: &str = "Income";

/// Bucket label for expenses recorded without a subcategory
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Categories seeded when the data directory is initialized
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Housing", &["Mortgage", "HOA", "Property Taxes", "Reserves"]),
    ("Utilities", &["Electric", "Gas", "Internet", "Phone", "Insurance"]),
    ("Food", &["Groceries", "Take Out", "Dining Out"]),
    ("Healthcare", &["Prescriptions", "Doctor Visits", "Co-Pay"]),
    ("Childcare", &["Daycare", "Activities", "Supplies"]),
    ("Vehicles", &["Gas", "Insurance", "Repairs", "Parking"]),
    ("Home", &["Maintenance", "Furniture", "Supplies"]),
    ("Vacation", &["Travel", "Lodging", "Activities"]),
    ("Other", &["Entertainment", "Clothes", "Other"]),
    (
        INCOME_CATEGORY,
        &["Jeff's Income", "Vanessa's Income", "Bonus", "Other Income"],
    ),
];

/// An expense or income category with its subcategories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,

    #[serde(default)]
    pub subcategories: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a category with no subcategories
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            subcategories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a category with the given subcategories, skipping duplicates
    pub fn with_subcategories<I, S>(name: impl Into<String>, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut category = Self::new(name);
        for sub in subcategories {
            category.add_subcategory(sub);
        }
        category
    }

    /// Name of the subcategory every new category starts with
    pub fn general_subcategory(name: &str) -> String {
        format!("{} (General)", name.trim())
    }

    /// Whether `name` refers to this category
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Find a subcategory by name, returning its stored spelling
    pub fn find_subcategory(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.subcategories
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Append a subcategory. Returns false if it was already present.
    pub fn add_subcategory(&mut self, name: impl Into<String>) -> bool {
        let name = name.into().trim().to_string();
        if name.is_empty() || self.find_subcategory(&name).is_some() {
            return false;
        }
        self.subcategories.push(name);
        true
    }

    /// Remove a subcategory. Returns false if it was not present.
    pub fn remove_subcategory(&mut self, name: &str) -> bool {
        let before = self.subcategories.len();
        let name = name.trim();
        self.subcategories.retain(|s| !s.eq_ignore_ascii_case(name));
        self.subcategories.len() != before
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.name.eq_ignore_ascii_case(UNCATEGORIZED) {
            return Err(CategoryValidationError::ReservedName);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    ReservedName,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::ReservedName => write!(f, "'{}' is a reserved name", UNCATEGORIZED),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategories_are_deduplicated() {
        let mut category = Category::with_subcategories("Food", ["Groceries", "groceries"]);
        assert_eq!(category.subcategories, vec!["Groceries".to_string()]);
        assert!(!category.add_subcategory("GROCERIES"));
        assert!(category.add_subcategory("Dining Out"));
        assert_eq!(category.find_subcategory("dining out"), Some("Dining Out"));
    }

    #[test]
    fn test_remove_subcategory() {
        let mut category = Category::with_subcategories("Home", ["Maintenance", "Furniture"]);
        assert!(category.remove_subcategory("furniture"));
        assert!(!category.remove_subcategory("Furniture"));
        assert_eq!(category.subcategories.len(), 1);
    }

    #[test]
    fn test_general_subcategory_name() {
        assert_eq!(Category::general_subcategory("Pets"), "Pets (General)");
    }

    #[test]
    fn test_validation() {
        assert!(Category::new("Pets").validate().is_ok());
        assert_eq!(
            Category::new("  ").validate(),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            Category::new("uncategorized").validate(),
            Err(CategoryValidationError::ReservedName)
        );
    }

    #[test]
    fn test_defaults_include_income() {
        assert!(DEFAULT_CATEGORIES
            .iter()
            .any(|(name, subs)| *name == INCOME_CATEGORY && subs.contains(&"Bonus")));
    }
}
