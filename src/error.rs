//! Custom error types for Budget Master
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. A period with no data is never an error;
//! the aggregation layer returns zero-valued results instead.

use thiserror::Error;

/// The main error type for Budget Master operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed input to an entry operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The entry belongs to a closed period
    #[error("Period is closed: {0}")]
    Locked(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subcategories
    pub fn subcategory_not_found(category: &str, subcategory: &str) -> Self {
        Self::NotFound {
            entity_type: "Subcategory",
            identifier: format!("{} / {}", category, subcategory),
        }
    }

    /// Create a "not found" error for savings goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Savings goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for net worth entries
    pub fn net_worth_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Net worth entry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was caused by a closed period
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for Budget Master operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Validation("target amount must be positive".into());
        assert_eq!(
            err.to_string(),
            "Validation error: target amount must be positive"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::goal_not_found("Emergency Fund");
        assert_eq!(err.to_string(), "Savings goal not found: Emergency Fund");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_subcategory_not_found() {
        let err = BudgetError::subcategory_not_found("Food", "Caviar");
        assert_eq!(err.to_string(), "Subcategory not found: Food / Caviar");
    }

    #[test]
    fn test_locked_error() {
        let err = BudgetError::Locked("2025-03".into());
        assert!(err.is_locked());
        assert_eq!(err.to_string(), "Period is closed: 2025-03");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }
}
