//! Monthly budget targets
//!
//! A target is the amount the household plans to spend in a category (or one
//! of its subcategories) during a month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetTargetId;
use super::money::Money;
use super::period::Month;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTarget {
    pub id: BudgetTargetId,

    pub category: String,

    /// None targets the category as a whole
    #[serde(default)]
    pub subcategory: Option<String>,

    pub month: Month,

    pub amount: Money,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetTarget {
    pub fn new(
        category: impl Into<String>,
        subcategory: Option<String>,
        month: Month,
        amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetTargetId::new(0),
            category: category.into(),
            subcategory,
            month,
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this target covers the same (category, subcategory, month)
    pub fn same_slot(&self, category: &str, subcategory: Option<&str>, month: Month) -> bool {
        self.month == month
            && self.category.eq_ignore_ascii_case(category)
            && match (&self.subcategory, subcategory) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), TargetValidationError> {
        if self.amount.is_negative() {
            return Err(TargetValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for BudgetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subcategory {
            Some(sub) => write!(f, "{} {} / {}: {}", self.month, self.category, sub, self.amount),
            None => write!(f, "{} {}: {}", self.month, self.category, self.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetValidationError {
    NegativeAmount(Money),
}

impl fmt::Display for TargetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Budget target cannot be negative, got {}", amount)
            }
        }
    }
}

impl std::error::Error for TargetValidationError {}
