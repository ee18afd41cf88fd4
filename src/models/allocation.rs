//! Savings allocation model
//!
//! Records how much of a month's surplus was set aside for a goal. There is
//! at most one allocation per goal per month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AllocationId, GoalId};
use super::money::Money;
use super::period::Month;

/// Money assigned to a savings goal out of one month's surplus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAllocation {
    pub id: AllocationId,

    pub goal_id: GoalId,

    /// The month whose surplus funded this allocation
    pub month: Month,

    pub amount: Money,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl SavingsAllocation {
    pub fn new(goal_id: GoalId, month: Month, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: AllocationId::new(0),
            goal_id,
            month,
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the allocated amount
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), AllocationValidationError> {
        if !self.amount.is_positive() {
            return Err(AllocationValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for SavingsAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.month, self.goal_id, self.amount)
    }
}

/// Selects allocations by goal or by month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationQuery {
    Goal(GoalId),
    Month(Month),
}

impl AllocationQuery {
    pub fn matches(&self, allocation: &SavingsAllocation) -> bool {
        match self {
            Self::Goal(goal_id) => allocation.goal_id == *goal_id,
            Self::Month(month) => allocation.month == *month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationValidationError {
    NonPositiveAmount(Money),
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Allocation amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for AllocationValidationError {}
