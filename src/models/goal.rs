//! Savings goals and their funding progress

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::GoalId;
use super::money::Money;

/// Priority new goals get when none is given
pub const DEFAULT_PRIORITY: u32 = 5;

/// Lifecycle of a savings goal. Only active goals receive allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            "paused" | "pause" => Ok(Self::Paused),
            other => Err(format!("Unknown goal status: {}", other)),
        }
    }
}

/// A named savings target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,

    /// Unique across goals, compared case-insensitively
    pub name: String,

    pub target_amount: Money,

    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    /// Lower numbers are funded first
    pub priority: u32,

    #[serde(default)]
    pub status: GoalStatus,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: Money, priority: u32) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(0),
            name: name.into().trim().to_string(),
            target_amount,
            target_date: None,
            priority,
            status: GoalStatus::Active,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    pub fn set_status(&mut self, status: GoalStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Allocation order: priority, then creation order
    pub fn allocation_order(&self) -> (u32, GoalId) {
        (self.priority, self.id)
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(GoalValidationError::NameTooLong(self.name.len()));
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        if self.priority == 0 {
            return Err(GoalValidationError::InvalidPriority);
        }
        Ok(())
    }

    /// Funding progress given the total allocated so far
    pub fn progress(&self, allocated: Money, today: NaiveDate) -> GoalProgress {
        let remaining = if allocated >= self.target_amount {
            Money::zero()
        } else {
            self.target_amount - allocated
        };
        let percent_funded = (allocated.ratio_of(self.target_amount) * 100.0).clamp(0.0, 100.0);

        let monthly_needed = self.target_date.map(|target| {
            if remaining.is_zero() {
                return Money::zero();
            }
            let months = months_until(today, target);
            if months <= 0 {
                remaining
            } else {
                remaining.div_rounded(months)
            }
        });

        GoalProgress {
            goal_id: self.id,
            allocated,
            remaining,
            percent_funded,
            overfunded: allocated > self.target_amount,
            monthly_needed,
        }
    }
}

/// Whole months from `today`'s month up to and including `target`'s month
fn months_until(today: NaiveDate, target: NaiveDate) -> i64 {
    if target < today {
        return 0;
    }
    let months = (target.year() - today.year()) as i64 * 12 + target.month() as i64
        - today.month() as i64;
    months + 1
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.target_amount)
    }
}

/// Derived funding state for a goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    /// Raw ledger total, may exceed the target
    pub allocated: Money,
    pub remaining: Money,
    /// Clamped to 0..=100
    pub percent_funded: f64,
    pub overfunded: bool,
    /// None when the goal has no target date
    pub monthly_needed: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositiveTarget(Money),
    InvalidPriority,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Goal name too long ({} chars, max 100)", len),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Target amount must be positive, got {}", amount)
            }
            Self::InvalidPriority => write!(f, "Priority must be at least 1"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(SavingsGoal::new("Emergency Fund", Money::from_dollars(10_000), 1)
            .validate()
            .is_ok());
        assert_eq!(
            SavingsGoal::new("Trip", Money::zero(), 1).validate(),
            Err(GoalValidationError::NonPositiveTarget(Money::zero()))
        );
        assert_eq!(
            SavingsGoal::new("Trip", Money::from_dollars(5), 0).validate(),
            Err(GoalValidationError::InvalidPriority)
        );
    }

    #[test]
    fn test_progress_partial() {
        let goal = SavingsGoal::new("Car", Money::from_dollars(1000), 2)
            .with_target_date(date(2025, 6, 30));
        let progress = goal.progress(Money::from_dollars(250), date(2025, 3, 10));

        assert_eq!(progress.remaining, Money::from_dollars(750));
        assert!((progress.percent_funded - 25.0).abs() < 1e-9);
        assert!(!progress.overfunded);
        // March through June is four months
        assert_eq!(progress.monthly_needed, Some(Money::from_cents(18_750)));
    }

    #[test]
    fn test_progress_overfunded_is_clamped() {
        let goal = SavingsGoal::new("Car", Money::from_dollars(100), 2);
        let progress = goal.progress(Money::from_dollars(130), date(2025, 3, 10));

        assert_eq!(progress.percent_funded, 100.0);
        assert!(progress.overfunded);
        assert_eq!(progress.remaining, Money::zero());
        assert_eq!(progress.allocated, Money::from_dollars(130));
        assert_eq!(progress.monthly_needed, None);
    }

    #[test]
    fn test_past_target_date_needs_everything_now() {
        let goal = SavingsGoal::new("Late", Money::from_dollars(300), 1)
            .with_target_date(date(2024, 12, 31));
        let progress = goal.progress(Money::from_dollars(100), date(2025, 3, 1));
        assert_eq!(progress.monthly_needed, Some(Money::from_dollars(200)));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Paused".parse::<GoalStatus>().unwrap(), GoalStatus::Paused);
        assert_eq!("done".parse::<GoalStatus>().unwrap(), GoalStatus::Completed);
        assert!("archived".parse::<GoalStatus>().is_err());
    }
}
