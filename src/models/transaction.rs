//! Transaction model
//!
//! Income and expense entries share one record shape. Income is always
//! positive. Expenses are positive outflows, and a negative expense is a
//! refund or reversal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::INCOME_CATEGORY;
use super::ids::TransactionId;
use super::money::Money;
use super::person::Person;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A single income or expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the repository when the transaction is first stored
    pub id: TransactionId,

    pub kind: TransactionKind,

    /// Household member who earned or spent the money
    pub person: Person,

    pub amount: Money,

    pub date: NaiveDate,

    pub category: String,

    /// None means the expense falls in the uncategorized bucket
    #[serde(default)]
    pub subcategory: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub payment_method: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    fn new(
        kind: TransactionKind,
        person: Person,
        date: NaiveDate,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(0),
            kind,
            person,
            amount,
            date,
            category: category.into(),
            subcategory: None,
            description: String::new(),
            payment_method: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an income entry under the Income category
    pub fn income(person: Person, date: NaiveDate, amount: Money) -> Self {
        Self::new(TransactionKind::Income, person, date, amount, INCOME_CATEGORY)
    }

    /// Create an expense entry
    pub fn expense(
        person: Person,
        date: NaiveDate,
        amount: Money,
        category: impl Into<String>,
        subcategory: Option<String>,
    ) -> Self {
        let mut txn = Self::new(TransactionKind::Expense, person, date, amount, category);
        txn.subcategory = subcategory;
        txn
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// A negative expense
    pub fn is_refund(&self) -> bool {
        self.is_expense() && self.amount.is_negative()
    }

    /// Mark the record as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction shape
    ///
    /// Registry membership of the category is checked by the ledger service.
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        match self.kind {
            TransactionKind::Income if !self.amount.is_positive() => {
                return Err(TransactionValidationError::NonPositiveIncome(self.amount));
            }
            TransactionKind::Expense if self.amount.is_zero() => {
                return Err(TransactionValidationError::ZeroExpense);
            }
            _ => {}
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        if matches!(&self.subcategory, Some(sub) if sub.trim().is_empty()) {
            return Err(TransactionValidationError::BlankSubcategory);
        }

        if self.description.len() > 500 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.person,
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveIncome(Money),
    ZeroExpense,
    MissingCategory,
    BlankSubcategory,
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveIncome(amount) => {
                write!(f, "Income amount must be positive, got {}", amount)
            }
            Self::ZeroExpense => write!(f, "Expense amount cannot be zero"),
            Self::MissingCategory => write!(f, "Transaction category is required"),
            Self::BlankSubcategory => write!(f, "Subcategory cannot be blank"),
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 500)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_income_defaults_to_income_category() {
        let txn = Transaction::income(Person::Jeff, date(), Money::from_dollars(2500));
        assert!(txn.is_income());
        assert_eq!(txn.category, INCOME_CATEGORY);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_income_must_be_positive() {
        let txn = Transaction::income(Person::Vanessa, date(), Money::from_cents(-100));
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveIncome(
                Money::from_cents(-100)
            ))
        );
    }

    #[test]
    fn test_refund_is_valid_expense() {
        let refund = Transaction::expense(
            Person::Jeff,
            date(),
            Money::from_cents(-2000),
            "Food",
            Some("Groceries".into()),
        );
        assert!(refund.is_refund());
        assert!(refund.validate().is_ok());

        let zero = Transaction::expense(Person::Jeff, date(), Money::zero(), "Food", None);
        assert_eq!(zero.validate(), Err(TransactionValidationError::ZeroExpense));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let txn = Transaction::expense(Person::Jeff, date(), Money::from_cents(100), " ", None);
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingCategory));

        let txn = Transaction::expense(
            Person::Jeff,
            date(),
            Money::from_cents(100),
            "Food",
            Some("".into()),
        );
        assert_eq!(txn.validate(), Err(TransactionValidationError::BlankSubcategory));
    }

    #[test]
    fn test_display() {
        let txn = Transaction::expense(
            Person::Vanessa,
            date(),
            Money::from_cents(4599),
            "Utilities",
            None,
        )
        .with_description("Electric bill");
        assert_eq!(format!("{}", txn), "2025-03-14 Vanessa Utilities $45.99");
    }

    #[test]
    fn test_serialization() {
        let txn = Transaction::expense(
            Person::Jeff,
            date(),
            Money::from_cents(1250),
            "Food",
            Some("Dining Out".into()),
        )
        .with_payment_method("Credit Card");

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"kind\":\"expense\""));
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }
}
