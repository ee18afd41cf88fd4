//! Ledger service
//!
//! Entry, editing and removal of income and expense transactions. Every entry
//! is validated against the category registry and the closed periods before
//! it is stored, and every change is audit-logged.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    DateRange, Money, Month, Person, Transaction, TransactionId, TransactionKind,
    INCOME_CATEGORY,
};
use crate::storage::{Storage, TransactionFilter};

/// Input for recording a new transaction
///
/// Import collaborators deliver records in this normalized shape.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub person: Person,
    pub date: NaiveDate,
    pub amount: Money,
    /// Required for expenses; income always files under Income
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

impl NewTransaction {
    pub fn income(person: Person, date: NaiveDate, amount: Money) -> Self {
        Self {
            kind: TransactionKind::Income,
            person,
            date,
            amount,
            category: None,
            subcategory: None,
            description: None,
            payment_method: None,
        }
    }

    pub fn expense(
        person: Person,
        date: NaiveDate,
        amount: Money,
        category: impl Into<String>,
        subcategory: Option<String>,
    ) -> Self {
        Self {
            kind: TransactionKind::Expense,
            person,
            date,
            amount,
            category: Some(category.into()),
            subcategory,
            description: None,
            payment_method: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field changes for an existing transaction. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub person: Option<Person>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    /// `Some(None)` clears the subcategory
    pub subcategory: Option<Option<String>>,
    pub description: Option<String>,
    /// `Some(None)` clears the payment method
    pub payment_method: Option<Option<String>>,
}

/// Service for transaction management
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store one transaction
    pub fn record(&self, input: NewTransaction) -> BudgetResult<Transaction> {
        let txn = self.prepare(input)?;
        let txn = self.storage.transactions.insert(txn)?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(describe(&txn)),
            &txn,
        )?;

        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "recorded transaction");
        Ok(txn)
    }

    /// Validate and store a batch of normalized records
    ///
    /// Every record is validated before any is stored, so a bad record leaves
    /// the ledger untouched. The error names the (1-based) record that failed.
    pub fn record_batch(&self, inputs: Vec<NewTransaction>) -> BudgetResult<Vec<Transaction>> {
        let mut prepared = Vec::with_capacity(inputs.len());
        for (idx, input) in inputs.into_iter().enumerate() {
            let txn = self.prepare(input).map_err(|e| match e {
                BudgetError::Validation(msg) => {
                    BudgetError::Validation(format!("Record {}: {}", idx + 1, msg))
                }
                other => other,
            })?;
            prepared.push(txn);
        }

        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let mut stored = Vec::with_capacity(prepared.len());
        for txn in prepared {
            stored.push(self.storage.transactions.insert(txn)?);
        }
        if let Err(e) = self.storage.transactions.save() {
            for txn in &stored {
                self.storage.transactions.delete(txn.id)?;
            }
            warn!(count = stored.len(), error = %e, "batch save failed, rows discarded");
            return Err(e);
        }

        let entries: Vec<_> = stored
            .iter()
            .map(|txn| {
                AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(describe(txn)),
                    txn,
                )
            })
            .collect();
        self.storage.audit().log_batch(&entries)?;

        info!(count = stored.len(), "recorded transaction batch");
        Ok(stored)
    }

    pub fn get(&self, id: TransactionId) -> BudgetResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by id string ("txn-12" or "12")
    pub fn find(&self, identifier: &str) -> BudgetResult<Transaction> {
        let id = TransactionId::parse(identifier)
            .map_err(|_| BudgetError::transaction_not_found(identifier))?;
        self.get(id)?
            .ok_or_else(|| BudgetError::transaction_not_found(identifier))
    }

    pub fn list(
        &self,
        range: &DateRange,
        filter: &TransactionFilter,
    ) -> BudgetResult<Vec<Transaction>> {
        self.storage.list_transactions(range, filter)
    }

    /// Apply field changes to an open-period transaction
    pub fn update(&self, id: TransactionId, changes: TransactionUpdate) -> BudgetResult<Transaction> {
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;
        self.ensure_open(before.date)?;

        let mut txn = before.clone();
        if let Some(person) = changes.person {
            txn.person = person;
        }
        if let Some(date) = changes.date {
            self.ensure_open(date)?;
            txn.date = date;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(category) = changes.category {
            txn.category = category;
        }
        if let Some(subcategory) = changes.subcategory {
            txn.subcategory = subcategory;
        }
        if let Some(description) = changes.description {
            txn.description = description;
        }
        if let Some(method) = changes.payment_method {
            txn.payment_method = method;
        }

        self.resolve_category(&mut txn)?;
        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        txn.touch();

        self.storage.transactions.update(txn.clone())?;
        self.storage.transactions.save()?;

        let mut diff = Vec::new();
        if before.date != txn.date {
            diff.push(format!("date: {} -> {}", before.date, txn.date));
        }
        if before.amount != txn.amount {
            diff.push(format!("amount: {} -> {}", before.amount, txn.amount));
        }
        if before.person != txn.person {
            diff.push(format!("person: {} -> {}", before.person, txn.person));
        }
        if before.category != txn.category || before.subcategory != txn.subcategory {
            diff.push(format!(
                "category: {} -> {}",
                category_label(&before),
                category_label(&txn)
            ));
        }
        if before.description != txn.description {
            diff.push("description changed".to_string());
        }

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(describe(&txn)),
            &before,
            &txn,
            if diff.is_empty() {
                None
            } else {
                Some(diff.join(", "))
            },
        )?;

        Ok(txn)
    }

    /// Delete an open-period transaction
    pub fn delete(&self, id: TransactionId) -> BudgetResult<Transaction> {
        let txn = self
            .get(id)?
            .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;
        self.ensure_open(txn.date)?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(describe(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    fn prepare(&self, input: NewTransaction) -> BudgetResult<Transaction> {
        self.ensure_open(input.date)?;

        let mut txn = match input.kind {
            TransactionKind::Income => {
                let mut txn = Transaction::income(input.person, input.date, input.amount);
                txn.subcategory = input.subcategory;
                txn
            }
            TransactionKind::Expense => {
                let category = input.category.ok_or_else(|| {
                    BudgetError::Validation("Expense category is required".into())
                })?;
                Transaction::expense(
                    input.person,
                    input.date,
                    input.amount,
                    category,
                    input.subcategory,
                )
            }
        };
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        txn.payment_method = input.payment_method.filter(|m| !m.trim().is_empty());

        self.resolve_category(&mut txn)?;
        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        Ok(txn)
    }

    /// Check the category against the registry and adopt its stored spelling
    fn resolve_category(&self, txn: &mut Transaction) -> BudgetResult<()> {
        if txn.is_income() {
            txn.category = INCOME_CATEGORY.to_string();
        }

        let registered = self.storage.categories.get(&txn.category)?;
        let category = match registered {
            Some(category) => category,
            // Income may be recorded before the registry is seeded
            None if txn.is_income() => return Ok(()),
            None => return Err(BudgetError::category_not_found(txn.category.trim())),
        };
        txn.category = category.name.clone();

        if let Some(sub) = &txn.subcategory {
            let canonical = category
                .find_subcategory(sub)
                .ok_or_else(|| BudgetError::subcategory_not_found(&category.name, sub.trim()))?;
            txn.subcategory = Some(canonical.to_string());
        }

        debug!(category = %txn.category, subcategory = ?txn.subcategory, "category resolved");
        Ok(())
    }

    fn ensure_open(&self, date: NaiveDate) -> BudgetResult<()> {
        let month = Month::from_date(date);
        if self.storage.periods.is_closed(month)? {
            return Err(BudgetError::Locked(format!(
                "{} is closed; reopen it to change its transactions",
                month
            )));
        }
        Ok(())
    }
}

fn category_label(txn: &Transaction) -> String {
    match &txn.subcategory {
        Some(sub) => format!("{} / {}", txn.category, sub),
        None => txn.category.clone(),
    }
}

fn describe(txn: &Transaction) -> String {
    format!("{} {} {}", txn.date, txn.person, category_label(txn))
}
