//! Transaction repository for JSON storage
//!
//! Manages loading and saving income and expense entries to transactions.json

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::{DateRange, Person, Transaction, TransactionId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};
use super::{next_id_after, read_guard, write_guard};

/// Narrows a transaction listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub person: Option<Person>,
    /// Matched case-insensitively
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn income() -> Self {
        Self {
            kind: Some(TransactionKind::Income),
            ..Self::default()
        }
    }

    pub fn expenses() -> Self {
        Self {
            kind: Some(TransactionKind::Expense),
            ..Self::default()
        }
    }

    pub fn for_person(mut self, person: Person) -> Self {
        self.person = Some(person);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |k| txn.kind == k)
            && self.person.map_or(true, |p| txn.person == p)
            && self
                .category
                .as_deref()
                .map_or(true, |c| txn.category.eq_ignore_ascii_case(c))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default)]
    next_id: u64,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
struct TransactionTable {
    next_id: u64,
    rows: BTreeMap<TransactionId, Transaction>,
}

/// Repository for income and expense persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<TransactionTable>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(TransactionTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut table = write_guard(&self.data)?;

        table.next_id = next_id_after(
            file_data.next_id,
            file_data.transactions.iter().map(|t| t.id.value()),
        );
        table.rows = file_data
            .transactions
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(())
    }

    /// Save transactions to disk, ordered by date
    pub fn save(&self) -> BudgetResult<()> {
        let table = read_guard(&self.data)?;

        let mut transactions: Vec<_> = table.rows.values().cloned().collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let file_data = TransactionData {
            next_id: table.next_id,
            transactions,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: TransactionId) -> BudgetResult<Option<Transaction>> {
        Ok(read_guard(&self.data)?.rows.get(&id).cloned())
    }

    /// Store a new transaction, assigning its id
    pub fn insert(&self, mut txn: Transaction) -> BudgetResult<Transaction> {
        let mut table = write_guard(&self.data)?;
        txn.id = TransactionId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(txn.id, txn.clone());
        Ok(txn)
    }

    /// Replace an existing transaction. Returns false if the id is unknown.
    pub fn update(&self, txn: Transaction) -> BudgetResult<bool> {
        let mut table = write_guard(&self.data)?;
        match table.rows.get_mut(&txn.id) {
            Some(existing) => {
                *existing = txn;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> BudgetResult<Option<Transaction>> {
        Ok(write_guard(&self.data)?.rows.remove(&id))
    }

    /// Transactions dated within `range` that match `filter`, by date then id
    pub fn list(
        &self,
        range: &DateRange,
        filter: &TransactionFilter,
    ) -> BudgetResult<Vec<Transaction>> {
        let table = read_guard(&self.data)?;
        let mut transactions: Vec<_> = table
            .rows
            .values()
            .filter(|t| range.contains(t.date) && filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Number of expenses filed under a category, or one of its subcategories
    pub fn count_using(&self, category: &str, subcategory: Option<&str>) -> BudgetResult<usize> {
        let table = read_guard(&self.data)?;
        Ok(table
            .rows
            .values()
            .filter(|t| t.is_expense() && t.category.eq_ignore_ascii_case(category))
            .filter(|t| match subcategory {
                Some(sub) => t
                    .subcategory
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(sub)),
                None => true,
            })
            .count())
    }

    pub fn count(&self) -> BudgetResult<usize> {
        Ok(read_guard(&self.data)?.rows.len())
    }
}
