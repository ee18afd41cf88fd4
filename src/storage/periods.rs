//! Closed period repository
//!
//! A closed month's transactions can no longer be added, edited or deleted.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::Month;

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PeriodData {
    closed: BTreeSet<Month>,
}

pub struct PeriodRepository {
    path: PathBuf,
    closed: RwLock<BTreeSet<Month>>,
}

impl PeriodRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            closed: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: PeriodData = read_json(&self.path)?;
        *write_guard(&self.closed)? = file_data.closed;
        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let closed = read_guard(&self.closed)?;
        write_json_atomic(
            &self.path,
            &PeriodData {
                closed: closed.clone(),
            },
        )
    }

    pub fn is_closed(&self, month: Month) -> BudgetResult<bool> {
        Ok(read_guard(&self.closed)?.contains(&month))
    }

    /// Returns false if the month was already closed
    pub fn close(&self, month: Month) -> BudgetResult<bool> {
        Ok(write_guard(&self.closed)?.insert(month))
    }

    /// Returns false if the month was not closed
    pub fn reopen(&self, month: Month) -> BudgetResult<bool> {
        Ok(write_guard(&self.closed)?.remove(&month))
    }

    /// Closed months, oldest first
    pub fn closed_months(&self) -> BudgetResult<Vec<Month>> {
        Ok(read_guard(&self.closed)?.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_close_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("periods.json");
        let repo = PeriodRepository::new(path.clone());
        let march = Month::new(2025, 3).unwrap();

        assert!(repo.close(march).unwrap());
        assert!(!repo.close(march).unwrap());
        repo.save().unwrap();

        let reloaded = PeriodRepository::new(path);
        reloaded.load().unwrap();
        assert!(reloaded.is_closed(march).unwrap());
        assert!(reloaded.reopen(march).unwrap());
        assert!(!reloaded.is_closed(march).unwrap());
        assert!(!reloaded.reopen(march).unwrap());
    }
}
