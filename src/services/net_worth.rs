//! Net worth service
//!
//! Records asset snapshots and summarizes the household's current position.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{AssetType, Money, NetWorthEntry, NetWorthEntryId, Owner};
use crate::storage::Storage;

/// Totals for one owner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerTotals {
    pub assets: Money,
    pub liabilities: Money,
}

impl OwnerTotals {
    pub fn net(&self) -> Money {
        self.assets + self.liabilities
    }
}

/// The household's net worth at a date
#[derive(Debug, Clone)]
pub struct NetWorthSummary {
    pub as_of: NaiveDate,
    /// Latest entry of each asset at or before `as_of`
    pub entries: Vec<NetWorthEntry>,
    /// Every owner is present, including those with no assets
    pub by_owner: BTreeMap<Owner, OwnerTotals>,
    pub total_assets: Money,
    /// Zero or negative
    pub total_liabilities: Money,
}

impl NetWorthSummary {
    pub fn net_worth(&self) -> Money {
        self.total_assets + self.total_liabilities
    }
}

pub struct NetWorthService<'a> {
    storage: &'a Storage,
}

impl<'a> NetWorthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an asset's value on a date
    ///
    /// A second entry for the same asset on the same date replaces the first.
    pub fn record(
        &self,
        owner: Owner,
        asset_type: AssetType,
        name: &str,
        value: Money,
        as_of: NaiveDate,
        notes: Option<String>,
    ) -> BudgetResult<NetWorthEntry> {
        let mut entry = NetWorthEntry::new(owner, asset_type, name, value, as_of);
        if let Some(notes) = notes {
            entry = entry.with_notes(notes);
        }

        entry
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let (stored, replaced) = self.storage.net_worth.record(entry)?;
        self.storage.net_worth.save()?;

        let label = Some(format!("{} {}", stored.owner, stored.name));
        match replaced {
            Some(before) => self.storage.log_update(
                EntityType::NetWorthEntry,
                stored.id.to_string(),
                label,
                &before,
                &stored,
                Some(format!("value: {} -> {}", before.value, stored.value)),
            )?,
            None => self.storage.log_create(
                EntityType::NetWorthEntry,
                stored.id.to_string(),
                label,
                &stored,
            )?,
        }

        info!(id = %stored.id, owner = %stored.owner, value = %stored.value, "recorded net worth entry");
        Ok(stored)
    }

    pub fn get(&self, id: NetWorthEntryId) -> BudgetResult<Option<NetWorthEntry>> {
        self.storage.net_worth.get(id)
    }

    pub fn delete(&self, id: NetWorthEntryId) -> BudgetResult<NetWorthEntry> {
        let entry = self
            .storage
            .net_worth
            .delete(id)?
            .ok_or_else(|| BudgetError::net_worth_entry_not_found(id.to_string()))?;
        self.storage.net_worth.save()?;

        self.storage.log_delete(
            EntityType::NetWorthEntry,
            entry.id.to_string(),
            Some(format!("{} {}", entry.owner, entry.name)),
            &entry,
        )?;

        Ok(entry)
    }

    /// Full snapshot history, oldest first
    pub fn history(&self) -> BudgetResult<Vec<NetWorthEntry>> {
        self.storage.net_worth.all()
    }

    /// Current position per owner as of a date
    pub fn summary(&self, as_of: NaiveDate) -> BudgetResult<NetWorthSummary> {
        let entries = self.storage.list_net_worth_entries(as_of)?;

        let mut by_owner: BTreeMap<Owner, OwnerTotals> =
            Owner::ALL.iter().map(|o| (*o, OwnerTotals::default())).collect();
        let mut total_assets = Money::zero();
        let mut total_liabilities = Money::zero();

        for entry in &entries {
            let totals = by_owner.entry(entry.owner).or_default();
            if entry.is_liability() {
                totals.liabilities += entry.value;
                total_liabilities += entry.value;
            } else {
                totals.assets += entry.value;
                total_assets += entry.value;
            }
        }

        Ok(NetWorthSummary {
            as_of,
            entries,
            by_owner,
            total_assets,
            total_liabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::BudgetPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_same_day_record_replaces_value() {
        let (_temp, storage) = create_test_storage();
        let service = NetWorthService::new(&storage);

        let first = service
            .record(
                Owner::Joint,
                AssetType::Checking,
                "Main",
                Money::from_dollars(5_000),
                date(1, 31),
                None,
            )
            .unwrap();
        let second = service
            .record(
                Owner::Joint,
                AssetType::Checking,
                "main",
                Money::from_dollars(5_500),
                date(1, 31),
                None,
            )
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.history().unwrap().len(), 1);

        let ops: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update]);
    }

    #[test]
    fn test_positive_liability_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = NetWorthService::new(&storage);
        let err = service
            .record(
                Owner::Jeff,
                AssetType::Liability,
                "Car Loan",
                Money::from_dollars(9_000),
                date(1, 31),
                None,
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_summary_by_owner() {
        let (_temp, storage) = create_test_storage();
        let service = NetWorthService::new(&storage);

        service
            .record(Owner::Jeff, AssetType::FourOhOneK, "Fidelity", Money::from_dollars(40_000), date(1, 31), None)
            .unwrap();
        service
            .record(Owner::Joint, AssetType::RealEstate, "House", Money::from_dollars(300_000), date(1, 31), None)
            .unwrap();
        service
            .record(Owner::Joint, AssetType::Liability, "Mortgage", Money::from_dollars(-200_000), date(1, 31), None)
            .unwrap();
        // A later snapshot supersedes the earlier one
        service
            .record(Owner::Jeff, AssetType::FourOhOneK, "Fidelity", Money::from_dollars(42_000), date(2, 28), None)
            .unwrap();

        let summary = service.summary(date(3, 1)).unwrap();
        assert_eq!(summary.total_assets, Money::from_dollars(342_000));
        assert_eq!(summary.total_liabilities, Money::from_dollars(-200_000));
        assert_eq!(summary.net_worth(), Money::from_dollars(142_000));
        assert_eq!(summary.by_owner[&Owner::Jeff].net(), Money::from_dollars(42_000));
        assert_eq!(summary.by_owner[&Owner::Joint].net(), Money::from_dollars(100_000));
        assert_eq!(summary.by_owner[&Owner::Vanessa].net(), Money::zero());

        let earlier = service.summary(date(2, 1)).unwrap();
        assert_eq!(earlier.by_owner[&Owner::Jeff].assets, Money::from_dollars(40_000));
    }

    #[test]
    fn test_delete_entry() {
        let (_temp, storage) = create_test_storage();
        let service = NetWorthService::new(&storage);
        let entry = service
            .record(Owner::Vanessa, AssetType::RothIra, "Roth", Money::from_dollars(1), date(1, 1), None)
            .unwrap();

        service.delete(entry.id).unwrap();
        assert!(service.get(entry.id).unwrap().is_none());
        assert!(service.delete(entry.id).unwrap_err().is_not_found());
    }
}
