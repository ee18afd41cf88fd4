//! Net worth snapshot repository
//!
//! Snapshots are stored in net_worth.json. There is one row per asset per
//! snapshot date; recording the same asset on the same date replaces it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::{AssetKey, NetWorthEntry, NetWorthEntryId};

use super::file_io::{read_json, write_json_atomic};
use super::{next_id_after, read_guard, write_guard};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NetWorthData {
    #[serde(default)]
    next_id: u64,
    entries: Vec<NetWorthEntry>,
}

#[derive(Debug, Default)]
struct NetWorthTable {
    next_id: u64,
    rows: BTreeMap<NetWorthEntryId, NetWorthEntry>,
}

/// Repository for net worth history
pub struct NetWorthRepository {
    path: PathBuf,
    data: RwLock<NetWorthTable>,
}

impl NetWorthRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(NetWorthTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn load(&self) -> BudgetResult<()> {
        let file_data: NetWorthData = read_json(&self.path)?;
        let mut table = write_guard(&self.data)?;

        table.next_id =
            next_id_after(file_data.next_id, file_data.entries.iter().map(|e| e.id.value()));
        table.rows = file_data.entries.into_iter().map(|e| (e.id, e)).collect();

        Ok(())
    }

    pub fn save(&self) -> BudgetResult<()> {
        let table = read_guard(&self.data)?;

        let mut entries: Vec<_> = table.rows.values().cloned().collect();
        entries.sort_by(|a, b| a.as_of.cmp(&b.as_of).then(a.id.cmp(&b.id)));

        write_json_atomic(
            &self.path,
            &NetWorthData {
                next_id: table.next_id,
                entries,
            },
        )
    }

    pub fn get(&self, id: NetWorthEntryId) -> BudgetResult<Option<NetWorthEntry>> {
        Ok(read_guard(&self.data)?.rows.get(&id).cloned())
    }

    /// Store a snapshot
    ///
    /// If the asset already has a row on the same date, that row keeps its id
    /// and takes the new value. The replaced row is returned alongside the
    /// stored one.
    pub fn record(
        &self,
        mut entry: NetWorthEntry,
    ) -> BudgetResult<(NetWorthEntry, Option<NetWorthEntry>)> {
        let mut table = write_guard(&self.data)?;
        let key = entry.key();

        let existing = table
            .rows
            .values()
            .find(|e| e.as_of == entry.as_of && e.key() == key)
            .cloned();

        match existing {
            Some(previous) => {
                entry.id = previous.id;
                entry.created_at = previous.created_at;
                table.rows.insert(entry.id, entry.clone());
                Ok((entry, Some(previous)))
            }
            None => {
                entry.id = NetWorthEntryId::new(table.next_id);
                table.next_id += 1;
                table.rows.insert(entry.id, entry.clone());
                Ok((entry, None))
            }
        }
    }

    pub fn delete(&self, id: NetWorthEntryId) -> BudgetResult<Option<NetWorthEntry>> {
        Ok(write_guard(&self.data)?.rows.remove(&id))
    }

    /// Every row, oldest snapshot first
    pub fn all(&self) -> BudgetResult<Vec<NetWorthEntry>> {
        let table = read_guard(&self.data)?;
        let mut entries: Vec<_> = table.rows.values().cloned().collect();
        entries.sort_by(|a, b| a.as_of.cmp(&b.as_of).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    /// The latest entry of each asset dated at or before `as_of`
    pub fn latest_as_of(&self, as_of: NaiveDate) -> BudgetResult<Vec<NetWorthEntry>> {
        let table = read_guard(&self.data)?;
        let mut latest: HashMap<AssetKey, &NetWorthEntry> = HashMap::new();

        for entry in table.rows.values().filter(|e| e.as_of <= as_of) {
            let key = entry.key();
            let newer = latest
                .get(&key)
                .map_or(true, |current| (entry.as_of, entry.id) > (current.as_of, current.id));
            if newer {
                latest.insert(key, entry);
            }
        }

        let mut entries: Vec<_> = latest.into_values().cloned().collect();
        entries.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(entries)
    }

    /// Distinct snapshot dates, ascending
    pub fn snapshot_dates(&self) -> BudgetResult<Vec<NaiveDate>> {
        let table = read_guard(&self.data)?;
        let dates: BTreeSet<_> = table.rows.values().map(|e| e.as_of).collect();
        Ok(dates.into_iter().collect())
    }
}
