//! Application context handed to every command handler

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::config::{BudgetPaths, Settings};
use crate::error::BudgetResult;
use crate::storage::Storage;

/// Paths, settings, loaded storage and the date commands treat as today
pub struct AppContext {
    pub paths: BudgetPaths,
    pub settings: Settings,
    pub storage: Storage,
    pub today: NaiveDate,
}

impl AppContext {
    /// Resolve paths (an explicit data directory wins), then load settings and storage
    pub fn load(data_dir: Option<PathBuf>) -> BudgetResult<Self> {
        let paths = match data_dir {
            Some(dir) => BudgetPaths::with_base_dir(dir),
            None => BudgetPaths::new()?,
        };
        Self::with_paths(paths, Local::now().date_naive())
    }

    pub fn with_paths(paths: BudgetPaths, today: NaiveDate) -> BudgetResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let storage = Storage::open(paths.clone())?;
        debug!(base = %paths.base_dir().display(), %today, "context ready");
        Ok(Self {
            paths,
            settings,
            storage,
            today,
        })
    }
}
