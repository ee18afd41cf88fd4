//! Period service
//!
//! Resolves month references relative to today and manages closed months.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::Month;
use crate::storage::Storage;

pub struct PeriodService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> PeriodService<'a> {
    pub fn new(storage: &'a Storage, today: NaiveDate) -> Self {
        Self { storage, today }
    }

    pub fn current_month(&self) -> Month {
        Month::from_date(self.today)
    }

    /// Parse a month reference or fall back to the current month
    pub fn parse_or_current(&self, month: Option<&str>) -> BudgetResult<Month> {
        match month {
            Some(s) => self.parse(s),
            None => Ok(self.current_month()),
        }
    }

    /// Parse a month reference
    ///
    /// Formats supported:
    /// - "2025-03"
    /// - "March", "mar" (in the current year)
    /// - "current", "last", "next"
    pub fn parse(&self, s: &str) -> BudgetResult<Month> {
        let lower = s.trim().to_lowercase();

        match lower.as_str() {
            "current" | "now" | "this" => return Ok(self.current_month()),
            "last" | "previous" | "prev" => return Ok(self.current_month().prev()),
            "next" => return Ok(self.current_month().next()),
            _ => {}
        }

        if let Some(month) = self.parse_month_name(&lower) {
            return Ok(month);
        }

        Month::parse(s.trim())
            .map_err(|_| BudgetError::Validation(format!("Invalid month: {}", s.trim())))
    }

    fn parse_month_name(&self, s: &str) -> Option<Month> {
        const NAMES: [&str; 12] = [
            "january",
            "february",
            "march",
            "april",
            "may",
            "june",
            "july",
            "august",
            "september",
            "october",
            "november",
            "december",
        ];

        if s.len() < 3 {
            return None;
        }
        let index = NAMES.iter().position(|name| name.starts_with(s))?;
        Month::new(self.today.year(), index as u32 + 1)
    }

    /// The `count` months ending with `last`, oldest first
    pub fn trailing_months(&self, last: Month, count: u32) -> Vec<Month> {
        let first = last.minus_months(count.saturating_sub(1));
        Month::span(first, last)
    }

    pub fn is_closed(&self, month: Month) -> BudgetResult<bool> {
        self.storage.periods.is_closed(month)
    }

    /// Fail with `Locked` if the month is closed
    pub fn ensure_open(&self, month: Month) -> BudgetResult<()> {
        if self.is_closed(month)? {
            return Err(BudgetError::Locked(month.to_string()));
        }
        Ok(())
    }

    /// Close a month to further transaction changes
    pub fn close(&self, month: Month) -> BudgetResult<bool> {
        if !self.storage.periods.close(month)? {
            return Ok(false);
        }
        self.storage.periods.save()?;
        self.storage.log_create(
            EntityType::ClosedPeriod,
            month.to_string(),
            Some(month.long_name()),
            &month,
        )?;
        info!(%month, "closed period");
        Ok(true)
    }

    /// Reopen a closed month
    pub fn reopen(&self, month: Month) -> BudgetResult<bool> {
        if !self.storage.periods.reopen(month)? {
            return Ok(false);
        }
        self.storage.periods.save()?;
        self.storage.log_delete(
            EntityType::ClosedPeriod,
            month.to_string(),
            Some(month.long_name()),
            &month,
        )?;
        info!(%month, "reopened period");
        Ok(true)
    }

    pub fn closed_months(&self) -> BudgetResult<Vec<Month>> {
        self.storage.periods.closed_months()
    }
}
