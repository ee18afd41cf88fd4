//! Goals Report
//!
//! Funding progress for every savings goal.

use std::io::Write;

use chrono::NaiveDate;

use crate::display::format_goal_list;
use crate::error::BudgetResult;
use crate::models::{GoalStatus, Money};
use crate::services::goal::{GoalService, GoalWithProgress};
use crate::storage::Storage;

use super::ReportHeader;

#[derive(Debug, Clone)]
pub struct GoalsReport {
    pub header: ReportHeader,
    pub goals: Vec<GoalWithProgress>,
}

impl GoalsReport {
    pub fn generate(
        storage: &Storage,
        status: Option<GoalStatus>,
        today: NaiveDate,
    ) -> BudgetResult<Self> {
        Ok(Self {
            header: ReportHeader::new("Savings Goals", format!("as of {}", today)),
            goals: GoalService::new(storage).progress_all(status, today)?,
        })
    }

    pub fn total_allocated(&self) -> Money {
        self.goals.iter().map(|g| g.progress.allocated).sum()
    }

    pub fn total_target(&self) -> Money {
        self.goals.iter().map(|g| g.goal.target_amount).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format_goal_list(&self.goals);
        if !self.goals.is_empty() {
            output.push_str(&format!(
                "\nTotal allocated {} of {}\n",
                self.total_allocated(),
                self.total_target()
            ));
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Goal",
            "Priority",
            "Status",
            "Target",
            "Target Date",
            "Allocated",
            "Remaining",
            "Percent Funded",
            "Overfunded",
            "Monthly Needed",
        ])?;
        for GoalWithProgress { goal, progress } in &self.goals {
            csv.write_record([
                goal.name.clone(),
                goal.priority.to_string(),
                goal.status.to_string(),
                goal.target_amount.to_decimal_string(),
                goal.target_date.map(|d| d.to_string()).unwrap_or_default(),
                progress.allocated.to_decimal_string(),
                progress.remaining.to_decimal_string(),
                format!("{:.1}", progress.percent_funded),
                progress.overfunded.to_string(),
                progress
                    .monthly_needed
                    .map(|m| m.to_decimal_string())
                    .unwrap_or_default(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}
