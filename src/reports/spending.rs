//! Spending Report
//!
//! A month's expenses broken down by category, subcategory or person against
//! the prior month, with spending by day of week.

use std::io::Write;

use crate::display::report::{double_separator, format_bar, separator, truncate};
use crate::error::BudgetResult;
use crate::models::Month;
use crate::services::aggregation::{AggregationService, CategoryBreakdown, DaySpending, GroupBy};
use crate::storage::Storage;

use super::ReportHeader;

#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub header: ReportHeader,
    pub breakdown: CategoryBreakdown,
    pub days: Vec<DaySpending>,
}

impl SpendingReport {
    pub fn generate(storage: &Storage, month: Month, group_by: GroupBy) -> BudgetResult<Self> {
        let service = AggregationService::new(storage);
        Ok(Self {
            header: ReportHeader::new("Spending Report", month.long_name()),
            breakdown: service.category_breakdown(month, group_by)?,
            days: service.spending_by_day_of_week(&month.date_range())?,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let b = &self.breakdown;
        let mut output = String::new();

        output.push_str(&format!("Spending Report - {}\n", b.month.long_name()));
        output.push_str(&double_separator(76));
        output.push('\n');

        if b.rows.is_empty() {
            output.push_str("No expenses this month or last.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<34} {:>13} {:>13} {:>13}\n",
            "Group",
            "This Month",
            b.month.prev().to_string(),
            "Change"
        ));
        output.push_str(&separator(76));
        output.push('\n');
        for row in &b.rows {
            output.push_str(&format!(
                "{:<34} {:>13} {:>13} {:>13}\n",
                truncate(&row.key.to_string(), 34),
                row.amount.to_string(),
                row.previous.to_string(),
                row.variance.to_string()
            ));
        }
        output.push_str(&separator(76));
        output.push('\n');
        output.push_str(&format!(
            "{:<34} {:>13} {:>13} {:>13}\n",
            "TOTAL",
            b.total.to_string(),
            b.previous_total.to_string(),
            (b.total - b.previous_total).to_string()
        ));

        output.push_str("\nBy Day of Week\n");
        let max = self
            .days
            .iter()
            .map(|d| d.amount.cents())
            .max()
            .unwrap_or(0) as f64;
        for day in &self.days {
            output.push_str(&format!(
                "  {:<4} {:>13} {:>4} txn  {}\n",
                day.weekday.to_string(),
                day.amount.to_string(),
                day.count,
                format_bar(day.amount.cents() as f64, max, 20)
            ));
        }

        output
    }

    /// Export breakdown rows as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let b = &self.breakdown;
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Group", "Amount", "Previous", "Variance"])?;
        for row in &b.rows {
            csv.write_record([
                b.month.to_string(),
                row.key.to_string(),
                row.amount.to_decimal_string(),
                row.previous.to_decimal_string(),
                row.variance.to_decimal_string(),
            ])?;
        }
        csv.write_record([
            b.month.to_string(),
            "TOTAL".to_string(),
            b.total.to_decimal_string(),
            b.previous_total.to_decimal_string(),
            (b.total - b.previous_total).to_decimal_string(),
        ])?;
        csv.flush()?;
        Ok(())
    }
}
