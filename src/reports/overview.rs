//! Monthly Overview Report
//!
//! The month at a glance: income and spending per person, savings rate, top
//! categories and the pace of spending so far.

use std::io::Write;

use chrono::NaiveDate;

use crate::config::{Household, Settings};
use crate::display::report::{double_separator, format_bar, format_rate, separator};
use crate::error::BudgetResult;
use crate::models::{Money, Month, Person};
use crate::services::aggregation::{AggregationService, MonthlySummary, QuickStats};
use crate::storage::Storage;

use super::{write_key_values_csv, write_key_values_text, ReportHeader};

const WIDTH: usize = 60;

#[derive(Debug, Clone)]
pub struct MonthlyOverviewReport {
    pub header: ReportHeader,
    pub summary: MonthlySummary,
    pub stats: QuickStats,
    household: Household,
    currency: String,
}

impl MonthlyOverviewReport {
    /// Generate the overview for a month
    pub fn generate(
        storage: &Storage,
        settings: &Settings,
        month: Month,
        today: NaiveDate,
    ) -> BudgetResult<Self> {
        let service =
            AggregationService::new(storage).with_top_limit(settings.top_categories_limit);

        Ok(Self {
            header: ReportHeader::new("Monthly Overview", month.long_name()),
            summary: service.monthly_summary(month)?,
            stats: service.quick_stats(month, today)?,
            household: settings.household.clone(),
            currency: settings.currency_symbol.clone(),
        })
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let s = &self.summary;
        let mut output = String::new();

        output.push_str(&format!("Monthly Overview - {}\n", s.month.long_name()));
        output.push_str(&double_separator(WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<24} {:>14}\n", "Total Income", self.money(s.total_income)));
        for person in Person::ALL {
            output.push_str(&format!(
                "  {:<22} {:>14}\n",
                self.household.name_of(person),
                self.money(s.income_by_person[&person])
            ));
        }
        output.push_str(&format!(
            "{:<24} {:>14}\n",
            "Total Expenses",
            self.money(s.total_expenses)
        ));
        for person in Person::ALL {
            output.push_str(&format!(
                "  {:<22} {:>14}\n",
                self.household.name_of(person),
                self.money(s.expenses_by_person[&person])
            ));
        }
        output.push_str(&separator(WIDTH));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>14}\n", "Net Savings", self.money(s.net_savings)));
        output.push_str(&format!("{:<24} {:>14}\n", "Savings Rate", format_rate(s.savings_rate)));

        output.push_str("\nTop Categories\n");
        if s.top_categories.is_empty() {
            output.push_str("  (no expenses)\n");
        }
        let max = s
            .top_categories
            .first()
            .map_or(0.0, |(_, amount)| amount.cents() as f64);
        for (name, amount) in &s.top_categories {
            output.push_str(&format!(
                "  {:<20} {:>14}  {}\n",
                name,
                self.money(*amount),
                format_bar(amount.cents() as f64, max, 16)
            ));
        }

        let st = &self.stats;
        output.push_str("\nThis Month\n");
        output.push_str(&format!(
            "  {:<22} {:>14}\n",
            "Days",
            format!("{} of {}", st.days_elapsed, st.days_in_month)
        ));
        output.push_str(&format!("  {:<22} {:>14}\n", "Daily Average", self.money(st.daily_average)));
        output.push_str(&format!(
            "  {:<22} {:>14}\n",
            "Projected Spending",
            self.money(st.projected_spend)
        ));
        output.push_str(&format!("  {:<22} {:>14}\n", "Days Remaining", st.days_remaining));

        output
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let s = &self.summary;
        let mut fields = vec![
            ("Total Income", s.total_income.to_decimal_string()),
            ("Total Expenses", s.total_expenses.to_decimal_string()),
            ("Net Savings", s.net_savings.to_decimal_string()),
            ("Savings Rate", format_rate(s.savings_rate)),
            ("Jeff Income", s.income_by_person[&Person::Jeff].to_decimal_string()),
            ("Vanessa Income", s.income_by_person[&Person::Vanessa].to_decimal_string()),
            ("Jeff Expenses", s.expenses_by_person[&Person::Jeff].to_decimal_string()),
            ("Vanessa Expenses", s.expenses_by_person[&Person::Vanessa].to_decimal_string()),
            ("Days In Month", self.stats.days_in_month.to_string()),
            ("Daily Average", self.stats.daily_average.to_decimal_string()),
            ("Projected Spending", self.stats.projected_spend.to_decimal_string()),
            ("Days Remaining", self.stats.days_remaining.to_string()),
        ];
        if !s.top_categories.is_empty() {
            let top = s
                .top_categories
                .iter()
                .map(|(name, amount)| format!("{} {}", name, amount.to_decimal_string()))
                .collect::<Vec<_>>()
                .join("; ");
            fields.push(("Top Categories", top));
        }
        fields
    }

    /// Export the summary fields as key/value CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        write_key_values_csv(writer, &self.header, &self.fields())
    }

    /// Export the summary fields as key/value text
    pub fn export_text<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        write_key_values_text(writer, &self.header, &self.fields())
    }
}
