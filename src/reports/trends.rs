//! Budget Trends Report
//!
//! Income, spending and savings month by month, with averages over the span.

use std::io::Write;

use crate::display::report::{double_separator, format_rate, separator};
use crate::error::BudgetResult;
use crate::models::Month;
use crate::services::aggregation::{AggregationService, MonthlyTrend};
use crate::storage::Storage;

use super::{write_key_values_text, ReportHeader};

#[derive(Debug, Clone)]
pub struct TrendsReport {
    pub header: ReportHeader,
    pub trend: MonthlyTrend,
}

impl TrendsReport {
    pub fn generate(storage: &Storage, first: Month, last: Month) -> BudgetResult<Self> {
        let trend = AggregationService::new(storage).monthly_trend(first, last)?;
        Ok(Self {
            header: ReportHeader::new("Budget Trends Report", format!("{} to {}", first, last)),
            trend,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Budget Trends - {} to {}\n",
            self.trend.first.long_name(),
            self.trend.last.long_name()
        ));
        output.push_str(&double_separator(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14} {:>8}\n",
            "Month", "Income", "Expenses", "Net Savings", "Rate"
        ));
        output.push_str(&separator(64));
        output.push('\n');

        for row in &self.trend.rows {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14} {:>8}\n",
                row.month.to_string(),
                row.income.to_string(),
                row.expenses.to_string(),
                row.net_savings.to_string(),
                format_rate(row.savings_rate)
            ));
        }

        output.push_str(&separator(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14} {:>8}\n",
            "Average",
            self.trend.average_income.to_string(),
            self.trend.average_expenses.to_string(),
            self.trend.average_net_savings.to_string(),
            format_rate(self.trend.average_savings_rate)
        ));

        output
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Months", self.trend.rows.len().to_string()),
            ("Average Income", self.trend.average_income.to_decimal_string()),
            ("Average Expenses", self.trend.average_expenses.to_decimal_string()),
            ("Average Net Savings", self.trend.average_net_savings.to_decimal_string()),
            ("Average Savings Rate", format_rate(self.trend.average_savings_rate)),
        ]
    }

    /// Export the averages followed by the monthly series as text
    pub fn export_text<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        write_key_values_text(writer, &self.header, &self.fields())?;
        writeln!(writer)?;
        writeln!(writer, "Monthly Detail")?;
        for row in &self.trend.rows {
            writeln!(
                writer,
                "{}: income {}, expenses {}, net {}, rate {}",
                row.month,
                row.income.to_decimal_string(),
                row.expenses.to_decimal_string(),
                row.net_savings.to_decimal_string(),
                format_rate(row.savings_rate)
            )?;
        }
        Ok(())
    }

    /// Export one CSV row per month
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Income", "Expenses", "Net Savings", "Savings Rate"])?;
        for row in &self.trend.rows {
            csv.write_record([
                row.month.to_string(),
                row.income.to_decimal_string(),
                row.expenses.to_decimal_string(),
                row.net_savings.to_decimal_string(),
                format!("{:.4}", row.savings_rate),
            ])?;
        }
        csv.write_record([
            "Average".to_string(),
            self.trend.average_income.to_decimal_string(),
            self.trend.average_expenses.to_decimal_string(),
            self.trend.average_net_savings.to_decimal_string(),
            format!("{:.4}", self.trend.average_savings_rate),
        ])?;
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{Money, Person, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn report() -> (TempDir, TrendsReport) {
        let (temp, storage) = create_test_storage();
        let d = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        storage
            .transactions
            .insert(Transaction::income(Person::Vanessa, d, Money::from_dollars(4_000)))
            .unwrap();
        storage
            .transactions
            .insert(Transaction::expense(Person::Jeff, d, Money::from_dollars(3_000), "Food", None))
            .unwrap();
        let report = TrendsReport::generate(
            &storage,
            Month::new(2025, 1).unwrap(),
            Month::new(2025, 2).unwrap(),
        )
        .unwrap();
        (temp, report)
    }

    #[test]
    fn test_text_export() {
        let (_temp, report) = report();
        let mut out = Vec::new();
        report.export_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Budget Trends Report\n"));
        assert!(text.contains("Generated"));
        assert!(text.contains("Period              : 2025-01 to 2025-02"));
        assert!(text.contains("Average Net Savings : 500.00"));
        assert!(text.contains("2025-01: income 0.00"));
    }

    #[test]
    fn test_csv_export() {
        let (_temp, report) = report();
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("2025-02,4000.00,3000.00,1000.00,0.2500"));
        assert!(csv.contains("Average,2000.00,1500.00,500.00,0.2500"));
    }

    #[test]
    fn test_terminal() {
        let (_temp, report) = report();
        let output = report.format_terminal();
        assert!(output.contains("January 2025"));
        assert!(output.contains("Average"));
    }
}
