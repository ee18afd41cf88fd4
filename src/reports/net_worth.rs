//! Net Worth Report
//!
//! Current totals per owner, assets against liabilities, the asset rows
//! behind them and, optionally, the trend leading up to the report date.

use std::io::Write;

use chrono::NaiveDate;

use crate::display::report::{
    double_separator, format_date, separator, truncate, DEFAULT_DATE_FORMAT,
};
use crate::error::BudgetResult;
use crate::models::Owner;
use crate::services::aggregation::{AggregationService, NetWorthPoint};
use crate::services::net_worth::{NetWorthService, NetWorthSummary};
use crate::storage::Storage;

use super::ReportHeader;

#[derive(Debug, Clone)]
pub struct NetWorthReport {
    pub header: ReportHeader,
    pub summary: NetWorthSummary,
    /// Empty unless a trend start was requested
    pub trend: Vec<NetWorthPoint>,
    /// strftime pattern for dates in terminal output; CSV stays ISO
    pub date_format: String,
}

impl NetWorthReport {
    /// Generate the report as of a date, with the trend from `trend_start` if given
    pub fn generate(
        storage: &Storage,
        as_of: NaiveDate,
        trend_start: Option<NaiveDate>,
    ) -> BudgetResult<Self> {
        let summary = NetWorthService::new(storage).summary(as_of)?;
        let trend = match trend_start {
            Some(start) => AggregationService::new(storage).net_worth_trend(start, as_of)?,
            None => Vec::new(),
        };

        Ok(Self {
            header: ReportHeader::new("Net Worth Report", format!("as of {}", as_of)),
            summary,
            trend,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        })
    }

    /// Use the configured date format for terminal output
    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let s = &self.summary;
        let mut output = String::new();

        output.push_str(&format!(
            "Net Worth - as of {}\n",
            format_date(s.as_of, &self.date_format)
        ));
        output.push_str(&double_separator(70));
        output.push('\n');

        if s.entries.is_empty() {
            output.push_str("No net worth entries recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<8} {:<24} {:<18} {:>14}\n",
            "Owner", "Asset", "Type", "Value"
        ));
        output.push_str(&separator(70));
        output.push('\n');
        for entry in &s.entries {
            output.push_str(&format!(
                "{:<8} {:<24} {:<18} {:>14}\n",
                entry.owner.to_string(),
                truncate(&entry.name, 24),
                entry.asset_type.label(),
                entry.value.to_string()
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            "Owner", "Assets", "Liabilities", "Net"
        ));
        output.push_str(&separator(70));
        output.push('\n');
        for owner in Owner::ALL {
            let totals = &s.by_owner[&owner];
            output.push_str(&format!(
                "{:<8} {:>14} {:>14} {:>14}\n",
                owner.to_string(),
                totals.assets.to_string(),
                totals.liabilities.to_string(),
                totals.net().to_string()
            ));
        }
        output.push_str(&separator(70));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            "TOTAL",
            s.total_assets.to_string(),
            s.total_liabilities.to_string(),
            s.net_worth().to_string()
        ));

        if !self.trend.is_empty() {
            output.push_str("\nTrend\n");
            for point in &self.trend {
                output.push_str(&format!(
                    "  {}  {:>14}\n",
                    format_date(point.date, &self.date_format),
                    point.total.to_string()
                ));
            }
        }

        output
    }

    /// Export asset rows, then per-owner and household totals
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let s = &self.summary;
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(["Generated", self.header.generated_label().as_str(), "", "", ""])?;
        csv.write_record(["As Of", s.as_of.to_string().as_str(), "", "", ""])?;
        csv.write_record(["Owner", "Asset", "Type", "Value", "As Of"])?;
        for entry in &s.entries {
            csv.write_record([
                entry.owner.to_string(),
                entry.name.clone(),
                entry.asset_type.label().to_string(),
                entry.value.to_decimal_string(),
                entry.as_of.to_string(),
            ])?;
        }
        for owner in Owner::ALL {
            let totals = &s.by_owner[&owner];
            csv.write_record([
                owner.to_string(),
                "TOTAL".to_string(),
                String::new(),
                totals.net().to_decimal_string(),
                String::new(),
            ])?;
        }
        csv.write_record([
            "Household".to_string(),
            "NET WORTH".to_string(),
            String::new(),
            s.net_worth().to_decimal_string(),
            String::new(),
        ])?;
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{AssetType, Money};
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

    fn setup(storage: &Storage) {
        let service = NetWorthService::new(storage);
        service
            .record(Owner::Joint, AssetType::RealEstate, "House", Money::from_dollars(300_000), date(1, 31), None)
            .unwrap();
        service
            .record(Owner::Joint, AssetType::Liability, "Mortgage", Money::from_dollars(-250_000), date(1, 31), None)
            .unwrap();
        service
            .record(Owner::Vanessa, AssetType::RothIra, "Roth", Money::from_dollars(20_000), date(2, 28), None)
            .unwrap();
    }

    #[test]
    fn test_terminal_format() {
        let (_temp, storage) = create_test_storage();
        setup(&storage);
        let report = NetWorthReport::generate(&storage, date(3, 1), Some(date(1, 1))).unwrap();
        let output = report.format_terminal();

        assert!(output.contains("Debt/Liability"));
        assert!(output.contains("$70000.00"));
        assert!(output.contains("Trend"));
        assert_eq!(report.trend.len(), 2);
    }

    #[test]
    fn test_terminal_uses_date_format() {
        let (_temp, storage) = create_test_storage();
        setup(&storage);
        let report = NetWorthReport::generate(&storage, date(3, 1), Some(date(1, 1)))
            .unwrap()
            .with_date_format("%d/%m/%Y");
        let output = report.format_terminal();

        assert!(output.contains("Net Worth - as of 01/03/2025"));
        assert!(output.contains("  31/01/2025  "));
    }

    #[test]
    fn test_csv_export() {
        let (_temp, storage) = create_test_storage();
        setup(&storage);
        let report = NetWorthReport::generate(&storage, date(3, 1), None).unwrap();
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.contains("Owner,Asset,Type,Value,As Of\n"));
        assert!(csv.contains("Joint,Mortgage,Debt/Liability,-250000.00,2025-01-31\n"));
        assert!(csv.contains("Joint,TOTAL,,50000.00,\n"));
        assert!(csv.contains("Household,NET WORTH,,70000.00,\n"));
    }

    #[test]
    fn test_empty() {
        let (_temp, storage) = create_test_storage();
        let report = NetWorthReport::generate(&storage, date(3, 1), None).unwrap();
        assert!(report.format_terminal().contains("No net worth entries"));
    }
}
