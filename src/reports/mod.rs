//! Reports module for Budget Master
//!
//! Each report is generated from the aggregation engine, formatted for the
//! terminal, and exported as CSV (via the `csv` crate) or plain text.

pub mod budget_vs_actual;
pub mod goals;
pub mod net_worth;
pub mod overview;
pub mod spending;
pub mod trends;

pub use budget_vs_actual::{BudgetVsActualReport, CategoryActuals, SubcategoryActuals};
pub use goals::GoalsReport;
pub use net_worth::NetWorthReport;
pub use overview::MonthlyOverviewReport;
pub use spending::SpendingReport;
pub use trends::TrendsReport;

use std::io::Write;

use chrono::{Local, NaiveDateTime};

use crate::error::{BudgetError, BudgetResult};

/// Title block shared by exported reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub title: String,
    pub period: String,
    pub generated_at: NaiveDateTime,
}

impl ReportHeader {
    pub fn new(title: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            period: period.into(),
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn generated_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Write a header and key/value fields as a two-column CSV
pub fn write_key_values_csv<W: Write>(
    writer: W,
    header: &ReportHeader,
    fields: &[(&str, String)],
) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Field", "Value"])?;
    csv.write_record(["Report", header.title.as_str()])?;
    csv.write_record(["Generated", header.generated_label().as_str()])?;
    csv.write_record(["Period", header.period.as_str()])?;
    for (key, value) in fields {
        csv.write_record([*key, value.as_str()])?;
    }
    csv.flush()
        .map_err(|e| BudgetError::Export(e.to_string()))
}

/// Write a header and key/value fields as aligned text lines
pub fn write_key_values_text<W: Write>(
    writer: &mut W,
    header: &ReportHeader,
    fields: &[(&str, String)],
) -> BudgetResult<()> {
    let width = fields
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .max("Generated".len());

    writeln!(writer, "{}", header.title)?;
    writeln!(writer, "{}", "=".repeat(header.title.len()))?;
    writeln!(writer, "{:<width$}: {}", "Generated", header.generated_label(), width = width)?;
    writeln!(writer, "{:<width$}: {}", "Period", header.period, width = width)?;
    writeln!(writer)?;
    for (key, value) in fields {
        writeln!(writer, "{:<width$}: {}", key, value, width = width)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ReportHeader {
        ReportHeader::new("Monthly Overview", "March 2025")
    }

    #[test]
    fn test_key_values_csv() {
        let mut out = Vec::new();
        write_key_values_csv(
            &mut out,
            &header(),
            &[("Total Income", "5000.00".to_string()), ("Note", "a, b".to_string())],
        )
        .unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("Field,Value\n"));
        assert!(csv.contains("Period,March 2025\n"));
        assert!(csv.contains("Total Income,5000.00\n"));
        assert!(csv.contains("Note,\"a, b\"\n"));
    }

    #[test]
    fn test_key_values_text() {
        let mut out = Vec::new();
        write_key_values_text(&mut out, &header(), &[("Net Savings", "$1200.00".into())])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Monthly Overview\n================\n"));
        assert!(text.contains("Generated  : "));
        assert!(text.contains("Net Savings: $1200.00"));
    }
}
