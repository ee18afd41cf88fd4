//! CLI commands for reports
//!
//! Provides commands for generating and exporting the household reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use super::{parse_date, parse_date_or};
use crate::context::AppContext;
use crate::error::{BudgetError, BudgetResult};
use crate::models::GoalStatus;
use crate::reports::{
    BudgetVsActualReport, GoalsReport, MonthlyOverviewReport, NetWorthReport, SpendingReport,
    TrendsReport,
};
use crate::services::{GroupBy, PeriodService};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses, savings rate and quick stats for a month
    Overview {
        /// Month (e.g., "2025-03", "march", "last"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Export the summary fields to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Export the summary fields to a text file
        #[arg(long)]
        text: Option<PathBuf>,
    },

    /// Spending grouped by category, subcategory or person against last month
    #[command(alias = "spending")]
    Breakdown {
        #[arg(short, long)]
        month: Option<String>,

        /// category, subcategory or person
        #[arg(short, long, default_value = "category")]
        by: GroupBy,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Month-by-month income, spending and savings
    Trends {
        /// Number of months (defaults to the trend_months setting)
        #[arg(short = 'n', long)]
        months: Option<u32>,

        /// Last month of the series; defaults to the current month
        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        text: Option<PathBuf>,
    },

    /// Net worth per owner as of a date
    #[command(name = "networth", alias = "net-worth")]
    NetWorth {
        /// As-of date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Include the trend of snapshot totals since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Budget targets against actual spending per person
    #[command(alias = "budget-vs-actual")]
    Budget {
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Savings goal progress
    Goals {
        #[arg(short, long)]
        status: Option<GoalStatus>,

        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(ctx: &AppContext, cmd: ReportCommands) -> BudgetResult<()> {
    let periods = PeriodService::new(&ctx.storage, ctx.today);

    match cmd {
        ReportCommands::Overview { month, csv, text } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let report =
                MonthlyOverviewReport::generate(&ctx.storage, &ctx.settings, month, ctx.today)?;

            if let Some(path) = &csv {
                report.export_csv(create_export(path)?)?;
                exported("Overview", path);
            }
            if let Some(path) = &text {
                report.export_text(&mut create_export(path)?)?;
                exported("Overview", path);
            }
            if csv.is_none() && text.is_none() {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::Breakdown { month, by, csv } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let report = SpendingReport::generate(&ctx.storage, month, by)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_export(&path)?)?;
                    exported("Spending report", &path);
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Trends {
            months,
            to,
            csv,
            text,
        } => {
            let count = months.unwrap_or(ctx.settings.trend_months);
            if count == 0 {
                return Err(BudgetError::Validation("--months must be at least 1".into()));
            }
            let last = periods.parse_or_current(to.as_deref())?;
            let span = periods.trailing_months(last, count);
            let first = span.first().copied().unwrap_or(last);
            let report = TrendsReport::generate(&ctx.storage, first, last)?;

            if let Some(path) = &csv {
                report.export_csv(create_export(path)?)?;
                exported("Trends report", path);
            }
            if let Some(path) = &text {
                report.export_text(&mut create_export(path)?)?;
                exported("Trends report", path);
            }
            if csv.is_none() && text.is_none() {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::NetWorth { date, since, csv } => {
            let as_of = parse_date_or(date.as_deref(), ctx.today)?;
            let since = since.as_deref().map(parse_date).transpose()?;
            let report = NetWorthReport::generate(&ctx.storage, as_of, since)?
                .with_date_format(&ctx.settings.date_format);
            match csv {
                Some(path) => {
                    report.export_csv(create_export(&path)?)?;
                    exported("Net worth report", &path);
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Budget { month, csv } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let report = BudgetVsActualReport::generate(&ctx.storage, month)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_export(&path)?)?;
                    exported("Budget vs actual report", &path);
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Goals { status, csv } => {
            let report = GoalsReport::generate(&ctx.storage, status, ctx.today)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_export(&path)?)?;
                    exported("Goals report", &path);
                }
                None => print!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

fn create_export(path: &Path) -> BudgetResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn exported(what: &str, path: &Path) {
    info!(path = %path.display(), "report exported");
    println!("{} exported to: {}", what, path.display());
}
