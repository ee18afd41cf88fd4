//! Closed period CLI commands

use clap::Subcommand;

use crate::context::AppContext;
use crate::error::BudgetResult;
use crate::services::PeriodService;

/// Period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Close a month so its transactions can no longer change
    Close {
        /// Month (e.g., "2025-03", "last")
        month: String,
    },

    /// Reopen a closed month
    Reopen { month: String },

    /// List closed months
    List,
}

/// Handle a period command
pub fn handle_period_command(ctx: &AppContext, cmd: PeriodCommands) -> BudgetResult<()> {
    let service = PeriodService::new(&ctx.storage, ctx.today);

    match cmd {
        PeriodCommands::Close { month } => {
            let month = service.parse(&month)?;
            if service.close(month)? {
                println!("Closed {}", month.long_name());
            } else {
                println!("{} is already closed", month.long_name());
            }
        }

        PeriodCommands::Reopen { month } => {
            let month = service.parse(&month)?;
            if service.reopen(month)? {
                println!("Reopened {}", month.long_name());
            } else {
                println!("{} is not closed", month.long_name());
            }
        }

        PeriodCommands::List => {
            let closed = service.closed_months()?;
            if closed.is_empty() {
                println!("No closed periods.");
            } else {
                println!("Closed periods:");
                for month in closed {
                    println!("  {}  {}", month, month.long_name());
                }
            }
        }
    }

    Ok(())
}
