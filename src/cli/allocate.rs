//! Savings allocation CLI commands
//!
//! Preview how a month's surplus would be split across active goals, then
//! confirm the split to write it.

use clap::Subcommand;

use crate::context::AppContext;
use crate::display::goal::{format_allocation_plan, format_confirm_outcome};
use crate::error::BudgetResult;
use crate::services::{AllocationService, PeriodService};

/// Allocation subcommands
#[derive(Subcommand)]
pub enum AllocateCommands {
    /// Preview the allocation without writing anything
    Plan {
        /// Month (e.g., "2025-03", "last"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Write the allocation; running it again for the same month changes nothing
    Confirm {
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle an allocation command
pub fn handle_allocate_command(ctx: &AppContext, cmd: AllocateCommands) -> BudgetResult<()> {
    let periods = PeriodService::new(&ctx.storage, ctx.today);
    let service = AllocationService::new(&ctx.storage);

    match cmd {
        AllocateCommands::Plan { month } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let plan = service.plan(month)?;
            print!("{}", format_allocation_plan(&plan));
            println!();
            println!("Run 'budget allocate confirm --month {}' to save.", month);
        }

        AllocateCommands::Confirm { month } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let outcome = service.confirm(month)?;
            print!("{}", format_allocation_plan(&outcome.plan));
            println!();
            print!("{}", format_confirm_outcome(&outcome));
        }
    }

    Ok(())
}
