//! Budget target CLI commands
//!
//! Implements CLI commands for monthly spending targets per category and
//! subcategory.

use clap::Subcommand;

use super::parse_amount;
use crate::context::AppContext;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetTargetId, Money};
use crate::services::{BudgetTargetService, PeriodService};

/// Target subcommands
#[derive(Subcommand)]
pub enum TargetCommands {
    /// Set the target for a category or subcategory in a month
    Set {
        /// Category name
        category: String,
        /// Target amount (e.g., "600" or "600.00")
        amount: String,
        /// Subcategory; omit to target the category as a whole
        #[arg(short, long)]
        subcategory: Option<String>,
        /// Month (e.g., "2025-03", "next"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List the targets for a month
    List {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete a target
    Delete {
        /// Target ID (e.g., "tgt-3")
        id: String,
    },

    /// Copy one month's targets into another
    Copy {
        /// Source month
        from: String,
        /// Destination month
        to: String,
    },
}

/// Handle a target command
pub fn handle_target_command(ctx: &AppContext, cmd: TargetCommands) -> BudgetResult<()> {
    let periods = PeriodService::new(&ctx.storage, ctx.today);
    let service = BudgetTargetService::new(&ctx.storage);

    match cmd {
        TargetCommands::Set {
            category,
            amount,
            subcategory,
            month,
        } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let target = service.set(
                &category,
                subcategory.as_deref(),
                month,
                parse_amount(&amount)?,
            )?;
            println!("Set target for {} in {}: {}", slot_label(&target.category, target.subcategory.as_deref()), month, target.amount);
            println!("  ID: {}", target.id);
        }

        TargetCommands::List { month } => {
            let month = periods.parse_or_current(month.as_deref())?;
            let targets = service.list(month)?;

            if targets.is_empty() {
                println!("No budget targets for {}.", month);
                println!("Use 'budget target set' to create one.");
                return Ok(());
            }

            println!("Budget targets for {}", month.long_name());
            println!("{:<8} {:<40} {:>12}", "ID", "Category", "Target");
            println!("{}", "-".repeat(62));
            for target in &targets {
                println!(
                    "{:<8} {:<40} {:>12}",
                    target.id.to_string(),
                    slot_label(&target.category, target.subcategory.as_deref()),
                    target.amount.to_string()
                );
            }
            println!("{}", "-".repeat(62));
            let total: Money = targets.iter().map(|t| t.amount).sum();
            println!("{:<49} {:>12}", "Total", total.to_string());
        }

        TargetCommands::Delete { id } => {
            let target_id = BudgetTargetId::parse(&id).map_err(|_| BudgetError::NotFound {
                entity_type: "Budget target",
                identifier: id.clone(),
            })?;
            let deleted = service.delete(target_id)?;
            println!(
                "Deleted target for {} in {}",
                slot_label(&deleted.category, deleted.subcategory.as_deref()),
                deleted.month
            );
        }

        TargetCommands::Copy { from, to } => {
            let from = periods.parse(&from)?;
            let to = periods.parse(&to)?;
            let copied = service.copy_month(from, to)?;
            println!("Copied {} target(s) from {} to {}", copied, from, to);
        }
    }

    Ok(())
}

fn slot_label(category: &str, subcategory: Option<&str>) -> String {
    match subcategory {
        Some(sub) => format!("{} / {}", category, sub),
        None => category.to_string(),
    }
}
