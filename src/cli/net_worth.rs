//! Net worth CLI commands
//!
//! Record asset and liability snapshots and review the household position.

use clap::Subcommand;

use super::{parse_amount, parse_date_or};
use crate::context::AppContext;
use crate::display::report::{format_date, truncate};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{AssetType, NetWorthEntryId, Owner};
use crate::services::NetWorthService;

/// Net worth subcommands
#[derive(Subcommand)]
pub enum NetWorthCommands {
    /// Record the value of an asset or liability on a date
    ///
    /// Recording the same owner, type and name on the same date replaces the
    /// earlier snapshot.
    Record {
        /// jeff, vanessa or joint
        owner: Owner,
        /// Asset type (e.g., "checking", "401k", "real-estate", "debt")
        asset_type: AssetType,
        /// Asset name (e.g., "Chase Checking")
        name: String,
        /// Value; liabilities are negative (e.g., "-250000")
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Snapshot date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show the latest value of every asset as of a date
    Show {
        /// As-of date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List every recorded snapshot
    History,

    /// Delete a snapshot
    Delete {
        /// Entry ID (e.g., "nw-4")
        id: String,
    },

    /// List the accepted asset types
    Types,
}

/// Handle a net worth command
pub fn handle_net_worth_command(ctx: &AppContext, cmd: NetWorthCommands) -> BudgetResult<()> {
    let service = NetWorthService::new(&ctx.storage);

    match cmd {
        NetWorthCommands::Record {
            owner,
            asset_type,
            name,
            value,
            date,
            notes,
        } => {
            let entry = service.record(
                owner,
                asset_type,
                &name,
                parse_amount(&value)?,
                parse_date_or(date.as_deref(), ctx.today)?,
                notes,
            )?;
            println!(
                "Recorded {} ({}, {}): {} as of {}",
                entry.name,
                entry.owner,
                entry.asset_type,
                entry.value,
                format_date(entry.as_of, &ctx.settings.date_format)
            );
            println!("  ID: {}", entry.id);
        }

        NetWorthCommands::Show { date } => {
            let as_of = parse_date_or(date.as_deref(), ctx.today)?;
            let summary = service.summary(as_of)?;

            println!(
                "Net worth as of {}",
                format_date(as_of, &ctx.settings.date_format)
            );
            if summary.entries.is_empty() {
                println!("No net worth entries recorded.");
                return Ok(());
            }
            for owner in Owner::ALL {
                let totals = &summary.by_owner[&owner];
                println!(
                    "  {:<8} assets {:>14}  liabilities {:>14}  net {:>14}",
                    owner.to_string(),
                    totals.assets.to_string(),
                    totals.liabilities.to_string(),
                    totals.net().to_string()
                );
            }
            println!("  Household net worth: {}", summary.net_worth());
        }

        NetWorthCommands::History => {
            let entries = service.history()?;
            if entries.is_empty() {
                println!("No net worth entries recorded.");
                println!("Use 'budget networth record' to add one.");
                return Ok(());
            }
            println!(
                "{:<8} {:<10} {:<8} {:<24} {:<18} {:>14}",
                "ID", "Date", "Owner", "Asset", "Type", "Value"
            );
            println!("{}", "-".repeat(86));
            for entry in &entries {
                println!(
                    "{:<8} {:<10} {:<8} {:<24} {:<18} {:>14}",
                    entry.id.to_string(),
                    format_date(entry.as_of, &ctx.settings.date_format),
                    entry.owner.to_string(),
                    truncate(&entry.name, 24),
                    entry.asset_type.label(),
                    entry.value.to_string()
                );
            }
        }

        NetWorthCommands::Delete { id } => {
            let entry_id = NetWorthEntryId::parse(&id)
                .map_err(|_| BudgetError::net_worth_entry_not_found(&id))?;
            let deleted = service.delete(entry_id)?;
            println!("Deleted net worth entry: {} ({} on {})", deleted.id, deleted.name, deleted.as_of);
        }

        NetWorthCommands::Types => {
            for asset_type in AssetType::ALL {
                println!("  {}", asset_type.label());
            }
        }
    }

    Ok(())
}

