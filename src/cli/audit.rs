//! Audit log CLI command

use clap::Args;

use crate::audit::EntityType;
use crate::context::AppContext;
use crate::error::BudgetResult;

/// Options for showing the audit log
#[derive(Args)]
pub struct AuditArgs {
    /// Number of most recent entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Only entries for one entity type (e.g., "transaction", "goal", "period")
    #[arg(short, long)]
    pub entity: Option<EntityType>,
}

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(ctx: &AppContext, args: AuditArgs) -> BudgetResult<()> {
    let entries = ctx.storage.audit().read_recent(args.limit, args.entity)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
