//! Savings goal CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date};
use crate::context::AppContext;
use crate::display::goal::{format_goal_details, format_goal_list};
use crate::display::report::format_date;
use crate::error::BudgetResult;
use crate::models::GoalStatus;
use crate::services::goal::GoalWithProgress;
use crate::services::{GoalService, GoalUpdate};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal name (must be unique)
        name: String,
        /// Target amount (e.g., "10000")
        target: String,
        /// Allocation priority; 1 is funded first
        #[arg(short, long)]
        priority: Option<u32>,
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List goals with their progress
    List {
        /// Only goals with this status (active, paused, completed)
        #[arg(short, long)]
        status: Option<GoalStatus>,
    },

    /// Show goal details
    Show {
        /// Goal name or ID
        goal: String,
    },

    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short, long)]
        priority: Option<u32>,
        #[arg(short, long, conflicts_with = "clear_date")]
        date: Option<String>,
        /// Remove the target date
        #[arg(long)]
        clear_date: bool,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Stop funding a goal until it is resumed
    Pause {
        /// Goal name or ID
        goal: String,
    },

    /// Make a paused or completed goal active again
    Resume {
        /// Goal name or ID
        goal: String,
    },

    /// Mark a goal completed
    Complete {
        /// Goal name or ID
        goal: String,
    },

    /// Delete a goal with no allocations
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(ctx: &AppContext, cmd: GoalCommands) -> BudgetResult<()> {
    let service = GoalService::new(&ctx.storage);

    match cmd {
        GoalCommands::Create {
            name,
            target,
            priority,
            date,
        } => {
            let goal = service.create(
                &name,
                parse_amount(&target)?,
                priority,
                date.as_deref().map(parse_date).transpose()?,
            )?;
            println!("Created goal: {}", goal.name);
            println!("  Target:   {}", goal.target_amount);
            println!("  Priority: {}", goal.priority);
            if let Some(date) = goal.target_date {
                println!("  Due:      {}", format_date(date, &ctx.settings.date_format));
            }
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List { status } => {
            let goals = service.progress_all(status, ctx.today)?;
            print!("{}", format_goal_list(&goals));
        }

        GoalCommands::Show { goal } => {
            let goal = service.find(&goal)?;
            let progress = service.progress(&goal, ctx.today)?;
            let entry = GoalWithProgress { goal, progress };
            print!("{}", format_goal_details(&entry, &ctx.settings.date_format));
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            priority,
            date,
            clear_date,
            notes,
        } => {
            let goal = service.find(&goal)?;

            if name.is_none()
                && target.is_none()
                && priority.is_none()
                && date.is_none()
                && !clear_date
                && notes.is_none()
            {
                println!("No changes specified. Use --name, --target, --priority, --date, --clear-date or --notes.");
                return Ok(());
            }

            let changes = GoalUpdate {
                name,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                target_date: if clear_date {
                    Some(None)
                } else {
                    date.as_deref().map(parse_date).transpose()?.map(Some)
                },
                priority,
                notes,
            };

            let updated = service.update(goal.id, changes)?;
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Pause { goal } => {
            let goal = service.find(&goal)?;
            let updated = service.set_status(goal.id, GoalStatus::Paused)?;
            println!("Paused goal: {}", updated.name);
        }

        GoalCommands::Resume { goal } => {
            let goal = service.find(&goal)?;
            let updated = service.set_status(goal.id, GoalStatus::Active)?;
            println!("Resumed goal: {}", updated.name);
        }

        GoalCommands::Complete { goal } => {
            let goal = service.find(&goal)?;
            let updated = service.set_status(goal.id, GoalStatus::Completed)?;
            println!("Completed goal: {}", updated.name);
        }

        GoalCommands::Delete { goal } => {
            let goal = service.find(&goal)?;
            let deleted = service.delete(goal.id)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
