//! Savings goal and allocation display formatting

use crate::services::allocation::{AllocationPlan, ConfirmOutcome};
use crate::services::goal::GoalWithProgress;

use super::report::{format_bar, format_date, format_percentage, truncate};

/// Format goals with their funding progress
pub fn format_goal_list(goals: &[GoalWithProgress]) -> String {
    if goals.is_empty() {
        return "No savings goals found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:<24} {:>3} {:<9} {:>12} {:>12} {:>6}  {}\n",
        "ID", "Name", "Pri", "Status", "Allocated", "Target", "Funded", "Progress"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for GoalWithProgress { goal, progress } in goals {
        let flag = if progress.overfunded { " +" } else { "" };
        output.push_str(&format!(
            "{:<8} {:<24} {:>3} {:<9} {:>12} {:>12} {:>6}  {}{}\n",
            goal.id.to_string(),
            truncate(&goal.name, 24),
            goal.priority,
            goal.status.to_string(),
            progress.allocated.to_string(),
            goal.target_amount.to_string(),
            format_percentage(progress.percent_funded),
            format_bar(progress.percent_funded, 100.0, 20),
            flag
        ));
    }

    if goals.iter().any(|g| g.progress.overfunded) {
        output.push_str("\n+ = allocated beyond target\n");
    }

    output
}

/// Format one goal's details
pub fn format_goal_details(entry: &GoalWithProgress, date_format: &str) -> String {
    let GoalWithProgress { goal, progress } = entry;
    let mut output = String::new();

    output.push_str(&format!("Goal:        {} ({})\n", goal.name, goal.id));
    output.push_str(&format!("Status:      {}\n", goal.status));
    output.push_str(&format!("Priority:    {}\n", goal.priority));
    output.push_str(&format!("Target:      {}\n", goal.target_amount));
    if let Some(date) = goal.target_date {
        output.push_str(&format!("Target Date: {}\n", format_date(date, date_format)));
    }
    output.push_str(&format!("Allocated:   {}\n", progress.allocated));
    output.push_str(&format!("Remaining:   {}\n", progress.remaining));
    output.push_str(&format!(
        "Funded:      {}\n",
        format_percentage(progress.percent_funded)
    ));
    if let Some(monthly) = progress.monthly_needed {
        output.push_str(&format!("Per Month:   {}\n", monthly));
    }
    if progress.overfunded {
        output.push_str("Note:        Allocated beyond target\n");
    }
    if !goal.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", goal.notes));
    }

    output
}

/// Format an allocation plan preview
pub fn format_allocation_plan(plan: &AllocationPlan) -> String {
    let mut output = String::new();

    output.push_str(&format!("Savings Allocation - {}\n", plan.month.long_name()));
    output.push_str(&format!("Surplus: {}\n\n", plan.surplus));

    if !plan.surplus.is_positive() {
        output.push_str("No surplus this month; nothing to allocate.\n");
        return output;
    }
    if plan.allocations.is_empty() {
        output.push_str("No active savings goals.\n");
    }

    for share in &plan.allocations {
        output.push_str(&format!(
            "{:>3}. {:<24} {:>12}  (remaining {})\n",
            share.priority,
            truncate(&share.goal_name, 24),
            share.amount.to_string(),
            share.remaining
        ));
    }

    output.push_str(&format!("\nAllocated:   {}\n", plan.total_allocated()));
    output.push_str(&format!("Unallocated: {}\n", plan.unallocated));

    output
}

/// Summarize what a confirmation wrote
pub fn format_confirm_outcome(outcome: &ConfirmOutcome) -> String {
    if !outcome.changed() {
        return format!(
            "Allocations for {} are already up to date.\n",
            outcome.plan.month
        );
    }
    format!(
        "Allocations for {} saved: {} created, {} updated, {} removed.\n",
        outcome.plan.month, outcome.created, outcome.updated, outcome.removed
    )
}
