//! Transaction CLI commands
//!
//! Implements CLI commands for recording and managing income and expenses.

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_date_or};
use crate::context::AppContext;
use crate::display::report::format_date;
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{DateRange, Person, TransactionKind};
use crate::services::{LedgerService, NewTransaction, PeriodService, TransactionUpdate};
use crate::storage::TransactionFilter;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record income earned by one person
    #[command(name = "add-income")]
    AddIncome {
        /// jeff or vanessa
        person: Person,
        /// Amount (e.g., "2500" or "2500.00")
        amount: String,
        /// Date received (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Payment method or source account
        #[arg(long)]
        method: Option<String>,
    },

    /// Record an expense; a negative amount is a refund
    #[command(name = "add-expense")]
    AddExpense {
        /// jeff or vanessa
        person: Person,
        /// Amount (e.g., "45.99", or "-20" for a refund)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name
        category: String,
        /// Subcategory name (omit for uncategorized)
        #[arg(short, long)]
        subcategory: Option<String>,
        /// Date spent (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(long)]
        method: Option<String>,
    },

    /// List transactions for a month or a date range
    List {
        /// Month (e.g., "2025-03", "march", "last"); defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// Range start (YYYY-MM-DD); requires --to
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Range end (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
        #[arg(short, long)]
        person: Option<Person>,
        #[arg(short, long)]
        category: Option<String>,
        /// Only income
        #[arg(long, conflicts_with = "expenses")]
        income: bool,
        /// Only expenses
        #[arg(long)]
        expenses: bool,
        /// Show only the most recent N transactions
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show transaction details
    Show {
        /// Transaction ID (e.g., "txn-12")
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        person: Option<Person>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, conflicts_with = "clear_subcategory")]
        subcategory: Option<String>,
        /// Move the expense to the uncategorized bucket
        #[arg(long)]
        clear_subcategory: bool,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(long)]
        method: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(ctx: &AppContext, cmd: TransactionCommands) -> BudgetResult<()> {
    let service = LedgerService::new(&ctx.storage);

    match cmd {
        TransactionCommands::AddIncome {
            person,
            amount,
            date,
            description,
            method,
        } => {
            let mut input = NewTransaction::income(
                person,
                parse_date_or(date.as_deref(), ctx.today)?,
                parse_amount(&amount)?,
            );
            input.description = description;
            input.payment_method = method;

            let txn = service.record(input)?;
            println!(
                "Recorded income: {} for {} on {}",
                txn.amount,
                person,
                format_date(txn.date, &ctx.settings.date_format)
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::AddExpense {
            person,
            amount,
            category,
            subcategory,
            date,
            description,
            method,
        } => {
            let mut input = NewTransaction::expense(
                person,
                parse_date_or(date.as_deref(), ctx.today)?,
                parse_amount(&amount)?,
                category,
                subcategory,
            );
            input.description = description;
            input.payment_method = method;

            let txn = service.record(input)?;
            println!(
                "Recorded expense: {} in {} by {} on {}",
                txn.amount,
                txn.category,
                person,
                format_date(txn.date, &ctx.settings.date_format)
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            month,
            from,
            to,
            person,
            category,
            income,
            expenses,
            limit,
        } => {
            let range = match (from, to) {
                (Some(from), Some(to)) => DateRange::new(parse_date(&from)?, parse_date(&to)?)
                    .map_err(|e| BudgetError::Validation(e.to_string()))?,
                _ => PeriodService::new(&ctx.storage, ctx.today)
                    .parse_or_current(month.as_deref())?
                    .date_range(),
            };

            let filter = TransactionFilter {
                kind: if income {
                    Some(TransactionKind::Income)
                } else if expenses {
                    Some(TransactionKind::Expense)
                } else {
                    None
                },
                person,
                category,
            };

            let mut transactions = service.list(&range, &filter)?;
            if let Some(limit) = limit {
                let start = transactions.len().saturating_sub(limit);
                transactions.drain(..start);
            }

            println!("Transactions {}", range);
            print!("{}", format_transaction_list(&transactions, &ctx.settings.date_format));
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&id)?;
            print!("{}", format_transaction_details(&txn, &ctx.settings.date_format));
        }

        TransactionCommands::Edit {
            id,
            person,
            amount,
            date,
            category,
            subcategory,
            clear_subcategory,
            description,
            method,
        } => {
            let txn = service.find(&id)?;

            let changes = TransactionUpdate {
                person,
                date: date.as_deref().map(parse_date).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                subcategory: if clear_subcategory {
                    Some(None)
                } else {
                    subcategory.map(Some)
                },
                description,
                payment_method: method.map(Some),
            };

            let updated = service.update(txn.id, changes)?;
            println!("Updated transaction: {}", updated.id);
            print!("{}", format_transaction_details(&updated, &ctx.settings.date_format));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.find(&id)?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction: {} ({} on {})",
                deleted.id,
                deleted.amount,
                format_date(deleted.date, &ctx.settings.date_format)
            );
        }
    }

    Ok(())
}
