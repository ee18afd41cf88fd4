use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use budget_master::cli::{
    handle_allocate_command, handle_audit_command, handle_category_command, handle_goal_command,
    handle_net_worth_command, handle_period_command, handle_report_command,
    handle_target_command, handle_transaction_command,
};
use budget_master::config::paths::DATA_DIR_ENV;
use budget_master::context::AppContext;
use budget_master::display::format_category_tree;
use budget_master::storage::initialize_storage;

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Household budget tracker for Jeff and Vanessa",
    long_about = "Budget Master records household income and expenses, tracks net worth \
                  over time, and splits each month's surplus across savings goals \
                  in priority order."
)]
struct Cli {
    /// Data directory (overrides BUDGET_MASTER_DATA_DIR)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Diagnostic log level; RUST_LOG takes precedence when set
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record and manage income and expenses
    #[command(subcommand, alias = "transaction")]
    Txn(budget_master::cli::TransactionCommands),

    /// Record and review net worth snapshots
    #[command(subcommand, name = "networth", alias = "net-worth")]
    NetWorth(budget_master::cli::NetWorthCommands),

    /// Manage savings goals
    #[command(subcommand)]
    Goal(budget_master::cli::GoalCommands),

    /// Split a month's surplus across savings goals
    #[command(subcommand)]
    Allocate(budget_master::cli::AllocateCommands),

    /// Manage categories and subcategories
    #[command(subcommand)]
    Category(budget_master::cli::CategoryCommands),

    /// Manage monthly budget targets
    #[command(subcommand)]
    Target(budget_master::cli::TargetCommands),

    /// Close and reopen months
    #[command(subcommand)]
    Period(budget_master::cli::PeriodCommands),

    /// Generate and export reports
    #[command(subcommand)]
    Report(budget_master::cli::ReportCommands),

    /// Show the audit log
    Audit(budget_master::cli::AuditArgs),

    /// Initialize a new budget with the default categories
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show paths and settings
    Show,
    /// Change a setting (e.g., "top_categories_limit 8", "household.jeff Jeffrey")
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let mut ctx = AppContext::load(cli.data_dir)?;

    match cli.command {
        Some(Commands::Txn(cmd)) => handle_transaction_command(&ctx, cmd)?,
        Some(Commands::NetWorth(cmd)) => handle_net_worth_command(&ctx, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&ctx, cmd)?,
        Some(Commands::Allocate(cmd)) => handle_allocate_command(&ctx, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&ctx, cmd)?,
        Some(Commands::Target(cmd)) => handle_target_command(&ctx, cmd)?,
        Some(Commands::Period(cmd)) => handle_period_command(&ctx, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&ctx, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&ctx, args)?,
        Some(Commands::Init) => {
            println!("Initializing Budget Master at: {}", ctx.paths.base_dir().display());
            initialize_storage(&ctx.paths)?;
            if !ctx.paths.is_initialized() {
                ctx.settings.save(&ctx.paths)?;
            }
            ctx.storage.load_all()?;
            println!("Initialization complete!");
            println!();
            print!("{}", format_category_tree(&ctx.storage.categories.all()?));
            println!();
            println!("Run 'budget txn add-income --help' to start recording.");
        }
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigAction::Show) => {
                let s = &ctx.settings;
                println!("Budget Master Configuration");
                println!("===========================");
                println!("Base directory: {}", ctx.paths.base_dir().display());
                println!("Data directory: {}", ctx.paths.data_dir().display());
                println!("Audit log:      {}", ctx.paths.audit_log().display());
                println!();
                println!("Settings:");
                println!("  currency_symbol:      {}", s.currency_symbol);
                println!("  date_format:          {}", s.date_format);
                println!("  top_categories_limit: {}", s.top_categories_limit);
                println!("  trend_months:         {}", s.trend_months);
                println!("  household.jeff:       {}", s.household.jeff);
                println!("  household.vanessa:    {}", s.household.vanessa);
            }
            Some(ConfigAction::Set { key, value }) => {
                ctx.settings.set(&key, &value)?;
                ctx.settings.save(&ctx.paths)?;
                println!("Set {} = {}", key, value);
            }
        },
        None => {
            println!("Budget Master - household budget tracking");
            println!();
            println!("Run 'budget init' to set up a new budget.");
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber on stderr
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            "budget_master",
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
