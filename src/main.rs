use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_account_command, handle_bill_command, handle_budget_command, handle_report_command,
    handle_stock_command, handle_transaction_command,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::logging::init_tracing;
use expense_tracker::models::period::parse_date;
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Personal finance tracker with period-based expense and budget analytics",
    long_about = "Track accounts, transactions, budget plans, bills and stocks from the \
                  command line, and see spending broken down by category across \
                  months, bi-weeks and weeks."
)]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "EXPENSE_TRACKER_TODAY", value_parser = parse_as_of)]
    as_of: Option<NaiveDate>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(expense_tracker::cli::AccountCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(expense_tracker::cli::TransactionCommands),

    /// Budget plan commands
    #[command(subcommand)]
    Budget(expense_tracker::cli::BudgetCommands),

    /// Bill commands
    #[command(subcommand)]
    Bill(expense_tracker::cli::BillCommands),

    /// Stock holdings and portfolio value
    #[command(subcommand)]
    Stock(expense_tracker::cli::StockCommands),

    /// Reports and analytics
    #[command(subcommand)]
    Report(expense_tracker::cli::ReportCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn parse_as_of(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let today = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Bill(cmd)) => {
            handle_bill_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Stock(cmd)) => {
            handle_stock_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, today, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  expense account create Checking --balance 1000");
            println!("  expense txn add Checking 12.50 --category Dining");
            println!("  expense report summary");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Initialized:    {}", if storage.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Default period:      {}", settings.default_period_type);
            println!("  Rollup periods:      {}", settings.rollup_periods);
            println!("  Recent transactions: {}", settings.recent_transactions);
            println!("  List limit:          {}", settings.transaction_list_limit);
            println!("  Retention (weeks):   {}", settings.retention_weeks);
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Today:               {}", today);
        }
        None => {
            println!("expense - personal finance tracker");
            println!();
            println!("Run 'expense --help' for usage information.");
        }
    }

    Ok(())
}
