//! Transaction CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::format_transaction_list;
use crate::error::ExpenseResult;
use crate::models::period::current_period;
use crate::models::PeriodType;
use crate::services::transaction::retention_cutoff;
use crate::services::{AccountService, NewTransaction, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{parse_category_arg, parse_date_arg, parse_money_arg, parse_range_args, print_json};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction and update the account balance
    Add {
        /// Account name or ID
        account: String,
        /// Amount, always positive; direction comes from the category
        amount: String,
        /// Category name or label (Income, Housing, Grocery, ...)
        #[arg(short, long, default_value = "Others")]
        category: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Date the transaction happened, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only this account
        #[arg(short, long)]
        account: Option<String>,
        /// Only this category; without --from/--to, limited to the current month
        #[arg(short, long)]
        category: Option<String>,
        /// Range start, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Range end, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete transactions older than the retention window
    Prune {
        /// Weeks kept before the start of the current month
        #[arg(long)]
        weeks: Option<u32>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: TransactionCommands,
) -> ExpenseResult<()> {
    let service = TransactionService::new(storage);
    let accounts = AccountService::new(storage);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            category,
            description,
            date,
        } => {
            let account = accounts.require(&account)?;
            let occur_date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => today,
            };

            let txn = service.record(NewTransaction {
                account_id: account.id,
                description,
                category: parse_category_arg(&category)?,
                amount: parse_money_arg(&amount)?,
                occur_date,
            })?;

            println!(
                "Recorded {} {} on {} ({})",
                txn.category.label(),
                txn.amount.format_with_symbol(&settings.currency_symbol),
                account.name,
                txn.occur_date
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            category,
            from,
            to,
            limit,
            json,
        } => {
            let mut filter = TransactionFilter::new().limit(limit.unwrap_or(settings.transaction_list_limit));

            if let Some(account) = account {
                filter = filter.account(accounts.require(&account)?.id);
            }

            let range = parse_range_args(from.as_deref(), to.as_deref())?;
            if let Some(category) = category {
                filter = filter.category(parse_category_arg(&category)?);
                filter = filter.range(range.unwrap_or_else(|| current_period(PeriodType::Month, today, None)));
            } else if let Some(range) = range {
                filter = filter.range(range);
            }

            let transactions = service.list(&filter)?;
            if json {
                print_json(&transactions)?;
            } else {
                println!(
                    "{}",
                    format_transaction_list(&transactions, &accounts.list()?, settings)
                );
            }
        }

        TransactionCommands::Prune { weeks } => {
            let weeks = weeks.unwrap_or(settings.retention_weeks);
            let removed = service.prune(today, weeks)?;
            println!(
                "Removed {} transaction(s) dated before {}.",
                removed,
                retention_cutoff(today, weeks)
            );
        }
    }

    Ok(())
}
