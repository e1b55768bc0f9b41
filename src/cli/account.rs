//! Account CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::display::transaction::format_transaction_list;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::AccountType;
use crate::reports::account_expense_summary;
use crate::services::{AccountDetails, AccountService, TransactionService};
use crate::storage::Storage;

use super::{parse_date_arg, parse_money_arg, print_json};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (debit or credit)
        #[arg(short = 't', long, default_value = "debit")]
        account_type: String,
        /// Starting balance, or the amount owed for credit accounts
        #[arg(short, long, default_value = "0")]
        balance: String,
        /// Bank or card issuer
        #[arg(short, long, default_value = "")]
        institution: String,
        /// Account number
        #[arg(short, long, default_value_t = 0)]
        number: i64,
        /// Credit limit (credit accounts only)
        #[arg(long)]
        limit: Option<String>,
        /// Next payment due date, YYYY-MM-DD (credit accounts only)
        #[arg(long)]
        due: Option<String>,
    },
    /// List all accounts
    List,
    /// Show account details and recent transactions
    Show {
        /// Account name or ID
        account: String,
    },
    /// Set the balance, recording the difference as a transaction
    SetBalance {
        /// Account name or ID
        account: String,
        /// New balance
        balance: String,
    },
    /// Current-month expense change and composition for one account
    Summary {
        /// Account name or ID
        account: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Move passed credit card due dates forward one month
    RollDueDates,
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: AccountCommands,
) -> ExpenseResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            institution,
            number,
            limit,
            due,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: debit, credit",
                    account_type
                ))
            })?;

            let details = AccountDetails {
                institution,
                account_number: number,
                credit_limit: limit.as_deref().map(parse_money_arg).transpose()?,
                due_date: due.as_deref().map(parse_date_arg).transpose()?,
            };
            let account = service.create(&name, account_type, parse_money_arg(&balance)?, details)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!(
                "  Balance: {}",
                account.balance.format_with_symbol(&settings.currency_symbol)
            );
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            print!("{}", format_account_list(&accounts, settings));
        }

        AccountCommands::Show { account } => {
            let found = service.require(&account)?;
            print!("{}", format_account_details(&found, settings));

            let recent = TransactionService::new(storage)
                .latest_for_account(found.id, settings.transaction_list_limit)?;
            println!();
            println!(
                "{}",
                format_transaction_list(&recent, std::slice::from_ref(&found), settings)
            );
        }

        AccountCommands::SetBalance { account, balance } => {
            let found = service.require(&account)?;
            let new_balance = parse_money_arg(&balance)?;

            match service.set_balance(found.id, new_balance, today)? {
                Some(txn) => {
                    println!(
                        "Balance of {} set to {}",
                        found.name,
                        new_balance.format_with_symbol(&settings.currency_symbol)
                    );
                    println!("  Recorded: {} ({})", txn.description, txn.category.label());
                }
                None => println!("Balance of {} unchanged.", found.name),
            }
        }

        AccountCommands::Summary { account, json } => {
            let found = service.require(&account)?;
            let summary =
                account_expense_summary(&storage.transactions.for_account(found.id), today)?;

            if json {
                print_json(&summary)?;
            } else {
                println!("{}: {}", found.name, summary.range);
                for (category, share) in summary.composition_percentage.iter() {
                    println!(
                        "  {:<14} {:>8.2}%  {:>+9.2}%",
                        category.label(),
                        share,
                        summary.change_percentage[category]
                    );
                }
            }
        }

        AccountCommands::RollDueDates => {
            let rolled = service.roll_credit_due_dates(today)?;
            if rolled.is_empty() {
                println!("No due dates to roll.");
            }
            for account in rolled {
                if let Some(due) = account.due_date {
                    println!("{}: next due {}", account.name, due);
                }
            }
        }
    }

    Ok(())
}
