//! Bill CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::bill::{format_bill_list, format_message_list};
use crate::error::{ExpenseError, ExpenseResult};
use crate::services::{AccountService, BillService};
use crate::storage::Storage;

use super::{parse_category_arg, parse_date_arg, parse_money_arg, print_json};

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add an upcoming bill
    Add {
        /// What the bill is for
        description: String,
        /// Amount due (at least 1.00)
        amount: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,
        /// Category (defaults to Housing)
        #[arg(short, long)]
        category: Option<String>,
        /// Account the bill is paid from
        #[arg(short, long)]
        account: Option<String>,
    },
    /// List bills, soonest due first
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Pay a bill, recording the payment if it has an account and isn't overdue
    Pay {
        /// Bill ID
        bill: String,
    },
    /// Turn overdue bills into messages and clear old messages
    Sweep,
    /// Show overdue-bill messages
    Messages {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: BillCommands,
) -> ExpenseResult<()> {
    let service = BillService::new(storage);
    let accounts = AccountService::new(storage);

    match cmd {
        BillCommands::Add {
            description,
            amount,
            due,
            category,
            account,
        } => {
            let pay_account = match account {
                Some(a) => Some(accounts.require(&a)?.id),
                None => None,
            };
            let bill = service.create(
                &description,
                parse_money_arg(&amount)?,
                parse_date_arg(&due)?,
                category.as_deref().map(parse_category_arg).transpose()?,
                pay_account,
            )?;

            println!("Added bill: {}", bill.description);
            println!("  Due: {}", bill.due_date);
            println!("  ID: {}", bill.id);
        }

        BillCommands::List { json } => {
            let bills = service.list()?;
            if json {
                print_json(&bills)?;
            } else {
                println!("{}", format_bill_list(&bills, &accounts.list()?, settings));
            }
        }

        BillCommands::Pay { bill } => {
            let found = service
                .find(&bill)?
                .ok_or_else(|| ExpenseError::bill_not_found(&bill))?;
            let payment = service.pay(found.id, today)?;

            match payment.transaction {
                Some(txn) => println!(
                    "Paid {}: recorded {}",
                    payment.bill.description,
                    txn.amount.format_with_symbol(&settings.currency_symbol)
                ),
                None => println!("Removed bill {} (no payment recorded).", payment.bill.description),
            }
        }

        BillCommands::Sweep => {
            let outcome = service.sweep_overdue(today)?;
            print!("{}", format_message_list(&outcome.new_messages, settings));
            if outcome.new_messages.is_empty() {
                println!();
            }
            println!("Cleared {} old message(s).", outcome.expired_messages);
        }

        BillCommands::Messages { json } => {
            let messages = service.messages()?;
            if json {
                print_json(&messages)?;
            } else {
                print!("{}", format_message_list(&messages, settings));
                if messages.is_empty() {
                    println!();
                }
            }
        }
    }

    Ok(())
}
