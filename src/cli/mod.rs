//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service and report layers.
//! Every handler takes "today" explicitly so `--as-of` can pin the date.

pub mod account;
pub mod bill;
pub mod budget;
pub mod report;
pub mod stock;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use report::{handle_report_command, ReportCommands};
pub use stock::{handle_stock_command, StockCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::period::parse_date;
use crate::models::{Category, DateRange, Money, PeriodType};

pub(crate) fn parse_money_arg(s: &str) -> ExpenseResult<Money> {
    Money::parse(s).map_err(|e| {
        ExpenseError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1000.00' or '1000'. Error: {}",
            s, e
        ))
    })
}

pub(crate) fn parse_date_arg(s: &str) -> ExpenseResult<NaiveDate> {
    parse_date(s).map_err(|e| ExpenseError::Validation(e.to_string()))
}

pub(crate) fn parse_category_arg(s: &str) -> ExpenseResult<Category> {
    s.parse::<Category>()
        .map_err(|e| ExpenseError::Validation(e.to_string()))
}

pub(crate) fn parse_period_arg(s: &str) -> ExpenseResult<PeriodType> {
    s.parse::<PeriodType>()
        .map_err(|e| ExpenseError::Validation(e.to_string()))
}

/// An explicit range from `--from`/`--to`; both or neither must be given
pub(crate) fn parse_range_args(
    from: Option<&str>,
    to: Option<&str>,
) -> ExpenseResult<Option<DateRange>> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(Some(DateRange::new(
            parse_date_arg(from)?,
            parse_date_arg(to)?,
        )?)),
        (None, None) => Ok(None),
        _ => Err(ExpenseError::Validation(
            "--from and --to must be given together".into(),
        )),
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> ExpenseResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
