//! Display formatting for terminal output
//!
//! Lists render as `tabled` tables; reports render as labelled text blocks.
//! Currency symbol and date format come from the user's settings.

pub mod account;
pub mod bill;
pub mod report;
pub mod stock;
pub mod transaction;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;

pub use account::{format_account_details, format_account_list};
pub use bill::{format_bill_list, format_message_list};
pub use report::{
    format_aggregate, format_budget_overview, format_budget_report, format_dashboard,
    format_financial_summary, format_rollup,
};
pub use stock::{format_holdings, format_portfolio, format_stock_detail};
pub use transaction::format_transaction_list;

/// Render rows as a table in the house style
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A currency amount given in units
pub(crate) fn format_amount(value: f64, settings: &Settings) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{:.2}", sign, settings.currency_symbol, value.abs())
}

pub(crate) fn format_date(date: NaiveDate, settings: &Settings) -> String {
    date.format(&settings.date_format).to_string()
}
