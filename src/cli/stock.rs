//! Stock holding CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::stock::{format_holdings, format_portfolio, format_stock_detail};
use crate::error::ExpenseResult;
use crate::reports::{stock_detail, Holding};
use crate::services::StockService;
use crate::storage::Storage;

use super::{parse_date_arg, parse_money_arg, print_json};

/// Stock subcommands
#[derive(Subcommand)]
pub enum StockCommands {
    /// Add a holding with its latest close
    Add {
        /// Ticker symbol
        symbol: String,
        /// Number of shares held
        #[arg(short, long)]
        shares: f64,
        /// Latest closing price
        #[arg(short, long)]
        close: String,
        /// Company name
        #[arg(short, long)]
        name: Option<String>,
        /// Date of the close, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List holdings with their value
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one holding and its price history
    Show {
        /// Ticker symbol
        symbol: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a closing price
    Price {
        /// Ticker symbol
        symbol: String,
        /// Closing price
        #[arg(short, long)]
        close: String,
        /// Date of the close, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Change the number of shares held
    Shares {
        /// Ticker symbol
        symbol: String,
        /// New number of shares
        shares: f64,
    },
    /// Remove a holding
    Remove {
        /// Ticker symbol
        symbol: String,
    },
    /// Record the portfolio's current value for a date
    Snapshot {
        /// Snapshot date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Holdings, total value and the value history
    Portfolio {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete prices and portfolio values from before last month
    Prune,
}

fn date_or_today(date: Option<String>, today: NaiveDate) -> ExpenseResult<NaiveDate> {
    match date {
        Some(d) => parse_date_arg(&d),
        None => Ok(today),
    }
}

/// Handle a stock command
pub fn handle_stock_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: StockCommands,
) -> ExpenseResult<()> {
    let service = StockService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        StockCommands::Add {
            symbol: ticker,
            shares,
            close,
            name,
            date,
        } => {
            let stock = service.add(
                &ticker,
                name.as_deref(),
                shares,
                parse_money_arg(&close)?,
                date_or_today(date, today)?,
            )?;

            println!("Added stock: {}", stock.symbol);
            println!("  Shares: {}", stock.shares);
            println!("  Value:  {}", stock.value().format_with_symbol(symbol));
        }

        StockCommands::List { json } => {
            let holdings: Vec<Holding> = service.list()?.iter().map(Holding::from).collect();
            if json {
                print_json(&holdings)?;
            } else {
                println!("{}", format_holdings(&holdings, settings));
            }
        }

        StockCommands::Show { symbol: ticker, json } => {
            let detail = stock_detail(&service.require(&ticker)?);
            if json {
                print_json(&detail)?;
            } else {
                print!("{}", format_stock_detail(&detail, settings));
            }
        }

        StockCommands::Price {
            symbol: ticker,
            close,
            date,
        } => {
            let date = date_or_today(date, today)?;
            let close = parse_money_arg(&close)?;
            let stock = service.record_price(&ticker, close, date)?;
            println!(
                "{} closed at {} on {}",
                stock.symbol,
                close.format_with_symbol(symbol),
                date
            );
        }

        StockCommands::Shares {
            symbol: ticker,
            shares,
        } => {
            let stock = service.set_shares(&ticker, shares)?;
            println!("{} now holds {} shares", stock.symbol, stock.shares);
        }

        StockCommands::Remove { symbol: ticker } => {
            let stock = service.remove(&ticker)?;
            println!("Removed stock: {}", stock.symbol);
        }

        StockCommands::Snapshot { date } => {
            let value = service.snapshot(date_or_today(date, today)?)?;
            println!(
                "Portfolio value on {}: {}",
                value.date,
                value.value.format_with_symbol(symbol)
            );
        }

        StockCommands::Portfolio { json } => {
            let report = service.report()?;
            if json {
                print_json(&report)?;
            } else {
                print!("{}", format_portfolio(&report, settings));
            }
        }

        StockCommands::Prune => {
            let pruned = service.prune_history(today)?;
            println!(
                "Removed {} price(s) and {} portfolio value(s) dated before {}.",
                pruned.prices, pruned.values, pruned.cutoff
            );
        }
    }

    Ok(())
}
