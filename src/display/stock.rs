//! Stock holding and portfolio display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::reports::{Holding, PortfolioReport, StockDetail};

use super::report::{format_bar, separator};
use super::{format_amount, format_date, render_table};

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "As of")]
    as_of: String,
}

fn format_price_change(change: f64, settings: &Settings) -> String {
    if change > 0.0 {
        format!("+{}", format_amount(change, settings))
    } else {
        format_amount(change, settings)
    }
}

pub fn format_holdings(holdings: &[Holding], settings: &Settings) -> String {
    if holdings.is_empty() {
        return "No stocks found.".to_string();
    }

    let rows = holdings
        .iter()
        .map(|h| HoldingRow {
            symbol: h.symbol.clone(),
            name: h.name.clone(),
            shares: format!("{}", h.shares),
            close: format_amount(h.current_close, settings),
            change: format_price_change(h.change, settings),
            value: format_amount(h.value, settings),
            as_of: format_date(h.last_updated_date, settings),
        })
        .collect();

    render_table(rows)
}

/// Holdings table, total and the recorded value series
pub fn format_portfolio(report: &PortfolioReport, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format_holdings(&report.holdings, settings));
    output.push('\n');
    output.push_str(&format!(
        "Portfolio value: {}\n",
        format_amount(report.total_value, settings)
    ));

    if !report.value_series.is_empty() {
        let max = report.value_series.values().copied().fold(0.0, f64::max);
        output.push('\n');
        output.push_str("Value history\n");
        output.push_str(&separator(44));
        output.push('\n');
        for (date, value) in &report.value_series {
            output.push_str(&format!(
                "{:<10}  {:>12}  {}\n",
                format_date(*date, settings),
                format_amount(*value, settings),
                format_bar(*value, max, 18)
            ));
        }
    }

    output
}

pub fn format_stock_detail(detail: &StockDetail, settings: &Settings) -> String {
    let stock = &detail.stock;
    let mut output = String::new();

    output.push_str(&format!("Stock: {}", stock.symbol));
    if !stock.name.is_empty() {
        output.push_str(&format!(" ({})", stock.name));
    }
    output.push('\n');
    output.push_str(&format!("  Shares:  {}\n", stock.shares));
    output.push_str(&format!(
        "  Close:   {} ({}) on {}\n",
        format_amount(stock.current_close, settings),
        format_price_change(stock.change, settings),
        format_date(stock.last_updated_date, settings)
    ));
    output.push_str(&format!("  Value:   {}\n", format_amount(stock.value, settings)));

    output.push_str("\nPrice history\n");
    output.push_str(&separator(26));
    output.push('\n');
    for (date, close) in &detail.price_list {
        output.push_str(&format!(
            "{:<10}  {:>12}\n",
            format_date(*date, settings),
            format_amount(*close, settings)
        ));
    }

    output
}
