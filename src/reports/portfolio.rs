//! Portfolio valuation over user-entered closing prices

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Money, PortfolioValue, Stock};

/// One holding as reported: latest close, its change and the position value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub shares: f64,
    pub current_close: f64,
    /// Current close minus previous close
    pub change: f64,
    pub value: f64,
    pub last_updated_date: NaiveDate,
}

impl From<&Stock> for Holding {
    fn from(stock: &Stock) -> Self {
        Self {
            symbol: stock.symbol.clone(),
            name: stock.name.clone(),
            shares: stock.shares,
            current_close: stock.current_close.as_f64(),
            change: stock.change().as_f64(),
            value: stock.value().as_f64(),
            last_updated_date: stock.last_updated_date,
        }
    }
}

/// Sum of shares times current close across holdings
pub fn portfolio_value(stocks: &[Stock]) -> Money {
    stocks
        .iter()
        .fold(Money::zero(), |total, stock| total + stock.value())
}

/// Portfolio values keyed by date, ascending
pub fn value_series(values: &[PortfolioValue]) -> BTreeMap<NaiveDate, f64> {
    values.iter().map(|v| (v.date, v.value.as_f64())).collect()
}

/// A holding with its close per date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDetail {
    pub stock: Holding,
    pub price_list: BTreeMap<NaiveDate, f64>,
}

pub fn stock_detail(stock: &Stock) -> StockDetail {
    StockDetail {
        stock: Holding::from(stock),
        price_list: stock
            .price_history
            .iter()
            .map(|(date, close)| (*date, close.as_f64()))
            .collect(),
    }
}

/// Holdings, their combined value and the recorded value series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub total_value: f64,
    pub holdings: Vec<Holding>,
    pub value_series: BTreeMap<NaiveDate, f64>,
}

pub fn portfolio_report(stocks: &[Stock], values: &[PortfolioValue]) -> PortfolioReport {
    let report = PortfolioReport {
        total_value: portfolio_value(stocks).as_f64(),
        holdings: stocks.iter().map(Holding::from).collect(),
        value_series: value_series(values),
    };

    tracing::debug!(
        holdings = report.holdings.len(),
        snapshots = report.value_series.len(),
        "built portfolio report"
    );
    report
}
