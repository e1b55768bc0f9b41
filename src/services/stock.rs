//! Stock holding service
//!
//! Holdings with hand-entered closes, daily portfolio value snapshots and
//! pruning of old price history.

use chrono::{Duration, NaiveDate};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::period::first_of_month;
use crate::models::{Money, PortfolioValue, Stock};
use crate::reports::{portfolio_report, portfolio_value, PortfolioReport};
use crate::storage::Storage;

/// Counts from a history prune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPruned {
    pub cutoff: NaiveDate,
    pub prices: usize,
    pub values: usize,
}

/// First day of the month before `today`'s month; older history is dropped
pub fn history_cutoff(today: NaiveDate) -> NaiveDate {
    first_of_month(first_of_month(today) - Duration::days(1))
}

/// Service for stock holdings
pub struct StockService<'a> {
    storage: &'a Storage,
}

impl<'a> StockService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a holding with its first close
    pub fn add(
        &self,
        symbol: &str,
        name: Option<&str>,
        shares: f64,
        close: Money,
        date: NaiveDate,
    ) -> ExpenseResult<Stock> {
        let mut stock = Stock::new(symbol, shares, close, date);
        if let Some(name) = name {
            stock = stock.with_name(name.trim());
        }

        stock
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        if self.storage.stocks.get_by_symbol(&stock.symbol)?.is_some() {
            return Err(ExpenseError::Duplicate {
                entity_type: "Stock",
                identifier: stock.symbol,
            });
        }

        self.storage.stocks.upsert(stock.clone())?;
        self.storage.stocks.save()?;

        tracing::info!(symbol = %stock.symbol, shares = stock.shares, "added stock");
        Ok(stock)
    }

    pub fn find(&self, symbol: &str) -> ExpenseResult<Option<Stock>> {
        self.storage.stocks.get_by_symbol(symbol)
    }

    /// Find a holding, or NotFound
    pub fn require(&self, symbol: &str) -> ExpenseResult<Stock> {
        self.find(symbol)?
            .ok_or_else(|| ExpenseError::stock_not_found(symbol.trim().to_uppercase()))
    }

    pub fn list(&self) -> ExpenseResult<Vec<Stock>> {
        self.storage.stocks.get_all()
    }

    /// Record a close for one holding
    pub fn record_price(&self, symbol: &str, close: Money, date: NaiveDate) -> ExpenseResult<Stock> {
        let mut stock = self.require(symbol)?;
        stock.record_close(date, close);
        self.save(&stock)?;

        tracing::info!(symbol = %stock.symbol, %date, close = %close, "recorded close");
        Ok(stock)
    }

    /// Change the number of shares held
    pub fn set_shares(&self, symbol: &str, shares: f64) -> ExpenseResult<Stock> {
        let mut stock = self.require(symbol)?;
        stock.shares = shares;
        self.save(&stock)?;

        tracing::info!(symbol = %stock.symbol, shares, "updated shares");
        Ok(stock)
    }

    pub fn remove(&self, symbol: &str) -> ExpenseResult<Stock> {
        let stock = self.require(symbol)?;
        self.storage.stocks.delete(stock.id)?;
        self.storage.stocks.save()?;

        tracing::info!(symbol = %stock.symbol, "removed stock");
        Ok(stock)
    }

    /// Record today's total holdings value as the snapshot for `date`
    pub fn snapshot(&self, date: NaiveDate) -> ExpenseResult<PortfolioValue> {
        let value = PortfolioValue {
            date,
            value: portfolio_value(&self.list()?),
        };
        self.storage.stocks.record_portfolio_value(value)?;
        self.storage.stocks.save()?;

        tracing::info!(%date, value = %value.value, "recorded portfolio value");
        Ok(value)
    }

    pub fn portfolio_values(&self) -> ExpenseResult<Vec<PortfolioValue>> {
        self.storage.stocks.portfolio_values()
    }

    /// Drop closes and portfolio values older than the previous month
    pub fn prune_history(&self, today: NaiveDate) -> ExpenseResult<HistoryPruned> {
        let cutoff = history_cutoff(today);
        let prices = self.storage.stocks.prune_prices(cutoff)?;
        let values = self.storage.stocks.prune_values(cutoff)?;
        self.storage.stocks.save()?;

        tracing::info!(%cutoff, prices, values, "pruned stock history");
        Ok(HistoryPruned {
            cutoff,
            prices,
            values,
        })
    }

    pub fn report(&self) -> ExpenseResult<PortfolioReport> {
        Ok(portfolio_report(&self.list()?, &self.portfolio_values()?))
    }

    fn save(&self, stock: &Stock) -> ExpenseResult<()> {
        stock
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        self.storage.stocks.upsert(stock.clone())?;
        self.storage.stocks.save()
    }
}
