//! Stock holding and portfolio value repository for JSON storage

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::ExpenseError;
use crate::models::{Money, PortfolioValue, Stock, StockId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StockData {
    stocks: Vec<Stock>,
    #[serde(default)]
    portfolio_values: Vec<PortfolioValue>,
}

/// Repository for stock holdings and daily portfolio values
pub struct StockRepository {
    path: PathBuf,
    stocks: RwLock<HashMap<StockId, Stock>>,
    values: RwLock<BTreeMap<NaiveDate, Money>>,
}

impl StockRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            stocks: RwLock::new(HashMap::new()),
            values: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: StockData = read_json(&self.path)?;

        let mut stocks = self.stocks.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut values = self.values.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        stocks.clear();
        for stock in file_data.stocks {
            stocks.insert(stock.id, stock);
        }
        *values = file_data
            .portfolio_values
            .into_iter()
            .map(|v| (v.date, v.value))
            .collect();

        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let file_data = StockData {
            stocks: self.get_all()?,
            portfolio_values: self.portfolio_values()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: StockId) -> Result<Option<Stock>, ExpenseError> {
        let stocks = self.stocks.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(stocks.get(&id).cloned())
    }

    /// All holdings ordered by symbol
    pub fn get_all(&self) -> Result<Vec<Stock>, ExpenseError> {
        let stocks = self.stocks.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut all: Vec<_> = stocks.values().cloned().collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(all)
    }

    /// Look up a holding by symbol, ignoring case
    pub fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>, ExpenseError> {
        let stocks = self.stocks.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(stocks.values().find(|s| s.matches_symbol(symbol)).cloned())
    }

    pub fn upsert(&self, stock: Stock) -> Result<(), ExpenseError> {
        let mut stocks = self.stocks.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        stocks.insert(stock.id, stock);
        Ok(())
    }

    pub fn delete(&self, id: StockId) -> Result<bool, ExpenseError> {
        let mut stocks = self.stocks.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(stocks.remove(&id).is_some())
    }

    /// Portfolio values, oldest first
    pub fn portfolio_values(&self) -> Result<Vec<PortfolioValue>, ExpenseError> {
        let values = self.values.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(values
            .iter()
            .map(|(date, value)| PortfolioValue {
                date: *date,
                value: *value,
            })
            .collect())
    }

    /// Store the value for its date, replacing any earlier snapshot of that date
    pub fn record_portfolio_value(&self, value: PortfolioValue) -> Result<(), ExpenseError> {
        let mut values = self.values.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        values.insert(value.date, value.value);
        Ok(())
    }

    /// Drop closes dated before `cutoff` from every holding
    pub fn prune_prices(&self, cutoff: NaiveDate) -> Result<usize, ExpenseError> {
        let mut stocks = self.stocks.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(stocks.values_mut().map(|s| s.prune_history(cutoff)).sum())
    }

    /// Drop portfolio values dated before `cutoff`
    pub fn prune_values(&self, cutoff: NaiveDate) -> Result<usize, ExpenseError> {
        let mut values = self.values.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let kept = values.split_off(&cutoff);
        let removed = values.len();
        *values = kept;
        Ok(removed)
    }
}
