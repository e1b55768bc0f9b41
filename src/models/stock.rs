//! Stock holdings and portfolio value snapshots
//!
//! Closing prices are entered by hand; nothing here talks to a market-data
//! provider.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::StockId;
use super::money::Money;

pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_STOCK_NAME_LEN: usize = 100;

/// A position in one ticker symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,

    /// Upper-case ticker, unique across holdings
    pub symbol: String,

    #[serde(default)]
    pub name: String,

    pub shares: f64,

    /// Close before the latest one
    pub previous_close: Money,

    pub current_close: Money,

    /// Date of `current_close`
    pub last_updated_date: NaiveDate,

    /// Close per trading date
    #[serde(default)]
    pub price_history: BTreeMap<NaiveDate, Money>,

    pub created_at: DateTime<Utc>,
}

/// Trim and upper-case a ticker symbol
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

impl Stock {
    pub fn new(symbol: &str, shares: f64, close: Money, date: NaiveDate) -> Self {
        Self {
            id: StockId::new(),
            symbol: normalize_symbol(symbol),
            name: String::new(),
            shares,
            previous_close: close,
            current_close: close,
            last_updated_date: date,
            price_history: BTreeMap::from([(date, close)]),
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Record the close for `date`
    ///
    /// A date after the last update makes this the current close and moves the
    /// old one to `previous_close`. A correction for the last update date only
    /// replaces the current close. Earlier dates only fill in the history.
    pub fn record_close(&mut self, date: NaiveDate, close: Money) {
        self.price_history.insert(date, close);

        if date > self.last_updated_date {
            self.previous_close = self.current_close;
            self.current_close = close;
            self.last_updated_date = date;
        } else if date == self.last_updated_date {
            self.current_close = close;
        }
    }

    /// Movement from the previous close to the current one
    pub fn change(&self) -> Money {
        self.current_close - self.previous_close
    }

    /// Shares times the current close, rounded to the cent
    pub fn value(&self) -> Money {
        Money::from_cents((self.shares * self.current_close.cents() as f64).round() as i64)
    }

    /// Drop closes dated before `cutoff`, returning how many went
    pub fn prune_history(&mut self, cutoff: NaiveDate) -> usize {
        let before = self.price_history.len();
        self.price_history.retain(|date, _| *date >= cutoff);
        before - self.price_history.len()
    }

    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol == normalize_symbol(symbol)
    }

    pub fn validate(&self) -> Result<(), StockValidationError> {
        if self.symbol.is_empty() {
            return Err(StockValidationError::EmptySymbol);
        }

        let len = self.symbol.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(StockValidationError::SymbolTooLong(len));
        }

        if !self
            .symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(StockValidationError::InvalidSymbol(self.symbol.clone()));
        }

        if self.name.chars().count() > MAX_STOCK_NAME_LEN {
            return Err(StockValidationError::NameTooLong(self.name.chars().count()));
        }

        if !self.shares.is_finite() || self.shares < 0.0 {
            return Err(StockValidationError::InvalidShares(self.shares));
        }

        if let Some(close) = [self.current_close, self.previous_close]
            .into_iter()
            .chain(self.price_history.values().copied())
            .find(|c| c.is_negative())
        {
            return Err(StockValidationError::NegativeClose(close));
        }

        Ok(())
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} @ {}", self.symbol, self.shares, self.current_close)
    }
}

/// Validation errors for stock holdings
#[derive(Debug, Clone, PartialEq)]
pub enum StockValidationError {
    EmptySymbol,
    SymbolTooLong(usize),
    InvalidSymbol(String),
    NameTooLong(usize),
    InvalidShares(f64),
    NegativeClose(Money),
}

impl fmt::Display for StockValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySymbol => write!(f, "Stock symbol cannot be empty"),
            Self::SymbolTooLong(len) => write!(
                f,
                "Stock symbol too long ({} chars, max {})",
                len, MAX_SYMBOL_LEN
            ),
            Self::InvalidSymbol(symbol) => write!(
                f,
                "Stock symbol '{}' may only contain letters, digits, '.' and '-'",
                symbol
            ),
            Self::NameTooLong(len) => write!(
                f,
                "Stock name too long ({} chars, max {})",
                len, MAX_STOCK_NAME_LEN
            ),
            Self::InvalidShares(shares) => {
                write!(f, "Shares must be zero or more (got {})", shares)
            }
            Self::NegativeClose(close) => {
                write!(f, "Closing price cannot be negative (got {})", close)
            }
        }
    }
}

impl std::error::Error for StockValidationError {}

/// Total value of all holdings at the close of one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioValue {
    pub date: NaiveDate,
    pub value: Money,
}
