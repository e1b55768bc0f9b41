//! Storage layer
//!
//! JSON file storage with atomic writes. Each repository holds its entities
//! in memory behind a lock and is flushed explicitly with `save`.

pub mod accounts;
pub mod bills;
pub mod budget;
pub mod file_io;
pub mod stocks;
pub mod transactions;

pub use accounts::AccountRepository;
pub use bills::BillRepository;
pub use budget::BudgetPlanRepository;
pub use file_io::{read_json, write_json_atomic};
pub use stocks::StockRepository;
pub use transactions::{AccountTransactions, TransactionRepository};

use crate::config::paths::TrackerPaths;
use crate::error::ExpenseError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TrackerPaths,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub budget_plans: BudgetPlanRepository,
    pub bills: BillRepository,
    pub stocks: StockRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: TrackerPaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budget_plans: BudgetPlanRepository::new(paths.budget_plans_file()),
            bills: BillRepository::new(paths.bills_file()),
            stocks: StockRepository::new(paths.stocks_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), ExpenseError> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.budget_plans.load()?;
        self.bills.load()?;
        self.stocks.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ExpenseError> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.budget_plans.save()?;
        self.bills.save()?;
        self.stocks.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
