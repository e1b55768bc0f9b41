//! Core data models
//!
//! Accounts, transactions, categories, budget plans, bills, stock holdings and
//! the period types the analytics are computed over.

pub mod account;
pub mod bill;
pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod stock;
pub mod transaction;

pub use account::{Account, AccountType};
pub use bill::{Bill, OverdueBillMessage};
pub use budget::{BudgetPlan, MAX_BUDGET_PLANS};
pub use category::{Category, ExpenseCategory, ExpenseMap};
pub use ids::{AccountId, BillId, BudgetPlanId, OverdueMessageId, StockId, TransactionId};
pub use money::Money;
pub use period::{DateRange, PeriodType};
pub use stock::{PortfolioValue, Stock};
pub use transaction::Transaction;
