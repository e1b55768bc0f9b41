//! Service layer
//!
//! Business logic on top of the storage layer: validation on write, balance
//! bookkeeping, and the housekeeping jobs (due-date rollover, overdue sweep,
//! retention and price-history pruning).

pub mod account;
pub mod bill;
pub mod budget;
pub mod stock;
pub mod transaction;

pub use account::{AccountDetails, AccountService};
pub use bill::{BillPayment, BillService, SweepOutcome};
pub use budget::{BudgetService, PlanInput};
pub use stock::{HistoryPruned, StockService};
pub use transaction::{NewTransaction, TransactionFilter, TransactionService};
