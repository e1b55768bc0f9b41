//! Period aggregation and analytics
//!
//! Everything here is a pure function over a [`TransactionSource`] or
//! [`BudgetPlanSource`] plus an explicit "today", so reports are
//! deterministic and can run against plain slices in tests. Portfolio
//! valuation works the same way over slices of stock holdings.

pub mod aggregate;
pub mod budget;
pub mod expense;
pub mod portfolio;
pub mod rollup;
pub mod source;
pub mod summary;

pub use aggregate::{aggregate, CategoryExpenseMap};
pub use budget::{
    budget_composition, budget_overview, budget_progress, budget_report, BudgetComposition,
    BudgetOverview, BudgetProgress, BudgetReport, ProgressEntry, ProgressPercentage,
};
pub use expense::{
    daily_expense, expense_change, expense_composition, total_income, ChangeResult,
    CompositionResult,
};
pub use portfolio::{
    portfolio_report, portfolio_value, stock_detail, value_series, Holding, PortfolioReport,
    StockDetail,
};
pub use rollup::{rollup, PeriodSummary, Rollup};
pub use source::{BudgetPlanSource, TransactionSource};
pub use summary::{
    account_expense_summary, dashboard, financial_summary, AccountExpenseSummary, BalanceTotals,
    Dashboard, FinancialSummary,
};

/// Round to two decimal places, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage rounded to two places
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    round2(part / whole * 100.0)
}
