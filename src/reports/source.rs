//! Data sources the analytics read from
//!
//! The analytics never touch storage directly. Anything that can list the
//! transactions in a date range (a slice, the whole ledger, one account) or
//! look up a budget plan by period type can be reported on.

use crate::error::ExpenseResult;
use crate::models::{BudgetPlan, DateRange, PeriodType, Transaction};

/// A queryable collection of transactions
pub trait TransactionSource {
    /// Transactions whose `occur_date` falls inside `range`
    fn transactions_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>>;

    /// Non-income transactions inside `range`
    fn expenses_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        Ok(self
            .transactions_in(range)?
            .into_iter()
            .filter(|t| !t.is_income())
            .collect())
    }

    /// Income transactions inside `range`
    fn income_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        Ok(self
            .transactions_in(range)?
            .into_iter()
            .filter(Transaction::is_income)
            .collect())
    }
}

impl TransactionSource for [Transaction] {
    fn transactions_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        Ok(self
            .iter()
            .filter(|t| range.contains(t.occur_date))
            .cloned()
            .collect())
    }
}

impl TransactionSource for Vec<Transaction> {
    fn transactions_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        self.as_slice().transactions_in(range)
    }
}

/// Budget plans looked up by period type
pub trait BudgetPlanSource {
    /// The plan for `interval`, if one exists
    fn budget_plan(&self, interval: PeriodType) -> ExpenseResult<Option<BudgetPlan>>;
}

impl BudgetPlanSource for [BudgetPlan] {
    fn budget_plan(&self, interval: PeriodType) -> ExpenseResult<Option<BudgetPlan>> {
        Ok(self.iter().find(|p| p.interval_type == interval).cloned())
    }
}

impl BudgetPlanSource for Vec<BudgetPlan> {
    fn budget_plan(&self, interval: PeriodType) -> ExpenseResult<Option<BudgetPlan>> {
        self.as_slice().budget_plan(interval)
    }
}
