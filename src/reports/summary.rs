//! Summary payloads: the financial summary, per-account expense summary and
//! the dashboard

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ExpenseResult;
use crate::models::period::{current_period, month_to_date};
use crate::models::{Account, AccountType, DateRange, Money, PeriodType, Transaction};

use super::aggregate::aggregate;
use super::expense::{
    daily_expense, expense_change, expense_composition_of, total_income, ChangeResult,
    CompositionResult,
};
use super::rollup::{rollup, Rollup};
use super::source::TransactionSource;

/// Money held in debit accounts and owed on credit accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BalanceTotals {
    pub total_balance: Money,
    pub total_amount_due: Money,
}

impl BalanceTotals {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        accounts.iter().fold(Self::default(), |mut totals, account| {
            match account.account_type {
                AccountType::Debit => totals.total_balance += account.balance,
                AccountType::Credit => totals.total_amount_due += account.balance,
            }
            totals
        })
    }
}

/// Headline numbers for the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub range: DateRange,
    pub total_balance: f64,
    pub total_amount_due: f64,
    pub total_income: f64,
    /// Income plus expense this month
    pub total_expense: f64,
    pub change_percentage: ChangeResult,
    pub composition_percentage: CompositionResult,
    /// Month start through today
    pub daily_expense: BTreeMap<NaiveDate, f64>,
}

pub fn financial_summary<S>(
    accounts: &[Account],
    source: &S,
    today: NaiveDate,
) -> ExpenseResult<FinancialSummary>
where
    S: TransactionSource + ?Sized,
{
    let balances = BalanceTotals::from_accounts(accounts);
    let range = current_period(PeriodType::Month, today, None);
    let map = aggregate(source, &range)?;

    Ok(FinancialSummary {
        range,
        total_balance: balances.total_balance.as_f64(),
        total_amount_due: balances.total_amount_due.as_f64(),
        total_income: total_income(source, &range)?,
        total_expense: map.total(),
        change_percentage: expense_change(source, PeriodType::Month, &range)?,
        composition_percentage: expense_composition_of(&map),
        daily_expense: daily_expense(source, &month_to_date(today))?,
    })
}

/// Current-month change and composition for a single account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountExpenseSummary {
    pub range: DateRange,
    pub change_percentage: ChangeResult,
    pub composition_percentage: CompositionResult,
}

/// `source` should already be scoped to the account
pub fn account_expense_summary<S>(source: &S, today: NaiveDate) -> ExpenseResult<AccountExpenseSummary>
where
    S: TransactionSource + ?Sized,
{
    let range = current_period(PeriodType::Month, today, None);
    let map = aggregate(source, &range)?;

    Ok(AccountExpenseSummary {
        range,
        change_percentage: expense_change(source, PeriodType::Month, &range)?,
        composition_percentage: expense_composition_of(&map),
    })
}

/// The rollup plus the latest transactions of the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub rollup: Rollup,
    pub recent_transactions: Vec<Transaction>,
}

pub fn dashboard<S>(
    source: &S,
    today: NaiveDate,
    periods: usize,
    recent: usize,
) -> ExpenseResult<Dashboard>
where
    S: TransactionSource + ?Sized,
{
    let rollup = rollup(source, today, periods)?;

    let month = current_period(PeriodType::Month, today, None);
    let mut recent_transactions = source.transactions_in(&month)?;
    recent_transactions.sort_by(|a, b| {
        b.occur_date
            .cmp(&a.occur_date)
            .then(b.created_at.cmp(&a.created_at))
    });
    recent_transactions.truncate(recent);

    Ok(Dashboard {
        rollup,
        recent_transactions,
    })
}
