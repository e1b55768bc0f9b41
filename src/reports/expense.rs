//! Expense composition, period-over-period change and daily breakdowns

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::ExpenseResult;
use crate::models::period::previous_period;
use crate::models::{DateRange, ExpenseMap, PeriodType};

use super::aggregate::{aggregate, CategoryExpenseMap};
use super::source::TransactionSource;
use super::{percent_of, round2};

/// Share of total expense per category, in percent
pub type CompositionResult = ExpenseMap<f64>;

/// Signed change per category against the previous period, in percent
pub type ChangeResult = ExpenseMap<f64>;

/// Composition of an already-aggregated map
///
/// The denominator is the period's total expense. When nothing was spent
/// every category is 0.0.
pub fn expense_composition_of(map: &CategoryExpenseMap) -> CompositionResult {
    let expense = map.expense();
    if expense == 0.0 {
        return ExpenseMap::from_fn(|_| 0.0);
    }
    map.categories().map(|_, sum| percent_of(*sum, expense))
}

/// Percentage of the range's expense spent in each category
pub fn expense_composition<S>(source: &S, range: &DateRange) -> ExpenseResult<CompositionResult>
where
    S: TransactionSource + ?Sized,
{
    Ok(expense_composition_of(&aggregate(source, range)?))
}

/// Change of one value against its previous-period value
///
/// Spending that appears from nothing counts as a 100% increase, and nothing
/// against nothing is no change.
pub fn change_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current != 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        round2((current - previous) / previous * 100.0)
    }
}

/// Per-category change between two aggregated periods
pub fn expense_change_between(
    current: &CategoryExpenseMap,
    previous: &CategoryExpenseMap,
) -> ChangeResult {
    current
        .categories()
        .map(|category, sum| change_percentage(*sum, previous.category(category)))
}

/// Per-category change of `current` against the period before it
pub fn expense_change<S>(
    source: &S,
    period_type: PeriodType,
    current: &DateRange,
) -> ExpenseResult<ChangeResult>
where
    S: TransactionSource + ?Sized,
{
    let previous = previous_period(period_type, current);
    tracing::debug!(%current, %previous, period = %period_type, "computing expense change");

    let current_map = aggregate(source, current)?;
    let previous_map = aggregate(source, &previous)?;
    Ok(expense_change_between(&current_map, &previous_map))
}

/// Expense per calendar day, every day of the range present
pub fn daily_expense<S>(source: &S, range: &DateRange) -> ExpenseResult<BTreeMap<NaiveDate, f64>>
where
    S: TransactionSource + ?Sized,
{
    let mut cents: BTreeMap<NaiveDate, i64> = range.days().map(|d| (d, 0)).collect();

    for txn in source.expenses_in(range)? {
        if let Some(total) = cents.get_mut(&txn.occur_date) {
            *total += txn.amount.cents();
        }
    }

    Ok(cents
        .into_iter()
        .map(|(day, total)| (day, total as f64 / 100.0))
        .collect())
}

/// Income received in the range
pub fn total_income<S>(source: &S, range: &DateRange) -> ExpenseResult<f64>
where
    S: TransactionSource + ?Sized,
{
    let cents: i64 = source
        .income_in(range)?
        .iter()
        .map(|t| t.amount.cents())
        .sum();
    Ok(cents as f64 / 100.0)
}
