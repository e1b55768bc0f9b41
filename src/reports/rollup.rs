//! Multi-period rollup
//!
//! The latest N months, bi-weeks and weeks side by side, each with its total,
//! category change and composition, and a day-by-day expense breakdown.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ExpenseResult;
use crate::models::period::latest_periods;
use crate::models::{DateRange, PeriodType};

use super::aggregate::aggregate;
use super::expense::{
    daily_expense, expense_change, expense_composition_of, ChangeResult, CompositionResult,
};
use super::source::TransactionSource;

/// One period of the rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Income plus expense over the period
    pub total: f64,
    pub expense_change: ChangeResult,
    pub expense_composition: CompositionResult,
    pub daily_expense: BTreeMap<NaiveDate, f64>,
}

/// Summaries per period type, most recent period first
pub type Rollup = BTreeMap<PeriodType, Vec<PeriodSummary>>;

pub fn summarize_period<S>(
    source: &S,
    period_type: PeriodType,
    range: &DateRange,
) -> ExpenseResult<PeriodSummary>
where
    S: TransactionSource + ?Sized,
{
    let map = aggregate(source, range)?;

    Ok(PeriodSummary {
        first_date: range.first_date(),
        last_date: range.last_date(),
        total: map.total(),
        expense_change: expense_change(source, period_type, range)?,
        expense_composition: expense_composition_of(&map),
        daily_expense: daily_expense(source, range)?,
    })
}

/// Summarize the `periods` latest months, bi-weeks and weeks
pub fn rollup<S>(source: &S, today: NaiveDate, periods: usize) -> ExpenseResult<Rollup>
where
    S: TransactionSource + ?Sized,
{
    let mut result = Rollup::new();

    for period_type in PeriodType::ALL {
        let summaries = latest_periods(period_type, today, periods)
            .iter()
            .map(|range| summarize_period(source, period_type, range))
            .collect::<ExpenseResult<Vec<_>>>()?;
        result.insert(period_type, summaries);
    }

    tracing::debug!(%today, periods, "built rollup");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Category, ExpenseCategory, Money, Transaction};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn txn(category: impl Into<Category>, cents: i64, occur: NaiveDate) -> Transaction {
        Transaction::new(
            AccountId::new(),
            "test",
            category.into(),
            Money::from_cents(cents),
            occur,
        )
    }

    #[test]
    fn test_rollup_shape() {
        let empty: Vec<Transaction> = Vec::new();
        // Wednesday
        let result = rollup(&empty, date(3, 13), 5).unwrap();

        assert_eq!(result.len(), 3);
        for period_type in PeriodType::ALL {
            assert_eq!(result[&period_type].len(), 5);
        }

        let months = &result[&PeriodType::Month];
        assert_eq!(months[0].first_date, date(3, 1));
        assert_eq!(months[0].last_date, date(3, 31));
        assert_eq!(months[1].first_date, date(2, 1));
        assert_eq!(months[1].last_date, date(2, 29));
        assert_eq!(months[4].first_date, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        assert_eq!(months[0].daily_expense.len(), 31);

        let weeks = &result[&PeriodType::Week];
        assert_eq!(weeks[0].first_date, date(3, 11));
        assert_eq!(weeks[0].last_date, date(3, 17));
        assert_eq!(weeks[1].last_date, date(3, 10));

        let bi_weeks = &result[&PeriodType::BiWeek];
        assert_eq!(bi_weeks[0].first_date, date(3, 4));
        assert_eq!(bi_weeks[0].daily_expense.len(), 14);
    }

    #[test]
    fn test_rollup_values() {
        let txns = vec![
            txn(ExpenseCategory::Dining, 2000, date(3, 12)),
            txn(ExpenseCategory::Dining, 1000, date(3, 5)),
            txn(Category::Income, 10000, date(3, 12)),
        ];
        let result = rollup(&txns, date(3, 13), 2).unwrap();

        let this_week = &result[&PeriodType::Week][0];
        assert_eq!(this_week.total, 120.0);
        assert_eq!(this_week.expense_change[ExpenseCategory::Dining], 100.0);
        assert_eq!(this_week.expense_composition[ExpenseCategory::Dining], 100.0);
        assert_eq!(this_week.daily_expense[&date(3, 12)], 20.0);

        let last_week = &result[&PeriodType::Week][1];
        assert_eq!(last_week.total, 10.0);
        assert_eq!((last_week.first_date, last_week.last_date), (date(3, 4), date(3, 10)));

        let this_month = &result[&PeriodType::Month][0];
        assert_eq!(this_month.total, 130.0);
    }

    #[test]
    fn test_rollup_json_keys() {
        let empty: Vec<Transaction> = Vec::new();
        let result = rollup(&empty, date(3, 13), 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["month"].is_array());
        assert!(json["bi_week"].is_array());
        assert!(json["week"].is_array());
        assert_eq!(json["week"][0]["first_date"], "2024-03-11");
        assert_eq!(json["week"][0]["daily_expense"]["2024-03-11"], 0.0);
    }
}
