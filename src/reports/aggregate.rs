//! Per-category sums over a date range
//!
//! Amounts are summed in cents and converted to currency units once, so the
//! `Total == Expense + Income` and `Expense == sum of categories` identities
//! hold exactly.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ExpenseResult;
use crate::models::{Category, DateRange, ExpenseCategory, ExpenseMap, Money, Transaction};

use super::source::TransactionSource;

/// Expense per category plus the Expense, Income and Total rollups
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExpenseMap {
    categories: ExpenseMap<f64>,
    expense: f64,
    income: f64,
}

impl CategoryExpenseMap {
    /// Sum already-filtered transactions
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut cents: ExpenseMap<Money> = ExpenseMap::default();
        let mut income = Money::zero();

        for txn in transactions {
            match txn.category {
                Category::Income => income += txn.amount,
                Category::Expense(category) => cents[category] += txn.amount,
            }
        }

        let categories = cents.map(|_, amount| amount.as_f64());
        let expense = categories.values().sum();

        Self {
            categories,
            expense,
            income: income.as_f64(),
        }
    }

    /// The sum for one expense category
    pub fn category(&self, category: ExpenseCategory) -> f64 {
        self.categories[category]
    }

    /// The sum for any category; Income gives the income total
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Income => self.income,
            Category::Expense(category) => self.categories[category],
        }
    }

    pub fn categories(&self) -> &ExpenseMap<f64> {
        &self.categories
    }

    /// Sum of every non-income transaction
    pub fn expense(&self) -> f64 {
        self.expense
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    /// Expense plus income
    pub fn total(&self) -> f64 {
        self.expense + self.income
    }
}

impl Default for CategoryExpenseMap {
    fn default() -> Self {
        Self::from_transactions(&[])
    }
}

impl Serialize for CategoryExpenseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ExpenseCategory::COUNT + 3))?;
        for (category, value) in self.categories.iter() {
            map.serialize_entry(category.name(), value)?;
        }
        map.serialize_entry("Expense", &self.expense)?;
        map.serialize_entry("Income", &self.income)?;
        map.serialize_entry("Total", &self.total())?;
        map.end()
    }
}

/// Aggregate the transactions in `range`
pub fn aggregate<S>(source: &S, range: &DateRange) -> ExpenseResult<CategoryExpenseMap>
where
    S: TransactionSource + ?Sized,
{
    let transactions = source.transactions_in(range)?;
    let map = CategoryExpenseMap::from_transactions(&transactions);
    tracing::debug!(
        %range,
        count = transactions.len(),
        expense = map.expense(),
        income = map.income(),
        "aggregated transactions"
    );
    Ok(map)
}
