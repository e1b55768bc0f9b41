//! Budget plan analytics
//!
//! A plan is compared against the spending in its interval's current period:
//! composition puts the plan's category split next to the actual split, and
//! progress measures spending against each category's share of the budget.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ExpenseResult;
use crate::models::period::current_period;
use crate::models::{BudgetPlan, BudgetPlanId, DateRange, ExpenseCategory, PeriodType};

use super::aggregate::{aggregate, CategoryExpenseMap};
use super::percent_of;
use super::source::{BudgetPlanSource, TransactionSource};

/// The plan's category split next to the split actually spent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComposition {
    pub goal: BTreeMap<ExpenseCategory, f64>,
    /// Empty when nothing was spent in the period
    pub actual: BTreeMap<ExpenseCategory, f64>,
}

/// How far spending has progressed toward a budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressPercentage {
    /// Spending below budget, in percent rounded to two places
    Partial(f64),
    /// Spending at or over budget
    Reached,
}

impl ProgressPercentage {
    pub fn as_f64(&self) -> f64 {
        match self {
            ProgressPercentage::Partial(p) => *p,
            ProgressPercentage::Reached => 100.0,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, ProgressPercentage::Reached)
    }
}

impl Serialize for ProgressPercentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProgressPercentage::Partial(p) => serializer.serialize_f64(*p),
            ProgressPercentage::Reached => serializer.serialize_u64(100),
        }
    }
}

/// Budget, spending and progress for one line of a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressEntry {
    pub budget: f64,
    pub current: f64,
    pub percentage: ProgressPercentage,
}

impl ProgressEntry {
    /// Reached whenever `current` is not below `budget`, including a zero budget
    pub fn new(budget: f64, current: f64) -> Self {
        let percentage = if current < budget {
            ProgressPercentage::Partial(percent_of(current, budget))
        } else {
            ProgressPercentage::Reached
        };
        Self {
            budget,
            current,
            percentage,
        }
    }
}

/// Progress for the whole expense budget and each planned category
///
/// Serializes flat, with "Expense" first and categories after it.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub expense: ProgressEntry,
    pub categories: BTreeMap<ExpenseCategory, ProgressEntry>,
}

impl BudgetProgress {
    pub fn category(&self, category: ExpenseCategory) -> Option<&ProgressEntry> {
        self.categories.get(&category)
    }
}

impl Serialize for BudgetProgress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len() + 1))?;
        map.serialize_entry("Expense", &self.expense)?;
        for (category, entry) in &self.categories {
            map.serialize_entry(category.name(), entry)?;
        }
        map.end()
    }
}

pub fn budget_composition_of(plan: &BudgetPlan, map: &CategoryExpenseMap) -> BudgetComposition {
    let goal = plan.category_portion.clone();
    let expense = map.expense();

    let actual = if expense == 0.0 {
        BTreeMap::new()
    } else {
        goal.keys()
            .map(|category| (*category, percent_of(map.category(*category), expense)))
            .collect()
    };

    BudgetComposition { goal, actual }
}

/// Compare the plan's category split with spending in `range`
pub fn budget_composition<S>(
    plan: &BudgetPlan,
    source: &S,
    range: &DateRange,
) -> ExpenseResult<BudgetComposition>
where
    S: TransactionSource + ?Sized,
{
    Ok(budget_composition_of(plan, &aggregate(source, range)?))
}

pub fn budget_progress_of(plan: &BudgetPlan, map: &CategoryExpenseMap) -> BudgetProgress {
    let total_budget = plan.total_budget();

    let categories = plan
        .category_portion
        .iter()
        .map(|(category, portion)| {
            let budget = portion * total_budget / 100.0;
            (*category, ProgressEntry::new(budget, map.category(*category)))
        })
        .collect();

    BudgetProgress {
        expense: ProgressEntry::new(total_budget, map.expense()),
        categories,
    }
}

/// Measure spending in `range` against the plan's budgets
pub fn budget_progress<S>(
    plan: &BudgetPlan,
    source: &S,
    range: &DateRange,
) -> ExpenseResult<BudgetProgress>
where
    S: TransactionSource + ?Sized,
{
    Ok(budget_progress_of(plan, &aggregate(source, range)?))
}

/// A plan evaluated over its current period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub id: BudgetPlanId,
    pub interval_type: PeriodType,
    pub income: f64,
    pub expense_portion: f64,
    pub range: DateRange,
    pub composition: BudgetComposition,
    pub progress: BudgetProgress,
}

/// Evaluate the plan for `interval`, or `None` when there is no such plan
pub fn budget_report<P, S>(
    plans: &P,
    source: &S,
    interval: PeriodType,
    today: NaiveDate,
) -> ExpenseResult<Option<BudgetReport>>
where
    P: BudgetPlanSource + ?Sized,
    S: TransactionSource + ?Sized,
{
    let Some(plan) = plans.budget_plan(interval)? else {
        tracing::debug!(interval = %interval, "no budget plan");
        return Ok(None);
    };

    let range = current_period(interval, today, None);
    let map = aggregate(source, &range)?;

    Ok(Some(BudgetReport {
        id: plan.id,
        interval_type: plan.interval_type,
        income: plan.recurring_income.as_f64(),
        expense_portion: plan.portion_for_expense,
        range,
        composition: budget_composition_of(&plan, &map),
        progress: budget_progress_of(&plan, &map),
    }))
}

/// Budget reports for every interval type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub month: Option<BudgetReport>,
    pub bi_week: Option<BudgetReport>,
    pub week: Option<BudgetReport>,
}

impl BudgetOverview {
    pub fn get(&self, interval: PeriodType) -> Option<&BudgetReport> {
        match interval {
            PeriodType::Month => self.month.as_ref(),
            PeriodType::BiWeek => self.bi_week.as_ref(),
            PeriodType::Week => self.week.as_ref(),
        }
    }
}

pub fn budget_overview<P, S>(plans: &P, source: &S, today: NaiveDate) -> ExpenseResult<BudgetOverview>
where
    P: BudgetPlanSource + ?Sized,
    S: TransactionSource + ?Sized,
{
    Ok(BudgetOverview {
        month: budget_report(plans, source, PeriodType::Month, today)?,
        bi_week: budget_report(plans, source, PeriodType::BiWeek, today)?,
        week: budget_report(plans, source, PeriodType::Week, today)?,
    })
}
