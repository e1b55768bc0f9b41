//! Budget plan service
//!
//! Plans are validated here on write so the analytics can assume portions sum
//! to 100 and there is at most one plan per interval type.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::budget::BudgetPlanValidationError;
use crate::models::{BudgetPlan, ExpenseCategory, Money, PeriodType};
use crate::reports::{budget_overview, budget_report, BudgetOverview, BudgetReport};
use crate::storage::Storage;

/// Fields for creating or replacing a plan
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub recurring_income: Money,
    pub portion_for_expense: f64,
    /// Per-category shares. A new plan gives unlisted categories 0 (or uses
    /// the standard split when absent); an update keeps their current share.
    pub category_portion: Option<BTreeMap<ExpenseCategory, f64>>,
}

/// Service for budget plans
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create the plan for `interval`
    pub fn create(&self, interval: PeriodType, input: PlanInput) -> ExpenseResult<BudgetPlan> {
        let mut plan = BudgetPlan::new(interval, input.recurring_income, input.portion_for_expense);
        if let Some(portions) = input.category_portion {
            let mut split: BTreeMap<ExpenseCategory, f64> =
                ExpenseCategory::ALL.iter().map(|c| (*c, 0.0)).collect();
            split.extend(portions);
            plan = plan.with_category_portion(split);
        }

        self.check(&plan)?;
        self.storage.budget_plans.upsert(plan.clone())?;
        self.storage.budget_plans.save()?;

        tracing::info!(interval = %interval, "created budget plan");
        Ok(plan)
    }

    /// Replace the figures of the existing plan for `interval`
    ///
    /// Supplied category shares are merged into the current split before the
    /// plan is validated. The interval type of a plan never changes.
    pub fn update(&self, interval: PeriodType, input: PlanInput) -> ExpenseResult<BudgetPlan> {
        let mut plan = self.require(interval)?;

        plan.recurring_income = input.recurring_income;
        plan.portion_for_expense = input.portion_for_expense;
        if let Some(portions) = input.category_portion {
            plan.category_portion.extend(portions);
        }
        plan.updated_at = Utc::now();

        self.check(&plan)?;
        self.storage.budget_plans.upsert(plan.clone())?;
        self.storage.budget_plans.save()?;

        tracing::info!(interval = %interval, "updated budget plan");
        Ok(plan)
    }

    /// Update the plan for `interval` if there is one, else create it
    pub fn set(&self, interval: PeriodType, input: PlanInput) -> ExpenseResult<BudgetPlan> {
        if self.get(interval)?.is_some() {
            self.update(interval, input)
        } else {
            self.create(interval, input)
        }
    }

    pub fn get(&self, interval: PeriodType) -> ExpenseResult<Option<BudgetPlan>> {
        self.storage.budget_plans.get_by_interval(interval)
    }

    fn require(&self, interval: PeriodType) -> ExpenseResult<BudgetPlan> {
        self.get(interval)?
            .ok_or_else(|| ExpenseError::budget_plan_not_found(interval.as_str()))
    }

    pub fn list(&self) -> ExpenseResult<Vec<BudgetPlan>> {
        self.storage.budget_plans.get_all()
    }

    pub fn delete(&self, interval: PeriodType) -> ExpenseResult<BudgetPlan> {
        let plan = self.require(interval)?;
        self.storage.budget_plans.delete(plan.id)?;
        self.storage.budget_plans.save()?;

        tracing::info!(interval = %interval, "deleted budget plan");
        Ok(plan)
    }

    /// The plan for `interval` evaluated over its current period
    pub fn report(&self, interval: PeriodType, today: NaiveDate) -> ExpenseResult<Option<BudgetReport>> {
        budget_report(
            &self.storage.budget_plans,
            &self.storage.transactions,
            interval,
            today,
        )
    }

    pub fn overview(&self, today: NaiveDate) -> ExpenseResult<BudgetOverview> {
        budget_overview(&self.storage.budget_plans, &self.storage.transactions, today)
    }

    fn check(&self, plan: &BudgetPlan) -> ExpenseResult<()> {
        let existing = self.storage.budget_plans.get_all()?;
        plan.validate_against(&existing).map_err(|e| match e {
            BudgetPlanValidationError::OverlappingInterval(interval) => ExpenseError::Duplicate {
                entity_type: "Budget plan",
                identifier: interval.to_string(),
            },
            other => ExpenseError::Validation(other.to_string()),
        })
    }
}
