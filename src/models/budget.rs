//! Budget plan model
//!
//! A plan splits a recurring income into an expense allowance
//! (`portion_for_expense` percent of income) and divides that allowance
//! between expense categories by percentage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::category::ExpenseCategory;
use super::ids::BudgetPlanId;
use super::money::Money;
use super::period::PeriodType;

/// Most plans one ledger may hold, one per period type
pub const MAX_BUDGET_PLANS: usize = 3;

const PORTION_TOLERANCE: f64 = 1e-6;

/// Default split: 10% to each category, 20% to Others
pub fn default_category_portion() -> BTreeMap<ExpenseCategory, f64> {
    ExpenseCategory::ALL
        .into_iter()
        .map(|c| {
            let portion = if c == ExpenseCategory::Others { 20.0 } else { 10.0 };
            (c, portion)
        })
        .collect()
}

/// Budget plan for one period type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: BudgetPlanId,

    pub interval_type: PeriodType,

    /// Income expected every period
    pub recurring_income: Money,

    /// Percentage of income set aside for expenses, 0 to 100
    pub portion_for_expense: f64,

    /// Percentage of the expense allowance per category; sums to 100
    #[serde(default = "default_category_portion")]
    pub category_portion: BTreeMap<ExpenseCategory, f64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetPlan {
    /// Create a plan with the default category split
    pub fn new(interval_type: PeriodType, recurring_income: Money, portion_for_expense: f64) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetPlanId::new(),
            interval_type,
            recurring_income,
            portion_for_expense,
            category_portion: default_category_portion(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category_portion(mut self, category_portion: BTreeMap<ExpenseCategory, f64>) -> Self {
        self.category_portion = category_portion;
        self
    }

    /// Amount of income budgeted for expenses in one period
    pub fn total_budget(&self) -> f64 {
        self.recurring_income.as_f64() * self.portion_for_expense / 100.0
    }

    /// Sum of all category portions
    pub fn portion_total(&self) -> f64 {
        self.category_portion.values().sum()
    }

    /// Check the plan's own fields
    pub fn validate(&self) -> Result<(), BudgetPlanValidationError> {
        if self.recurring_income < Money::from_cents(1) {
            return Err(BudgetPlanValidationError::IncomeTooSmall(self.recurring_income));
        }

        if !(0.0..=100.0).contains(&self.portion_for_expense) {
            return Err(BudgetPlanValidationError::ExpensePortionOutOfRange(
                self.portion_for_expense,
            ));
        }

        if let Some((category, portion)) = self
            .category_portion
            .iter()
            .find(|(_, p)| !(0.0..=100.0).contains(*p))
        {
            return Err(BudgetPlanValidationError::CategoryPortionOutOfRange(
                *category, *portion,
            ));
        }

        let total = self.portion_total();
        if (total - 100.0).abs() > PORTION_TOLERANCE {
            return Err(BudgetPlanValidationError::PortionsDoNotSumTo100(total));
        }

        Ok(())
    }

    /// Check the plan against the plans already stored
    ///
    /// A stored plan with the same id is the one being replaced and is ignored.
    pub fn validate_against(&self, existing: &[BudgetPlan]) -> Result<(), BudgetPlanValidationError> {
        self.validate()?;

        let others: Vec<&BudgetPlan> = existing.iter().filter(|p| p.id != self.id).collect();

        if others.len() >= MAX_BUDGET_PLANS {
            return Err(BudgetPlanValidationError::TooManyPlans);
        }

        if let Some(clash) = others.iter().find(|p| p.interval_type == self.interval_type) {
            return Err(BudgetPlanValidationError::OverlappingInterval(clash.interval_type));
        }

        Ok(())
    }
}

impl fmt::Display for BudgetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} budget plan: {}% of {}",
            self.interval_type, self.portion_for_expense, self.recurring_income
        )
    }
}

/// Validation errors for budget plans
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetPlanValidationError {
    IncomeTooSmall(Money),
    ExpensePortionOutOfRange(f64),
    CategoryPortionOutOfRange(ExpenseCategory, f64),
    PortionsDoNotSumTo100(f64),
    TooManyPlans,
    OverlappingInterval(PeriodType),
}

impl fmt::Display for BudgetPlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncomeTooSmall(income) => {
                write!(f, "Recurring income must be at least $0.01 (got {})", income)
            }
            Self::ExpensePortionOutOfRange(p) => {
                write!(f, "Expense portion must be between 0 and 100 (got {})", p)
            }
            Self::CategoryPortionOutOfRange(c, p) => {
                write!(f, "Portion for {} must be between 0 and 100 (got {})", c, p)
            }
            Self::PortionsDoNotSumTo100(total) => {
                write!(f, "Category portions must add up to 100% (got {}%)", total)
            }
            Self::TooManyPlans => write!(
                f,
                "The number of budget plans must be less than or equal {}",
                MAX_BUDGET_PLANS
            ),
            Self::OverlappingInterval(interval) => {
                write!(f, "A {} budget plan already exists", interval)
            }
        }
    }
}

impl std::error::Error for BudgetPlanValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(interval: PeriodType) -> BudgetPlan {
        BudgetPlan::new(interval, Money::from_cents(100000), 80.0)
    }

    #[test]
    fn test_default_portions_sum_to_100() {
        let p = plan(PeriodType::Month);
        assert_eq!(p.category_portion.len(), ExpenseCategory::COUNT);
        assert_eq!(p.category_portion[&ExpenseCategory::Others], 20.0);
        assert_eq!(p.portion_total(), 100.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_total_budget() {
        assert_eq!(plan(PeriodType::Week).total_budget(), 800.0);
    }

    #[test]
    fn test_portions_must_sum_to_100() {
        let p = plan(PeriodType::Month).with_category_portion(BTreeMap::from([
            (ExpenseCategory::Housing, 50.0),
            (ExpenseCategory::Others, 40.0),
        ]));
        assert_eq!(
            p.validate(),
            Err(BudgetPlanValidationError::PortionsDoNotSumTo100(90.0))
        );
    }

    #[test]
    fn test_field_ranges() {
        let mut p = plan(PeriodType::Month);
        p.recurring_income = Money::zero();
        assert!(matches!(
            p.validate(),
            Err(BudgetPlanValidationError::IncomeTooSmall(_))
        ));

        let mut p = plan(PeriodType::Month);
        p.portion_for_expense = 100.5;
        assert!(matches!(
            p.validate(),
            Err(BudgetPlanValidationError::ExpensePortionOutOfRange(_))
        ));
    }

    #[test]
    fn test_validate_against_existing() {
        let month = plan(PeriodType::Month);
        let week = plan(PeriodType::Week);

        assert_eq!(
            plan(PeriodType::Month).validate_against(&[month.clone(), week.clone()]),
            Err(BudgetPlanValidationError::OverlappingInterval(PeriodType::Month))
        );
        assert!(plan(PeriodType::BiWeek)
            .validate_against(&[month.clone(), week.clone()])
            .is_ok());

        // Replacing a stored plan does not clash with itself
        let mut edited = month.clone();
        edited.portion_for_expense = 50.0;
        assert!(edited.validate_against(&[month, week]).is_ok());
    }

    #[test]
    fn test_too_many_plans() {
        let existing = vec![
            plan(PeriodType::Month),
            plan(PeriodType::BiWeek),
            plan(PeriodType::Week),
        ];
        assert_eq!(
            plan(PeriodType::Week).validate_against(&existing),
            Err(BudgetPlanValidationError::TooManyPlans)
        );
    }

    #[test]
    fn test_serialization_keys_by_category_name() {
        let p = plan(PeriodType::BiWeek);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["interval_type"], "bi_week");
        assert_eq!(json["category_portion"]["Others"], 20.0);

        let back: BudgetPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
