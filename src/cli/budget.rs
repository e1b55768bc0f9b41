//! Budget plan CLI commands

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::report::{format_budget_overview, format_budget_report};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::ExpenseCategory;
use crate::services::{BudgetService, PlanInput};
use crate::storage::Storage;

use super::{parse_money_arg, parse_period_arg, print_json};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create or update the plan for a period type
    Set {
        /// Period type (month, bi_week, week)
        period: String,
        /// Income expected every period
        #[arg(short, long)]
        income: String,
        /// Percentage of income set aside for expenses
        #[arg(short, long)]
        portion: f64,
        /// Category split, e.g. "Housing=40,Grocery=20,Others=40". A new plan
        /// gives categories left out 0 (10% each and 20% Others without
        /// --split); an existing plan keeps their current share
        #[arg(short, long)]
        split: Option<String>,
    },
    /// Show plan progress for one period type, or all plans
    Show {
        /// Period type (month, bi_week, week)
        period: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the plan for a period type
    Delete {
        /// Period type (month, bi_week, week)
        period: String,
    },
}

/// Parse "Category=pct,Category=pct" into the listed shares
fn parse_split(s: &str) -> ExpenseResult<BTreeMap<ExpenseCategory, f64>> {
    let mut split = BTreeMap::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, pct) = part.split_once('=').ok_or_else(|| {
            ExpenseError::Budget(format!("Expected CATEGORY=PERCENT, got '{}'", part))
        })?;
        let category: ExpenseCategory = name
            .parse()
            .map_err(|e| ExpenseError::Budget(format!("{}", e)))?;
        let pct: f64 = pct
            .trim()
            .parse()
            .map_err(|_| ExpenseError::Budget(format!("Invalid percentage in '{}'", part)))?;
        split.insert(category, pct);
    }

    Ok(split)
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: BudgetCommands,
) -> ExpenseResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set {
            period,
            income,
            portion,
            split,
        } => {
            let period = parse_period_arg(&period)?;
            let input = PlanInput {
                recurring_income: parse_money_arg(&income)?,
                portion_for_expense: portion,
                category_portion: split.as_deref().map(parse_split).transpose()?,
            };

            let plan = service.set(period, input)?;
            println!("Saved {}", plan);
            println!(
                "  Expense budget per period: {}{:.2}",
                settings.currency_symbol,
                plan.total_budget()
            );
        }

        BudgetCommands::Show { period, json } => match period {
            Some(period) => {
                let period = parse_period_arg(&period)?;
                let report = service.report(period, today)?;
                match (report, json) {
                    (report, true) => print_json(&report)?,
                    (Some(report), false) => print!("{}", format_budget_report(&report, settings)),
                    (None, false) => println!("No {} budget plan.", period),
                }
            }
            None => {
                let overview = service.overview(today)?;
                if json {
                    print_json(&overview)?;
                } else {
                    println!("{}", format_budget_overview(&overview, settings));
                }
            }
        },

        BudgetCommands::Delete { period } => {
            let period = parse_period_arg(&period)?;
            service.delete(period)?;
            println!("Deleted {} budget plan.", period);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split() {
        let split = parse_split("Housing=40, Food & Drink=20,others=40").unwrap();
        assert_eq!(split[&ExpenseCategory::Housing], 40.0);
        assert_eq!(split[&ExpenseCategory::Dining], 20.0);
        assert_eq!(split[&ExpenseCategory::Others], 40.0);
        assert!(!split.contains_key(&ExpenseCategory::Gas));
        assert_eq!(split.len(), 3);
    }

    #[test]
    fn test_parse_split_errors() {
        assert!(matches!(parse_split("Housing"), Err(ExpenseError::Budget(_))));
        assert!(matches!(parse_split("Income=10"), Err(ExpenseError::Budget(_))));
        assert!(matches!(parse_split("Housing=lots"), Err(ExpenseError::Budget(_))));
    }
}
