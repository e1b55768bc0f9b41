//! Report formatting for terminal output

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{Account, DateRange, ExpenseCategory, ExpenseMap, PeriodType};
use crate::reports::{
    BudgetOverview, BudgetReport, CategoryExpenseMap, Dashboard, FinancialSummary, PeriodSummary,
    ProgressEntry, Rollup,
};

use super::transaction::format_transaction_list;
use super::{format_amount, format_date, render_table};

const BAR_WIDTH: usize = 20;

/// Format a percentage with two decimals
pub fn format_percentage(pct: f64) -> String {
    format!("{:.2}%", pct)
}

/// Format a signed change, `+` for increases
pub fn format_change(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{:.2}%", pct)
    } else {
        format!("{:.2}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

fn format_range(range: &DateRange, settings: &Settings) -> String {
    format!(
        "{} - {}",
        format_date(range.first_date(), settings),
        format_date(range.last_date(), settings)
    )
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Change")]
    change: String,
}

fn category_table(
    map: &CategoryExpenseMap,
    composition: &ExpenseMap<f64>,
    change: Option<&ExpenseMap<f64>>,
    settings: &Settings,
) -> String {
    let mut rows: Vec<CategoryRow> = ExpenseCategory::ALL
        .iter()
        .map(|&category| CategoryRow {
            category: category.label().to_string(),
            amount: format_amount(map.category(category), settings),
            share: format_percentage(composition[category]),
            change: change
                .map(|c| format_change(c[category]))
                .unwrap_or_default(),
        })
        .collect();

    for (label, value) in [
        ("EXPENSE", map.expense()),
        ("INCOME", map.income()),
        ("TOTAL", map.total()),
    ] {
        rows.push(CategoryRow {
            category: label.to_string(),
            amount: format_amount(value, settings),
            share: String::new(),
            change: String::new(),
        });
    }

    render_table(rows)
}

/// Per-category sums for a range, with composition and optional change
pub fn format_aggregate(
    range: &DateRange,
    map: &CategoryExpenseMap,
    composition: &ExpenseMap<f64>,
    change: Option<&ExpenseMap<f64>>,
    settings: &Settings,
) -> String {
    format!(
        "Spending {}\n{}\n",
        format_range(range, settings),
        category_table(map, composition, change, settings)
    )
}

pub fn format_financial_summary(summary: &FinancialSummary, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Financial Summary: {}\n",
        format_range(&summary.range, settings)
    ));
    output.push_str(&separator(50));
    output.push('\n');
    output.push_str(&format!(
        "  Total balance:     {}\n",
        format_amount(summary.total_balance, settings)
    ));
    output.push_str(&format!(
        "  Total amount due:  {}\n",
        format_amount(summary.total_amount_due, settings)
    ));
    output.push_str(&format!(
        "  Income this month: {}\n",
        format_amount(summary.total_income, settings)
    ));
    output.push_str(&format!(
        "  Total this month:  {}\n\n",
        format_amount(summary.total_expense, settings)
    ));

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Share")]
        share: String,
        #[tabled(rename = "vs last month")]
        change: String,
    }

    let rows: Vec<Row> = ExpenseCategory::ALL
        .iter()
        .map(|&c| Row {
            category: c.label().to_string(),
            share: format_percentage(summary.composition_percentage[c]),
            change: format_change(summary.change_percentage[c]),
        })
        .collect();
    output.push_str(&render_table(rows));
    output.push_str("\n\nDaily expense\n");

    let max = summary.daily_expense.values().cloned().fold(0.0, f64::max);
    for (day, value) in &summary.daily_expense {
        output.push_str(&format!(
            "  {}  {:>12}  {}\n",
            format_date(*day, settings),
            format_amount(*value, settings),
            format_bar(*value, max, BAR_WIDTH)
        ));
    }

    output
}

fn largest_category(summary: &PeriodSummary) -> Option<(ExpenseCategory, f64)> {
    summary
        .expense_composition
        .iter()
        .filter(|(_, share)| **share > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(c, share)| (c, *share))
}

#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Largest category")]
    largest: String,
    #[tabled(rename = "Busiest day")]
    busiest: String,
}

pub fn format_rollup(rollup: &Rollup, settings: &Settings) -> String {
    let mut output = String::new();

    for period_type in PeriodType::ALL {
        let Some(summaries) = rollup.get(&period_type) else {
            continue;
        };

        let rows: Vec<PeriodRow> = summaries
            .iter()
            .map(|s| PeriodRow {
                period: format!(
                    "{} - {}",
                    format_date(s.first_date, settings),
                    format_date(s.last_date, settings)
                ),
                total: format_amount(s.total, settings),
                largest: largest_category(s)
                    .map(|(c, share)| format!("{} ({})", c.label(), format_percentage(share)))
                    .unwrap_or_default(),
                busiest: s
                    .daily_expense
                    .iter()
                    .filter(|(_, v)| **v > 0.0)
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(d, v)| format!("{} ({})", format_date(*d, settings), format_amount(*v, settings)))
                    .unwrap_or_default(),
            })
            .collect();

        output.push_str(&format!("{}\n{}\n\n", title_for(period_type), render_table(rows)));
    }

    output
}

fn title_for(period_type: PeriodType) -> &'static str {
    match period_type {
        PeriodType::Month => "Monthly",
        PeriodType::BiWeek => "Bi-weekly",
        PeriodType::Week => "Weekly",
    }
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

fn progress_cells(entry: &ProgressEntry, settings: &Settings) -> (String, String, String) {
    let bar = format_bar(entry.percentage.as_f64(), 100.0, BAR_WIDTH);
    let progress = if entry.percentage.is_reached() {
        format!("{} reached", bar)
    } else {
        format!("{} {}", bar, format_percentage(entry.percentage.as_f64()))
    };
    (
        format_amount(entry.budget, settings),
        format_amount(entry.current, settings),
        progress,
    )
}

pub fn format_budget_report(report: &BudgetReport, settings: &Settings) -> String {
    let mut rows = Vec::with_capacity(report.progress.categories.len() + 1);

    let (budget, spent, progress) = progress_cells(&report.progress.expense, settings);
    rows.push(BudgetRow {
        category: "EXPENSE".to_string(),
        goal: format_percentage(report.expense_portion),
        actual: String::new(),
        budget,
        spent,
        progress,
    });

    for (category, entry) in &report.progress.categories {
        let (budget, spent, progress) = progress_cells(entry, settings);
        rows.push(BudgetRow {
            category: category.label().to_string(),
            goal: report
                .composition
                .goal
                .get(category)
                .map(|g| format_percentage(*g))
                .unwrap_or_default(),
            actual: report
                .composition
                .actual
                .get(category)
                .map(|a| format_percentage(*a))
                .unwrap_or_else(|| "-".to_string()),
            budget,
            spent,
            progress,
        });
    }

    format!(
        "{} budget: {} (income {})\n{}\n",
        title_for(report.interval_type),
        format_range(&report.range, settings),
        format_amount(report.income, settings),
        render_table(rows)
    )
}

pub fn format_budget_overview(overview: &BudgetOverview, settings: &Settings) -> String {
    let reports: Vec<&BudgetReport> = PeriodType::ALL
        .iter()
        .filter_map(|p| overview.get(*p))
        .collect();

    if reports.is_empty() {
        return "No budget plans found.".to_string();
    }

    reports
        .into_iter()
        .map(|r| format_budget_report(r, settings))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_dashboard(dashboard: &Dashboard, accounts: &[Account], settings: &Settings) -> String {
    format!(
        "{}Recent transactions\n{}\n",
        format_rollup(&dashboard.rollup, settings),
        format_transaction_list(&dashboard.recent_transactions, accounts, settings)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, BudgetPlan, Category, Money, Transaction};
    use crate::reports::{aggregate, budget_report, expense_composition, rollup};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new(
                AccountId::new(),
                "Rent",
                Category::Expense(ExpenseCategory::Housing),
                Money::from_cents(30000),
                date(5),
            ),
            Transaction::new(AccountId::new(), "Pay", Category::Income, Money::from_cents(20000), date(6)),
        ]
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 100.0, 4), "    ");
        assert_eq!(format_bar(150.0, 100.0, 4), "████");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(12.5), "+12.50%");
        assert_eq!(format_change(-3.0), "-3.00%");
        assert_eq!(format_change(0.0), "0.00%");
    }

    #[test]
    fn test_aggregate_output() {
        let txns = sample();
        let range = DateRange::new(date(1), date(31)).unwrap();
        let map = aggregate(&txns, &range).unwrap();
        let composition = expense_composition(&txns, &range).unwrap();

        let output = format_aggregate(&range, &map, &composition, None, &Settings::default());
        assert!(output.contains("03/01/2024 - 03/31/2024"));
        assert!(output.contains("HOUSING"));
        assert!(output.contains("$300.00"));
        assert!(output.contains("100.00%"));
        assert!(output.contains("$500.00"));
    }

    #[test]
    fn test_budget_report_output() {
        let plans = vec![BudgetPlan::new(PeriodType::Month, Money::from_cents(500000), 80.0)];
        let report = budget_report(&plans, &sample(), PeriodType::Month, date(13))
            .unwrap()
            .unwrap();

        let output = format_budget_report(&report, &Settings::default());
        assert!(output.starts_with("Monthly budget"));
        assert!(output.contains("$400.00"));
        assert!(output.contains("75.00%"));
    }

    #[test]
    fn test_rollup_output_has_each_period_type() {
        let result = rollup(&sample(), date(13), 2).unwrap();
        let output = format_rollup(&result, &Settings::default());

        assert!(output.contains("Monthly"));
        assert!(output.contains("Bi-weekly"));
        assert!(output.contains("Weekly"));
        assert!(output.contains("HOUSING (100.00%)"));
    }

    #[test]
    fn test_empty_overview() {
        let overview = BudgetOverview {
            month: None,
            bi_week: None,
            week: None,
        };
        assert_eq!(
            format_budget_overview(&overview, &Settings::default()),
            "No budget plans found."
        );
    }
}
