//! Report CLI commands

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use crate::config::Settings;
use crate::display::report::{
    format_aggregate, format_dashboard, format_financial_summary, format_rollup,
};
use crate::error::ExpenseResult;
use crate::models::period::current_period;
use crate::models::{DateRange, PeriodType};
use crate::reports::expense::{expense_change, expense_composition_of};
use crate::reports::{
    aggregate, dashboard, financial_summary, rollup, CategoryExpenseMap, ChangeResult,
    CompositionResult, TransactionSource,
};
use crate::services::AccountService;
use crate::storage::Storage;

use super::{parse_period_arg, parse_range_args, print_json};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Balances and this month's income, spending and trends
    Summary {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-category totals for one period
    Aggregate {
        /// Period type (month, bi_week, week); defaults to the configured one
        #[arg(short, long)]
        period: Option<String>,
        /// Explicit range start, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Explicit range end, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Only this account
        #[arg(short, long)]
        account: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// The latest months, bi-weeks and weeks side by side
    Rollup {
        /// Periods per period type
        #[arg(short = 'n', long)]
        periods: Option<usize>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Rollup plus this month's latest transactions
    Dashboard {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

/// Aggregate, composition and change for one range
#[derive(Serialize)]
struct AggregateReport {
    period_type: PeriodType,
    range: DateRange,
    totals: CategoryExpenseMap,
    expense_composition: CompositionResult,
    expense_change: ChangeResult,
}

fn aggregate_report<S>(source: &S, period_type: PeriodType, range: DateRange) -> ExpenseResult<AggregateReport>
where
    S: TransactionSource + ?Sized,
{
    let totals = aggregate(source, &range)?;
    Ok(AggregateReport {
        period_type,
        range,
        expense_composition: expense_composition_of(&totals),
        expense_change: expense_change(source, period_type, &range)?,
        totals,
    })
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: ReportCommands,
) -> ExpenseResult<()> {
    let accounts = AccountService::new(storage);

    match cmd {
        ReportCommands::Summary { json } => {
            let summary = financial_summary(&accounts.list()?, &storage.transactions, today)?;
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", format_financial_summary(&summary, settings));
            }
        }

        ReportCommands::Aggregate {
            period,
            from,
            to,
            account,
            json,
        } => {
            let period_type = match period {
                Some(p) => parse_period_arg(&p)?,
                None => settings.default_period_type,
            };
            let explicit = parse_range_args(from.as_deref(), to.as_deref())?;
            let range = current_period(period_type, today, explicit);

            let report = match account {
                Some(account) => {
                    let account = accounts.require(&account)?;
                    aggregate_report(&storage.transactions.for_account(account.id), period_type, range)?
                }
                None => aggregate_report(&storage.transactions, period_type, range)?,
            };

            if json {
                print_json(&report)?;
            } else {
                print!(
                    "{}",
                    format_aggregate(
                        &report.range,
                        &report.totals,
                        &report.expense_composition,
                        Some(&report.expense_change),
                        settings
                    )
                );
            }
        }

        ReportCommands::Rollup { periods, json } => {
            let periods = periods.unwrap_or(settings.rollup_periods);
            let result = rollup(&storage.transactions, today, periods)?;
            if json {
                print_json(&result)?;
            } else {
                print!("{}", format_rollup(&result, settings));
            }
        }

        ReportCommands::Dashboard { json } => {
            let result = dashboard(
                &storage.transactions,
                today,
                settings.rollup_periods,
                settings.recent_transactions,
            )?;
            if json {
                print_json(&result)?;
            } else {
                print!("{}", format_dashboard(&result, &accounts.list()?, settings));
            }
        }
    }

    Ok(())
}
