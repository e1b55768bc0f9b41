//! Transaction display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{Account, AccountId, Transaction};

use super::{format_date, render_table};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format transactions as a table; income amounts carry a leading `+`
pub fn format_transaction_list(
    transactions: &[Transaction],
    accounts: &[Account],
    settings: &Settings,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let names: HashMap<AccountId, &str> = accounts.iter().map(|a| (a.id, a.name.as_str())).collect();

    let rows = transactions
        .iter()
        .map(|t| {
            let amount = t.amount.format_with_symbol(&settings.currency_symbol);
            TransactionRow {
                date: format_date(t.occur_date, settings),
                account: names
                    .get(&t.account_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| t.account_id.to_string()),
                description: truncate(&t.description, 40),
                category: t.category.label().to_string(),
                amount: if t.is_income() {
                    format!("+{}", amount)
                } else {
                    amount
                },
                id: t.id.to_string(),
            }
        })
        .collect();

    render_table(rows)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
