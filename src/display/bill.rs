//! Bill and overdue-message display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{Account, Bill, OverdueBillMessage};

use super::{format_date, render_table};

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Pay from")]
    pay_from: String,
    #[tabled(rename = "ID")]
    id: String,
}

pub fn format_bill_list(bills: &[Bill], accounts: &[Account], settings: &Settings) -> String {
    if bills.is_empty() {
        return "No bills found.".to_string();
    }

    let rows = bills
        .iter()
        .map(|b| BillRow {
            due: format_date(b.due_date, settings),
            description: b.description.clone(),
            category: b.category.label().to_string(),
            amount: b.amount.format_with_symbol(&settings.currency_symbol),
            pay_from: b
                .pay_account
                .and_then(|id| accounts.iter().find(|a| a.id == id))
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            id: b.id.to_string(),
        })
        .collect();

    render_table(rows)
}

pub fn format_message_list(messages: &[OverdueBillMessage], settings: &Settings) -> String {
    if messages.is_empty() {
        return "No overdue bills.".to_string();
    }

    messages
        .iter()
        .map(|m| {
            format!(
                "Overdue: '{}' for {} was due {}\n",
                m.bill_description,
                m.bill_amount.format_with_symbol(&settings.currency_symbol),
                format_date(m.bill_due_date, settings)
            )
        })
        .collect()
}
