//! Account display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{Account, AccountType, Money};
use crate::reports::BalanceTotals;

use super::{format_date, render_table};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Institution")]
    institution: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Due")]
    due: String,
}

/// Format accounts as a table followed by the balance totals
pub fn format_account_list(accounts: &[Account], settings: &Settings) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let symbol = &settings.currency_symbol;
    let rows = accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.to_string(),
            name: a.name.clone(),
            account_type: a.account_type.to_string(),
            institution: a.institution.clone(),
            balance: a.balance.format_with_symbol(symbol),
            due: a
                .due_date
                .map(|d| format_date(d, settings))
                .unwrap_or_default(),
        })
        .collect();

    let totals = BalanceTotals::from_accounts(accounts);
    format!(
        "{}\nTotal balance:    {}\nTotal amount due: {}\n",
        render_table(rows),
        totals.total_balance.format_with_symbol(symbol),
        totals.total_amount_due.format_with_symbol(symbol),
    )
}

/// Format account details
pub fn format_account_details(account: &Account, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:          {}\n", account.id));
    output.push_str(&format!("  Type:        {}\n", account.account_type));
    if !account.institution.is_empty() {
        output.push_str(&format!("  Institution: {}\n", account.institution));
    }
    if account.account_number != 0 {
        output.push_str(&format!("  Number:      {}\n", account.account_number));
    }

    let balance_label = match account.account_type {
        AccountType::Debit => "Balance:    ",
        AccountType::Credit => "Amount due: ",
    };
    output.push_str(&format!(
        "  {} {}\n",
        balance_label,
        account.balance.format_with_symbol(symbol)
    ));

    if let Some(limit) = account.credit_limit {
        output.push_str(&format!("  Limit:       {}\n", limit.format_with_symbol(symbol)));
        let available: Money = limit - account.balance;
        output.push_str(&format!(
            "  Available:   {}\n",
            available.format_with_symbol(symbol)
        ));
    }
    if let Some(due) = account.due_date {
        output.push_str(&format!("  Due date:    {}\n", format_date(due, settings)));
    }

    output.push_str(&format!(
        "  Created:     {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
