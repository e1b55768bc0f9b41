//! Account model
//!
//! Debit accounts hold money; a credit account's balance is the amount owed.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;
use super::period::days_in_month;
use super::transaction::Transaction;

/// Longest account or institution name accepted
pub const MAX_NAME_LEN: usize = 50;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Debit,
    Credit,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "checking" | "savings" => Some(Self::Debit),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Debit
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "DEBIT"),
            Self::Credit => write!(f, "CREDIT"),
        }
    }
}

/// A financial account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Number printed on the card or statement
    #[serde(default)]
    pub account_number: i64,

    pub name: String,

    #[serde(default)]
    pub institution: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Funds held (debit) or amount owed (credit)
    pub balance: Money,

    /// Credit accounts only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,

    /// Next payment due date, credit accounts only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Money) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            account_number: 0,
            name: name.into(),
            institution: String::new(),
            account_type,
            balance,
            credit_limit: None,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a transaction's effect to the balance
    ///
    /// Income raises a debit balance and pays down a credit balance; any
    /// expense does the opposite.
    pub fn apply_transaction(&mut self, txn: &Transaction) {
        let signed = if txn.is_income() { -txn.amount } else { txn.amount };
        match self.account_type {
            AccountType::Debit => self.balance -= signed,
            AccountType::Credit => self.balance += signed,
        }
        self.updated_at = Utc::now();
    }

    /// Move a due date that has arrived forward by one calendar month
    ///
    /// Returns true if the date changed.
    pub fn roll_due_date(&mut self, today: NaiveDate) -> bool {
        if self.account_type != AccountType::Credit {
            return false;
        }
        match self.due_date {
            Some(due) if due <= today => {
                self.due_date = Some(add_one_month(due));
                self.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(AccountValidationError::NameTooLong(self.name.chars().count()));
        }

        if self.institution.chars().count() > MAX_NAME_LEN {
            return Err(AccountValidationError::InstitutionTooLong(
                self.institution.chars().count(),
            ));
        }

        if self.balance.is_negative() {
            return Err(AccountValidationError::NegativeBalance(self.balance));
        }

        Ok(())
    }
}

/// Same day next month, clamped to that month's length
fn add_one_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let day = date.day().min(days_in_month(year, month));
    let remaining_this_month = i64::from(days_in_month(date.year(), date.month()) - date.day());
    date + Duration::days(remaining_this_month + i64::from(day))
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    InstitutionTooLong(usize),
    NegativeBalance(Money),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::InstitutionTooLong(len) => write!(
                f,
                "Institution name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
            Self::NegativeBalance(balance) => {
                write!(f, "Account balance cannot be negative (got {})", balance)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
