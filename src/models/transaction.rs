//! Transaction model
//!
//! Amounts are always positive; whether money came in or went out is decided
//! by the category (Income vs. everything else).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, ExpenseCategory};
use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Longest description accepted
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Smallest transaction amount, one cent
pub const MIN_AMOUNT: Money = Money::from_cents(1);

/// A single recorded transaction against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Account the money moved through
    pub account_id: AccountId,

    #[serde(default)]
    pub description: String,

    pub category: Category,

    pub amount: Money,

    /// Date the transaction happened (not when it was recorded)
    pub occur_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        account_id: AccountId,
        description: impl Into<String>,
        category: Category,
        amount: Money,
        occur_date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_id,
            description: description.into(),
            category,
            amount,
            occur_date,
            created_at: Utc::now(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.category.is_income()
    }

    /// The expense category, or `None` for income
    pub fn expense_category(&self) -> Option<ExpenseCategory> {
        self.category.expense()
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount < MIN_AMOUNT {
            return Err(TransactionValidationError::AmountTooSmall(self.amount));
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.occur_date, self.amount, self.description, self.category
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    AmountTooSmall(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountTooSmall(amount) => {
                write!(f, "Transaction amount must be at least $0.01 (got {})", amount)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
