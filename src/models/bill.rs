//! Bills and overdue-bill messages

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, ExpenseCategory};
use super::ids::{AccountId, BillId, OverdueMessageId};
use super::money::Money;
use super::transaction::MAX_DESCRIPTION_LEN;

/// Smallest bill amount, one dollar
pub const MIN_BILL_AMOUNT: Money = Money::from_cents(100);

fn default_bill_category() -> Category {
    Category::Expense(ExpenseCategory::Housing)
}

/// An upcoming payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,

    /// Account the payment is drawn from when paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_account: Option<AccountId>,

    pub description: String,

    #[serde(default = "default_bill_category")]
    pub category: Category,

    pub amount: Money,

    pub due_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(description: impl Into<String>, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: BillId::new(),
            pay_account: None,
            description: description.into(),
            category: default_bill_category(),
            amount,
            due_date,
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_pay_account(mut self, account: AccountId) -> Self {
        self.pay_account = Some(account);
        self
    }

    /// A bill is overdue once its due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    /// Description used for the transaction recorded when the bill is paid
    pub fn payment_description(&self) -> String {
        format!("Payment: {}", self.description)
    }

    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.amount < MIN_BILL_AMOUNT {
            return Err(BillValidationError::AmountTooSmall(self.amount));
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(BillValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} due {}", self.description, self.amount, self.due_date)
    }
}

/// Validation errors for bills
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillValidationError {
    AmountTooSmall(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountTooSmall(amount) => {
                write!(f, "Bill amount must be at least $1.00 (got {})", amount)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for BillValidationError {}

/// Notice left behind when an unpaid bill is swept after its due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueBillMessage {
    pub id: OverdueMessageId,
    pub bill_description: String,
    pub bill_amount: Money,
    pub bill_due_date: NaiveDate,
    /// Day the message was raised; it is dropped on the next day's sweep
    pub appear_date: NaiveDate,
}

impl OverdueBillMessage {
    pub fn for_bill(bill: &Bill, today: NaiveDate) -> Self {
        Self {
            id: OverdueMessageId::new(),
            bill_description: bill.description.clone(),
            bill_amount: bill.amount,
            bill_due_date: bill.due_date,
            appear_date: today,
        }
    }
}

impl fmt::Display for OverdueBillMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bill '{}' for {} was due {}",
            self.bill_description, self.bill_amount, self.bill_due_date
        )
    }
}
