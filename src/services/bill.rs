//! Bill service
//!
//! Paying bills into the ledger and sweeping overdue bills into messages.

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{AccountId, Bill, BillId, Category, Money, OverdueBillMessage, Transaction};
use crate::storage::Storage;

use super::transaction::{NewTransaction, TransactionService};

/// What happened to a paid bill
#[derive(Debug, Clone)]
pub struct BillPayment {
    pub bill: Bill,
    /// The recorded payment, if the bill had an account and wasn't overdue
    pub transaction: Option<Transaction>,
}

/// Result of an overdue sweep
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub new_messages: Vec<OverdueBillMessage>,
    pub expired_messages: usize,
}

/// Service for bills and overdue-bill messages
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        description: &str,
        amount: Money,
        due_date: NaiveDate,
        category: Option<Category>,
        pay_account: Option<AccountId>,
    ) -> ExpenseResult<Bill> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ExpenseError::Validation(
                "Bill description cannot be empty".into(),
            ));
        }

        let mut bill = Bill::new(description, amount, due_date);
        if let Some(category) = category {
            bill = bill.with_category(category);
        }
        if let Some(account_id) = pay_account {
            self.storage
                .accounts
                .get(account_id)?
                .ok_or_else(|| ExpenseError::account_not_found(account_id.to_string()))?;
            bill = bill.with_pay_account(account_id);
        }

        bill.validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        tracing::info!(bill = %bill.description, due = %bill.due_date, "created bill");
        Ok(bill)
    }

    pub fn get(&self, id: BillId) -> ExpenseResult<Option<Bill>> {
        self.storage.bills.get(id)
    }

    /// Find a bill by full or short ID
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Bill>> {
        if let Ok(id) = identifier.parse::<BillId>() {
            return self.storage.bills.get(id);
        }

        Ok(self
            .storage
            .bills
            .get_all()?
            .into_iter()
            .find(|b| b.id.matches_short(identifier)))
    }

    /// Bills, soonest due first
    pub fn list(&self) -> ExpenseResult<Vec<Bill>> {
        self.storage.bills.get_all()
    }

    /// Settle a bill
    ///
    /// A bill with a pay account that is not yet overdue is recorded as a
    /// payment from that account. The bill is removed either way.
    pub fn pay(&self, id: BillId, today: NaiveDate) -> ExpenseResult<BillPayment> {
        let bill = self
            .storage
            .bills
            .get(id)?
            .ok_or_else(|| ExpenseError::bill_not_found(id.to_string()))?;

        let transaction = match bill.pay_account {
            Some(account_id) if !bill.is_overdue(today) => {
                let txn = TransactionService::new(self.storage).record(NewTransaction {
                    account_id,
                    description: bill.payment_description(),
                    category: bill.category,
                    amount: bill.amount,
                    occur_date: today,
                })?;
                Some(txn)
            }
            Some(_) => {
                tracing::warn!(bill = %bill.description, due = %bill.due_date, "bill is overdue; no payment recorded");
                None
            }
            None => None,
        };

        self.storage.bills.delete(id)?;
        self.storage.bills.save()?;

        tracing::info!(bill = %bill.description, paid = transaction.is_some(), "settled bill");
        Ok(BillPayment { bill, transaction })
    }

    /// Turn overdue bills into messages and drop stale messages
    pub fn sweep_overdue(&self, today: NaiveDate) -> ExpenseResult<SweepOutcome> {
        let overdue = self.storage.bills.take_overdue(today)?;
        let new_messages: Vec<OverdueBillMessage> = overdue
            .iter()
            .map(|bill| OverdueBillMessage::for_bill(bill, today))
            .collect();

        self.storage.bills.add_messages(new_messages.clone())?;
        let expired_messages = self.storage.bills.expire_messages(today)?;
        self.storage.bills.save()?;

        tracing::info!(
            overdue = new_messages.len(),
            expired = expired_messages,
            "swept overdue bills"
        );
        Ok(SweepOutcome {
            new_messages,
            expired_messages,
        })
    }

    pub fn messages(&self) -> ExpenseResult<Vec<OverdueBillMessage>> {
        self.storage.bills.messages()
    }
}
