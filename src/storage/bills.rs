//! Bill and overdue-message repository for JSON storage
//!
//! Both live in bills.json since messages only exist as the residue of
//! swept bills.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::ExpenseError;
use crate::models::{Bill, BillId, OverdueBillMessage};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BillData {
    bills: Vec<Bill>,
    #[serde(default)]
    overdue_messages: Vec<OverdueBillMessage>,
}

/// Repository for bills and overdue-bill messages
pub struct BillRepository {
    path: PathBuf,
    bills: RwLock<HashMap<BillId, Bill>>,
    messages: RwLock<Vec<OverdueBillMessage>>,
}

impl BillRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            bills: RwLock::new(HashMap::new()),
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: BillData = read_json(&self.path)?;

        let mut bills = self.bills.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut messages = self.messages.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        bills.clear();
        for bill in file_data.bills {
            bills.insert(bill.id, bill);
        }
        *messages = file_data.overdue_messages;

        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let file_data = BillData {
            bills: self.get_all()?,
            overdue_messages: self.messages()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: BillId) -> Result<Option<Bill>, ExpenseError> {
        let bills = self.bills.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(bills.get(&id).cloned())
    }

    /// All bills, soonest due first
    pub fn get_all(&self) -> Result<Vec<Bill>, ExpenseError> {
        let bills = self.bills.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut all: Vec<_> = bills.values().cloned().collect();
        all.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.description.cmp(&b.description)));
        Ok(all)
    }

    pub fn upsert(&self, bill: Bill) -> Result<(), ExpenseError> {
        let mut bills = self.bills.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        bills.insert(bill.id, bill);
        Ok(())
    }

    pub fn delete(&self, id: BillId) -> Result<bool, ExpenseError> {
        let mut bills = self.bills.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(bills.remove(&id).is_some())
    }

    /// Remove and return every bill due before `today`
    pub fn take_overdue(&self, today: NaiveDate) -> Result<Vec<Bill>, ExpenseError> {
        let mut bills = self.bills.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let overdue_ids: Vec<BillId> = bills
            .values()
            .filter(|b| b.is_overdue(today))
            .map(|b| b.id)
            .collect();

        let mut overdue: Vec<Bill> = overdue_ids
            .iter()
            .filter_map(|id| bills.remove(id))
            .collect();
        overdue.sort_by_key(|b| b.due_date);
        Ok(overdue)
    }

    pub fn messages(&self) -> Result<Vec<OverdueBillMessage>, ExpenseError> {
        let messages = self.messages.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(messages.clone())
    }

    pub fn add_messages(&self, new: Vec<OverdueBillMessage>) -> Result<(), ExpenseError> {
        let mut messages = self.messages.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        messages.extend(new);
        Ok(())
    }

    /// Drop messages that appeared before `today`, returning how many went
    pub fn expire_messages(&self, today: NaiveDate) -> Result<usize, ExpenseError> {
        let mut messages = self.messages.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = messages.len();
        messages.retain(|m| m.appear_date >= today);
        Ok(before - messages.len())
    }
}
