//! Transaction repository for JSON storage
//!
//! Keeps an account index so per-account reports don't scan the whole ledger.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{AccountId, DateRange, Transaction, TransactionId};
use crate::reports::source::TransactionSource;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: by occur date, then by when it was recorded
fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.occur_date
            .cmp(&a.occur_date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

/// Repository for transaction persistence with an account index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    by_account: RwLock<HashMap<AccountId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_account.clear();

        for txn in file_data.transactions {
            by_account.entry(txn.account_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        tracing::debug!(count = data.len(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions for one account, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_account = self.by_account.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_account.get(&account_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions in an inclusive date range, newest first
    pub fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| range.contains(t.occur_date))
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_account.get_mut(&old.account_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_account.entry(txn.account_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete every transaction dated before `cutoff`, returning how many went
    pub fn delete_before(&self, cutoff: NaiveDate) -> Result<usize, ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|_, t| t.occur_date >= cutoff);
        for ids in by_account.values_mut() {
            ids.retain(|id| data.contains_key(id));
        }
        by_account.retain(|_, ids| !ids.is_empty());

        Ok(before - data.len())
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }

    /// Scope reads to a single account
    pub fn for_account(&self, account_id: AccountId) -> AccountTransactions<'_> {
        AccountTransactions {
            repo: self,
            account_id,
        }
    }
}

impl TransactionSource for TransactionRepository {
    fn transactions_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        self.get_by_date_range(range)
    }
}

/// The transactions of one account, as a report source
pub struct AccountTransactions<'a> {
    repo: &'a TransactionRepository,
    account_id: AccountId,
}

impl TransactionSource for AccountTransactions<'_> {
    fn transactions_in(&self, range: &DateRange) -> ExpenseResult<Vec<Transaction>> {
        Ok(self
            .repo
            .get_by_account(self.account_id)?
            .into_iter()
            .filter(|t| range.contains(t.occur_date))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseCategory, Money};
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn txn(account_id: AccountId, cents: i64, occur_date: NaiveDate) -> Transaction {
        Transaction::new(
            account_id,
            "test",
            Category::Expense(ExpenseCategory::Dining),
            Money::from_cents(cents),
            occur_date,
        )
    }

    #[test]
    fn test_save_and_reload_rebuilds_index() {
        let (temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        repo.upsert(txn(account, 100, date(3, 1))).unwrap();
        repo.upsert(txn(AccountId::new(), 200, date(3, 2))).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 2);
        assert_eq!(repo2.get_by_account(account).unwrap().len(), 1);
    }

    #[test]
    fn test_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        repo.upsert(txn(account, 100, date(3, 1))).unwrap();
        repo.upsert(txn(account, 200, date(3, 5))).unwrap();
        repo.upsert(txn(account, 300, date(3, 3))).unwrap();

        let dates: Vec<_> = repo.get_all().unwrap().iter().map(|t| t.occur_date).collect();
        assert_eq!(dates, vec![date(3, 5), date(3, 3), date(3, 1)]);
    }

    #[test]
    fn test_upsert_moves_between_accounts() {
        let (_temp_dir, repo) = create_test_repo();
        let a = AccountId::new();
        let b = AccountId::new();
        let mut t = txn(a, 100, date(3, 1));
        repo.upsert(t.clone()).unwrap();

        t.account_id = b;
        repo.upsert(t).unwrap();

        assert!(repo.get_by_account(a).unwrap().is_empty());
        assert_eq!(repo.get_by_account(b).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_before() {
        let (_temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        repo.upsert(txn(account, 100, date(1, 10))).unwrap();
        repo.upsert(txn(account, 200, date(2, 1))).unwrap();
        repo.upsert(txn(account, 300, date(3, 1))).unwrap();

        assert_eq!(repo.delete_before(date(2, 1)).unwrap(), 1);
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.get_by_account(account).unwrap().len(), 2);
    }

    #[test]
    fn test_account_scoped_source() {
        let (_temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        repo.upsert(txn(account, 100, date(3, 1))).unwrap();
        repo.upsert(txn(account, 100, date(4, 1))).unwrap();
        repo.upsert(txn(AccountId::new(), 100, date(3, 2))).unwrap();

        let march = DateRange::new(date(3, 1), date(3, 31)).unwrap();
        assert_eq!(repo.transactions_in(&march).unwrap().len(), 2);
        assert_eq!(repo.for_account(account).transactions_in(&march).unwrap().len(), 1);
    }
}
