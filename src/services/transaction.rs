//! Transaction service
//!
//! Recording transactions (which moves the owning account's balance),
//! filtered listings and retention pruning.

use chrono::{Duration, NaiveDate};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::period::{current_period, first_of_month};
use crate::models::{AccountId, Category, DateRange, Money, PeriodType, Transaction, TransactionId};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub category: Option<Category>,
    pub range: Option<DateRange>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub description: String,
    pub category: Category,
    pub amount: Money,
    pub occur_date: NaiveDate,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction and apply it to its account's balance
    pub fn record(&self, input: NewTransaction) -> ExpenseResult<Transaction> {
        let mut account = self
            .storage
            .accounts
            .get(input.account_id)?
            .ok_or_else(|| ExpenseError::account_not_found(input.account_id.to_string()))?;

        let txn = Transaction::new(
            input.account_id,
            input.description.trim(),
            input.category,
            input.amount,
            input.occur_date,
        );
        txn.validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        account.apply_transaction(&txn);

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.accounts.upsert(account)?;
        self.storage.transactions.save()?;
        self.storage.accounts.save()?;

        tracing::info!(
            id = %txn.id,
            account = %txn.account_id,
            category = %txn.category,
            amount = %txn.amount,
            "recorded transaction"
        );
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> ExpenseResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// List transactions newest first, with optional filtering
    pub fn list(&self, filter: &TransactionFilter) -> ExpenseResult<Vec<Transaction>> {
        let mut transactions = if let Some(account_id) = filter.account_id {
            self.storage.transactions.get_by_account(account_id)?
        } else if let Some(range) = &filter.range {
            self.storage.transactions.get_by_date_range(range)?
        } else {
            self.storage.transactions.get_all()?
        };

        if let Some(range) = &filter.range {
            transactions.retain(|t| range.contains(t.occur_date));
        }
        if let Some(category) = filter.category {
            transactions.retain(|t| t.category == category);
        }

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// The `limit` most recent transactions overall
    pub fn latest(&self, limit: usize) -> ExpenseResult<Vec<Transaction>> {
        self.list(&TransactionFilter::new().limit(limit))
    }

    /// The `limit` most recent transactions of one account
    pub fn latest_for_account(&self, account_id: AccountId, limit: usize) -> ExpenseResult<Vec<Transaction>> {
        self.list(&TransactionFilter::new().account(account_id).limit(limit))
    }

    /// Transactions of a category in the month containing `today`
    pub fn in_category_this_month(
        &self,
        category: Category,
        account_id: Option<AccountId>,
        today: NaiveDate,
    ) -> ExpenseResult<Vec<Transaction>> {
        let filter = TransactionFilter {
            account_id,
            category: Some(category),
            range: Some(current_period(PeriodType::Month, today, None)),
            limit: None,
        };
        self.list(&filter)
    }

    /// Delete transactions older than the retention window
    ///
    /// The window reaches `retention_weeks` weeks back from the first day of
    /// the current month. Account balances are left untouched.
    pub fn prune(&self, today: NaiveDate, retention_weeks: u32) -> ExpenseResult<usize> {
        let cutoff = retention_cutoff(today, retention_weeks);
        let removed = self.storage.transactions.delete_before(cutoff)?;

        if removed > 0 {
            self.storage.transactions.save()?;
        }

        tracing::info!(%cutoff, removed, "pruned transactions");
        Ok(removed)
    }

    pub fn count(&self) -> ExpenseResult<usize> {
        self.storage.transactions.count()
    }
}

/// Oldest date a transaction may have and still be kept
pub fn retention_cutoff(today: NaiveDate, retention_weeks: u32) -> NaiveDate {
    first_of_month(today) - Duration::weeks(i64::from(retention_weeks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{Account, AccountType, ExpenseCategory};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup_account(storage: &Storage, account_type: AccountType, cents: i64) -> AccountId {
        let account = Account::new("Main", account_type, Money::from_cents(cents));
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        id
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn input(account_id: AccountId, category: Category, cents: i64, occur: NaiveDate) -> NewTransaction {
        NewTransaction {
            account_id,
            description: "Groceries".into(),
            category,
            amount: Money::from_cents(cents),
            occur_date: occur,
        }
    }

    #[test]
    fn test_record_debit_expense_lowers_balance() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = setup_account(&storage, AccountType::Debit, 100000);
        let service = TransactionService::new(&storage);

        service
            .record(input(account_id, ExpenseCategory::Grocery.into(), 5000, date(3, 1)))
            .unwrap();
        service
            .record(input(account_id, Category::Income, 20000, date(3, 2)))
            .unwrap();

        let account = storage.accounts.get(account_id).unwrap().unwrap();
        assert_eq!(account.balance, Money::from_cents(115000));
        assert_eq!(service.count().unwrap(), 2);
    }

    #[test]
    fn test_record_credit_expense_raises_amount_due() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = setup_account(&storage, AccountType::Credit, 10000);
        let service = TransactionService::new(&storage);

        service
            .record(input(account_id, ExpenseCategory::Dining.into(), 2500, date(3, 1)))
            .unwrap();
        service
            .record(input(account_id, Category::Income, 5000, date(3, 2)))
            .unwrap();

        let account = storage.accounts.get(account_id).unwrap().unwrap();
        assert_eq!(account.balance, Money::from_cents(7500));
    }

    #[test]
    fn test_record_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = setup_account(&storage, AccountType::Debit, 0);
        let service = TransactionService::new(&storage);

        let err = service
            .record(input(account_id, Category::Income, 0, date(3, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .record(input(AccountId::new(), Category::Income, 100, date(3, 1)))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let checking = setup_account(&storage, AccountType::Debit, 100000);
        let visa = setup_account(&storage, AccountType::Credit, 0);
        let service = TransactionService::new(&storage);

        let gas: Category = ExpenseCategory::Gas.into();
        service.record(input(checking, gas, 1000, date(3, 1))).unwrap();
        service.record(input(checking, gas, 1000, date(3, 20))).unwrap();
        service.record(input(visa, gas, 1000, date(2, 10))).unwrap();
        service
            .record(input(visa, ExpenseCategory::Dining.into(), 1000, date(3, 5)))
            .unwrap();

        let latest = service.latest(2).unwrap();
        assert_eq!(latest[0].occur_date, date(3, 20));
        assert_eq!(latest[1].occur_date, date(3, 5));

        assert_eq!(service.latest_for_account(visa, 20).unwrap().len(), 2);

        let march = DateRange::new(date(3, 1), date(3, 31)).unwrap();
        let filter = TransactionFilter::new().range(march).category(gas);
        assert_eq!(service.list(&filter).unwrap().len(), 2);

        let gas_this_month = service.in_category_this_month(gas, None, date(3, 25)).unwrap();
        assert_eq!(gas_this_month.len(), 2);
        let visa_gas = service
            .in_category_this_month(gas, Some(visa), date(3, 25))
            .unwrap();
        assert!(visa_gas.is_empty());
    }

    #[test]
    fn test_retention_cutoff() {
        // 18 weeks before 2024-03-01
        assert_eq!(retention_cutoff(date(3, 15), 18), NaiveDate::from_ymd_opt(2023, 10, 27).unwrap());
    }

    #[test]
    fn test_prune_keeps_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = setup_account(&storage, AccountType::Debit, 100000);
        let service = TransactionService::new(&storage);

        service
            .record(input(account_id, ExpenseCategory::Gas.into(), 1000, NaiveDate::from_ymd_opt(2023, 10, 26).unwrap()))
            .unwrap();
        service
            .record(input(account_id, ExpenseCategory::Gas.into(), 1000, NaiveDate::from_ymd_opt(2023, 10, 27).unwrap()))
            .unwrap();

        assert_eq!(service.prune(date(3, 15), 18).unwrap(), 1);
        assert_eq!(service.count().unwrap(), 1);

        let account = storage.accounts.get(account_id).unwrap().unwrap();
        assert_eq!(account.balance, Money::from_cents(98000));
    }
}
