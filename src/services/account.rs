//! Account service
//!
//! Account creation and lookup, balance edits that leave an audit trail in the
//! ledger, credit due-date rollover and balance totals.

use chrono::{NaiveDate, Utc};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Account, AccountId, AccountType, Category, ExpenseCategory, Money, Transaction};
use crate::reports::BalanceTotals;
use crate::storage::Storage;

/// Optional fields for a new account
#[derive(Debug, Clone, Default)]
pub struct AccountDetails {
    pub institution: String,
    pub account_number: i64,
    pub credit_limit: Option<Money>,
    pub due_date: Option<NaiveDate>,
}

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        balance: Money,
        details: AccountDetails,
    ) -> ExpenseResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExpenseError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self.storage.accounts.name_exists(name)? {
            return Err(ExpenseError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::new(name, account_type, balance);
        account.institution = details.institution;
        account.account_number = details.account_number;
        if account_type == AccountType::Credit {
            account.credit_limit = details.credit_limit;
            account.due_date = details.due_date;
        }

        account
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        tracing::info!(account = %account.name, kind = %account.account_type, "created account");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> ExpenseResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name, full ID, or short ID
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(self
            .storage
            .accounts
            .get_all()?
            .into_iter()
            .find(|a| a.id.matches_short(identifier)))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, identifier: &str) -> ExpenseResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::account_not_found(identifier))
    }

    pub fn list(&self) -> ExpenseResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// Set an account's balance directly
    ///
    /// Any change is recorded as a transaction dated `today` so the ledger
    /// explains the new balance. That transaction is not applied to the
    /// account again. Returns it, or `None` if the balance didn't change.
    pub fn set_balance(
        &self,
        id: AccountId,
        new_balance: Money,
        today: NaiveDate,
    ) -> ExpenseResult<Option<Transaction>> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| ExpenseError::account_not_found(id.to_string()))?;

        let change = new_balance - account.balance;
        if change.is_zero() {
            return Ok(None);
        }

        account.balance = new_balance;
        account.updated_at = Utc::now();
        account
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let txn = balance_change_transaction(&account, change, today);

        self.storage.accounts.upsert(account)?;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.accounts.save()?;
        self.storage.transactions.save()?;

        tracing::info!(%id, %change, "balance adjusted");
        Ok(Some(txn))
    }

    /// Move every passed credit due date forward one month
    ///
    /// Returns the accounts that changed.
    pub fn roll_credit_due_dates(&self, today: NaiveDate) -> ExpenseResult<Vec<Account>> {
        let mut rolled = Vec::new();

        for mut account in self.storage.accounts.get_by_type(AccountType::Credit)? {
            if account.roll_due_date(today) {
                self.storage.accounts.upsert(account.clone())?;
                rolled.push(account);
            }
        }

        if !rolled.is_empty() {
            self.storage.accounts.save()?;
            tracing::info!(count = rolled.len(), "rolled credit due dates");
        }

        Ok(rolled)
    }

    pub fn balance_totals(&self) -> ExpenseResult<BalanceTotals> {
        Ok(BalanceTotals::from_accounts(&self.list()?))
    }
}

/// The ledger entry explaining a balance edit of `change`
fn balance_change_transaction(account: &Account, change: Money, today: NaiveDate) -> Transaction {
    let others = Category::Expense(ExpenseCategory::Others);

    let (description, category) = if change.is_positive() {
        let category = match account.account_type {
            AccountType::Credit => others,
            AccountType::Debit => Category::Income,
        };
        (format!("Account's balance increases {}", change.abs()), category)
    } else {
        let category = match account.account_type {
            AccountType::Credit => Category::Income,
            AccountType::Debit => others,
        };
        (format!("Account's balance decreases {}", change.abs()), category)
    };

    Transaction::new(account.id, description, category, change.abs(), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create(
                "Checking",
                AccountType::Debit,
                Money::from_cents(100000),
                AccountDetails::default(),
            )
            .unwrap();

        assert_eq!(account.name, "Checking");
        assert_eq!(account.balance, Money::from_cents(100000));
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        service
            .create("Checking", AccountType::Debit, Money::zero(), AccountDetails::default())
            .unwrap();
        let err = service
            .create("checking", AccountType::Debit, Money::zero(), AccountDetails::default())
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Duplicate { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let err = service
            .create("  ", AccountType::Debit, Money::zero(), AccountDetails::default())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create("Visa", AccountType::Credit, Money::zero(), AccountDetails::default())
            .unwrap();

        assert_eq!(service.find("visa").unwrap().unwrap().id, account.id);
        assert_eq!(
            service.find(&account.id.to_string()).unwrap().unwrap().id,
            account.id
        );
        assert!(service.find("nope").unwrap().is_none());
        assert!(service.require("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_debit_balance_increase_records_income() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Checking", AccountType::Debit, Money::from_cents(10000), AccountDetails::default())
            .unwrap();

        let txn = service
            .set_balance(account.id, Money::from_cents(15000), today())
            .unwrap()
            .unwrap();

        assert_eq!(txn.description, "Account's balance increases $50.00");
        assert_eq!(txn.category, Category::Income);
        assert_eq!(txn.amount, Money::from_cents(5000));
        assert_eq!(txn.occur_date, today());

        // The reconciliation entry is not applied on top of the new balance
        let stored = service.get(account.id).unwrap().unwrap();
        assert_eq!(stored.balance, Money::from_cents(15000));
        assert_eq!(storage.transactions.count().unwrap(), 1);
    }

    #[test]
    fn test_credit_balance_decrease_records_income() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Visa", AccountType::Credit, Money::from_cents(30000), AccountDetails::default())
            .unwrap();

        let txn = service
            .set_balance(account.id, Money::from_cents(10000), today())
            .unwrap()
            .unwrap();

        assert_eq!(txn.description, "Account's balance decreases $200.00");
        assert_eq!(txn.category, Category::Income);
    }

    #[test]
    fn test_other_balance_edits_record_others() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let debit = service
            .create("Checking", AccountType::Debit, Money::from_cents(10000), AccountDetails::default())
            .unwrap();
        let credit = service
            .create("Visa", AccountType::Credit, Money::from_cents(10000), AccountDetails::default())
            .unwrap();

        let others = Category::Expense(ExpenseCategory::Others);
        let down = service
            .set_balance(debit.id, Money::from_cents(4000), today())
            .unwrap()
            .unwrap();
        assert_eq!(down.category, others);

        let up = service
            .set_balance(credit.id, Money::from_cents(12000), today())
            .unwrap()
            .unwrap();
        assert_eq!(up.category, others);
        assert_eq!(up.amount, Money::from_cents(2000));
    }

    #[test]
    fn test_unchanged_balance_records_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Checking", AccountType::Debit, Money::from_cents(10000), AccountDetails::default())
            .unwrap();

        let txn = service
            .set_balance(account.id, Money::from_cents(10000), today())
            .unwrap();
        assert!(txn.is_none());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_roll_credit_due_dates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let due = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let details = AccountDetails {
            due_date: Some(due),
            ..AccountDetails::default()
        };
        let visa = service
            .create("Visa", AccountType::Credit, Money::zero(), details.clone())
            .unwrap();
        let later = AccountDetails {
            due_date: Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            ..AccountDetails::default()
        };
        service
            .create("Amex", AccountType::Credit, Money::zero(), later)
            .unwrap();
        // Debit accounts never carry a due date
        let checking = service
            .create("Checking", AccountType::Debit, Money::zero(), details)
            .unwrap();
        assert!(checking.due_date.is_none());

        let rolled = service.roll_credit_due_dates(today()).unwrap();
        assert_eq!(rolled.len(), 1);
        assert_eq!(
            service.get(visa.id).unwrap().unwrap().due_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_balance_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Checking", AccountType::Debit, Money::from_cents(50000), AccountDetails::default())
            .unwrap();
        service
            .create("Visa", AccountType::Credit, Money::from_cents(12000), AccountDetails::default())
            .unwrap();

        let totals = service.balance_totals().unwrap();
        assert_eq!(totals.total_balance, Money::from_cents(50000));
        assert_eq!(totals.total_amount_due, Money::from_cents(12000));
    }
}
