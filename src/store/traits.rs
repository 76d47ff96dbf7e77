//! Storage contracts consumed by the core
//!
//! These two traits are the only boundary the account lifecycle, ledger,
//! and history components require from persistence. Point lookups express
//! existence as `Option` (null-vs-value); mutations are fallible. The
//! balance-moving methods are the transactional primitives of the system:
//! implementations must make `adjust_balance` a conditional atomic
//! increment and `transfer_balances` a both-or-neither two-leg commit, so
//! no caller ever performs a read-modify-write on a balance.

use crate::types::{Account, BankError, HistoryFilter, HistorySort, Transaction};

/// One single-field account mutation
///
/// Secrets arrive pre-hashed; the store never sees a plaintext password
/// or PIN. There is no account-number variant: the number is immutable
/// for the lifetime of the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Username(String),
    Email(String),
    PhoneNumber(String),
    Address(String),
    PasswordHash(String),
    PinHash(String),
}

/// Credential store: persistence of account records
pub trait AccountStore: Send + Sync {
    /// Point lookup by unique username
    fn find_by_username(&self, username: &str) -> Option<Account>;

    /// Point lookup by unique email
    fn find_by_email(&self, email: &str) -> Option<Account>;

    /// Point lookup by unique phone number
    fn find_by_phone(&self, phone_number: &str) -> Option<Account>;

    /// Point lookup by unique account number
    fn find_by_account_number(&self, account_number: &str) -> Option<Account>;

    /// Insert a new account, enforcing all uniqueness invariants
    ///
    /// # Errors
    ///
    /// Returns the matching `Duplicate*` error when username, email or
    /// phone number is already taken, and `PersistenceFailure` on an
    /// account-number collision (callers pre-check and retry generation).
    fn insert(&self, account: Account) -> Result<(), BankError>;

    /// Atomically apply one field update, returning the new record
    ///
    /// Uniqueness re-checks for username/email/phone happen inside the
    /// update so a concurrent writer cannot slip a duplicate between
    /// check and apply.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the username matches nothing, or the
    /// matching `Duplicate*` error when the new value is taken.
    fn update_field(&self, username: &str, update: FieldUpdate) -> Result<Account, BankError>;

    /// Atomically add a signed delta to a balance, returning the new record
    ///
    /// The increment is conditional: a delta that would drive the balance
    /// negative fails with `InsufficientBalance` and changes nothing.
    fn adjust_balance(&self, account_number: &str, delta: i64) -> Result<Account, BankError>;

    /// Atomically commit both legs of a transfer
    ///
    /// Debits `amount` from `from_account` and credits it to `to_account`
    /// as one unit: either both balances change or neither does. Returns
    /// the updated (source, destination) records.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` / `DestinationNotFound` when either side is
    /// missing, `InsufficientBalance` when the source cannot cover the
    /// amount, `ArithmeticOverflow` when the credit would overflow.
    fn transfer_balances(
        &self,
        from_account: &str,
        to_account: &str,
        amount: i64,
    ) -> Result<(Account, Account), BankError>;

    /// Delete an account by username, returning the removed record
    fn remove(&self, username: &str) -> Option<Account>;

    /// Snapshot of all accounts, for final state output
    fn all_accounts(&self) -> Vec<Account>;
}

/// Transaction store: persistence of ledger records
pub trait TransactionStore: Send + Sync {
    /// Append a transaction record
    fn insert(&self, transaction: Transaction);

    /// Point lookup by transaction id
    fn get(&self, transaction_id: &str) -> Option<Transaction>;

    /// Count records of one account matching a filter
    fn count(&self, account_number: &str, filter: &HistoryFilter) -> usize;

    /// Fetch a page of records of one account
    ///
    /// Applies the filter, then the sort (insertion order when `None`),
    /// then skips `skip` records and returns at most `limit`.
    fn find(
        &self,
        account_number: &str,
        filter: &HistoryFilter,
        sort: Option<&HistorySort>,
        skip: usize,
        limit: usize,
    ) -> Vec<Transaction>;

    /// Delete a record by transaction id, returning the removed record
    fn remove(&self, transaction_id: &str) -> Option<Transaction>;
}
