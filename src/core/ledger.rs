//! Ledger engine: balance-moving operations and their records
//!
//! Every mutation is gated on PIN verification, and outgoing movements on
//! the sufficiency check. Balance changes go through the store's atomic
//! primitives only (a conditional increment for deposits/withdrawals, the
//! two-leg commit for transfers), so the service never performs a
//! read-modify-write on a balance and concurrent operations against the
//! same account cannot lose updates or overdraw.
//!
//! Each successful operation appends one immutable transaction record per
//! moved balance (two for a transfer, one per leg) carrying the signed
//! delta that was applied. Date and time are captured once per operation,
//! so the two legs of a transfer always agree on their timestamp.

use chrono::Local;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use tracing::info;

use crate::auth::password;
use crate::store::{AccountStore, TransactionStore};
use crate::types::{
    Account, BankError, Transaction, TransactionKind, TRANSACTION_ID_LEN,
};

/// Receipt for a deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementReceipt {
    pub account_number: String,
    pub transaction_id: String,
    /// Magnitude of the movement, in minor units
    pub amount: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    pub date: String,
    pub time: String,
}

/// Receipt for a transfer
///
/// Identified by the outgoing leg's transaction id; the description is
/// caller-supplied context echoed back, not persisted with the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub transaction_id: String,
    /// Magnitude of the movement, in minor units
    pub amount: i64,
    pub description: String,
    pub from_account: String,
    pub to_account: String,
    pub date: String,
    pub time: String,
}

/// Money-movement core
pub struct LedgerService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl LedgerService {
    pub fn new(accounts: Arc<dyn AccountStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        LedgerService {
            accounts,
            transactions,
        }
    }

    /// Credit `amount` to the account, recording a Deposit transaction
    pub fn deposit(
        &self,
        username: &str,
        amount: i64,
        pin: &str,
    ) -> Result<MovementReceipt, BankError> {
        require_positive(amount)?;
        let account = self.verify_pin(username, pin)?;

        let updated = self.accounts.adjust_balance(&account.account_number, amount)?;
        let (date, time) = capture_timestamp();
        let transaction_id = generate_transaction_id();

        self.transactions.insert(Transaction {
            transaction_id: transaction_id.clone(),
            account_number: updated.account_number.clone(),
            kind: TransactionKind::Deposit,
            amount,
            date: date.clone(),
            time: time.clone(),
        });

        info!(username, amount, transaction_id = %transaction_id, "deposit applied");
        Ok(MovementReceipt {
            account_number: updated.account_number,
            transaction_id,
            amount,
            balance_before: updated.balance - amount,
            balance_after: updated.balance,
            date,
            time,
        })
    }

    /// Debit `amount` from the account, recording a Withdraw transaction
    ///
    /// Fails with `InsufficientBalance`, recording nothing, when the
    /// balance cannot cover the amount.
    pub fn withdraw(
        &self,
        username: &str,
        amount: i64,
        pin: &str,
    ) -> Result<MovementReceipt, BankError> {
        require_positive(amount)?;
        let account = self.verify_pin(username, pin)?;

        let updated = self.accounts.adjust_balance(&account.account_number, -amount)?;
        let (date, time) = capture_timestamp();
        let transaction_id = generate_transaction_id();

        self.transactions.insert(Transaction {
            transaction_id: transaction_id.clone(),
            account_number: updated.account_number.clone(),
            kind: TransactionKind::Withdraw,
            amount: -amount,
            date: date.clone(),
            time: time.clone(),
        });

        info!(username, amount, transaction_id = %transaction_id, "withdrawal applied");
        Ok(MovementReceipt {
            account_number: updated.account_number,
            transaction_id,
            amount,
            balance_before: updated.balance + amount,
            balance_after: updated.balance,
            date,
            time,
        })
    }

    /// Move `amount` from one account to another
    ///
    /// PIN and sufficiency are verified on the source only. The two
    /// balance updates commit through the store as one atomic unit, and
    /// the two records share a single captured timestamp: `Transfer Out`
    /// with a negative delta on the source, `Transfer In` with a positive
    /// delta on the destination.
    pub fn transfer(
        &self,
        from_username: &str,
        amount: i64,
        description: &str,
        to_account: &str,
        pin: &str,
    ) -> Result<TransferReceipt, BankError> {
        require_positive(amount)?;

        let source = self.accounts.find_by_username(from_username);
        let pin_ok =
            password::matches_or_filler(pin, source.as_ref().map(|a| a.pin_hash.as_str()));

        let source = source.ok_or_else(|| BankError::account_not_found(from_username))?;
        let destination = self
            .accounts
            .find_by_account_number(to_account)
            .ok_or_else(|| BankError::destination_not_found(to_account))?;
        if !pin_ok {
            return Err(BankError::PinMismatch);
        }

        let (source_after, _destination_after) = self.accounts.transfer_balances(
            &source.account_number,
            &destination.account_number,
            amount,
        )?;

        let (date, time) = capture_timestamp();
        let outgoing_id = generate_transaction_id();
        let incoming_id = generate_transaction_id();

        self.transactions.insert(Transaction {
            transaction_id: outgoing_id.clone(),
            account_number: source_after.account_number.clone(),
            kind: TransactionKind::TransferOut,
            amount: -amount,
            date: date.clone(),
            time: time.clone(),
        });
        self.transactions.insert(Transaction {
            transaction_id: incoming_id,
            account_number: destination.account_number.clone(),
            kind: TransactionKind::TransferIn,
            amount,
            date: date.clone(),
            time: time.clone(),
        });

        info!(
            from = %source_after.account_number,
            to = %destination.account_number,
            amount,
            transaction_id = %outgoing_id,
            "transfer applied"
        );
        Ok(TransferReceipt {
            transaction_id: outgoing_id,
            amount,
            description: description.to_string(),
            from_account: source_after.account_number,
            to_account: destination.account_number,
            date,
            time,
        })
    }

    /// Delete one transaction record, gated by the caller's PIN
    ///
    /// Removes the audit-trail entry only; the balance effect of the
    /// original movement is NOT reversed.
    pub fn delete_transaction(
        &self,
        username: &str,
        transaction_id: &str,
        pin: &str,
    ) -> Result<Transaction, BankError> {
        let account = self.accounts.find_by_username(username);
        let transaction = self.transactions.get(transaction_id);
        let pin_ok =
            password::matches_or_filler(pin, account.as_ref().map(|a| a.pin_hash.as_str()));

        account.ok_or_else(|| BankError::account_not_found(username))?;
        if !pin_ok {
            return Err(BankError::PinMismatch);
        }
        transaction.ok_or_else(|| BankError::transaction_not_found(transaction_id))?;

        let removed = self
            .transactions
            .remove(transaction_id)
            .ok_or_else(|| BankError::transaction_not_found(transaction_id))?;

        info!(username, transaction_id, "transaction record deleted");
        Ok(removed)
    }

    /// Look up an account and verify the caller's PIN
    ///
    /// The comparison runs even when the account is missing (against the
    /// filler hash); only then is the NotFound reported.
    fn verify_pin(&self, username: &str, pin: &str) -> Result<Account, BankError> {
        let account = self.accounts.find_by_username(username);
        let matched =
            password::matches_or_filler(pin, account.as_ref().map(|a| a.pin_hash.as_str()));

        let account = account.ok_or_else(|| BankError::account_not_found(username))?;
        if !matched {
            return Err(BankError::PinMismatch);
        }
        Ok(account)
    }
}

fn require_positive(amount: i64) -> Result<(), BankError> {
    if amount <= 0 {
        return Err(BankError::invalid_amount(amount));
    }
    Ok(())
}

/// 12-character random alphanumeric transaction id, best-effort unique
fn generate_transaction_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TRANSACTION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Capture date and time once, shared by every record of one operation
fn capture_timestamp() -> (String, String) {
    let now = Local::now();
    (
        now.format("%Y-%m-%d").to_string(),
        now.format("%H:%M:%S").to_string(),
    )
}
