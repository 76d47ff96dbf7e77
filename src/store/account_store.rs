//! In-memory credential store
//!
//! Reference [`AccountStore`] implementation backed by a
//! `parking_lot::RwLock<HashMap>` keyed by username. The write lock is
//! the transactional boundary: every mutating method takes it once and
//! performs all of its checks and writes inside, which is what makes the
//! conditional balance increment and the two-leg transfer atomic from
//! any caller's point of view.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::store::traits::{AccountStore, FieldUpdate};
use crate::types::{Account, BankError};

/// Thread-safe in-memory account store
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        MemoryAccountStore {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    fn find_where<F>(&self, predicate: F) -> Option<Account>
    where
        F: Fn(&Account) -> bool,
    {
        self.accounts.read().values().find(|a| predicate(a)).cloned()
    }
}

impl AccountStore for MemoryAccountStore {
    fn find_by_username(&self, username: &str) -> Option<Account> {
        self.accounts.read().get(username).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Account> {
        self.find_where(|a| a.email == email)
    }

    fn find_by_phone(&self, phone_number: &str) -> Option<Account> {
        self.find_where(|a| a.phone_number == phone_number)
    }

    fn find_by_account_number(&self, account_number: &str) -> Option<Account> {
        self.find_where(|a| a.account_number == account_number)
    }

    fn insert(&self, account: Account) -> Result<(), BankError> {
        let mut accounts = self.accounts.write();

        if accounts.contains_key(&account.username) {
            return Err(BankError::duplicate_username(&account.username));
        }
        for existing in accounts.values() {
            if existing.email == account.email {
                return Err(BankError::duplicate_email(&account.email));
            }
            if existing.phone_number == account.phone_number {
                return Err(BankError::duplicate_phone(&account.phone_number));
            }
            if existing.account_number == account.account_number {
                return Err(BankError::persistence(format!(
                    "account number collision on '{}'",
                    account.account_number
                )));
            }
        }

        accounts.insert(account.username.clone(), account);
        Ok(())
    }

    fn update_field(&self, username: &str, update: FieldUpdate) -> Result<Account, BankError> {
        let mut accounts = self.accounts.write();

        if !accounts.contains_key(username) {
            return Err(BankError::account_not_found(username));
        }

        // Uniqueness re-checks against every OTHER account, inside the
        // same critical section as the write
        match &update {
            FieldUpdate::Username(new_username) => {
                if accounts.contains_key(new_username) && new_username != username {
                    return Err(BankError::duplicate_username(new_username));
                }
            }
            FieldUpdate::Email(new_email) => {
                if accounts
                    .values()
                    .any(|a| a.email == *new_email && a.username != username)
                {
                    return Err(BankError::duplicate_email(new_email));
                }
            }
            FieldUpdate::PhoneNumber(new_phone) => {
                if accounts
                    .values()
                    .any(|a| a.phone_number == *new_phone && a.username != username)
                {
                    return Err(BankError::duplicate_phone(new_phone));
                }
            }
            _ => {}
        }

        let mut account = accounts
            .remove(username)
            .ok_or_else(|| BankError::account_not_found(username))?;

        match update {
            FieldUpdate::Username(new_username) => account.username = new_username,
            FieldUpdate::Email(new_email) => account.email = new_email,
            FieldUpdate::PhoneNumber(new_phone) => account.phone_number = new_phone,
            FieldUpdate::Address(new_address) => account.address = new_address,
            FieldUpdate::PasswordHash(new_hash) => account.password_hash = new_hash,
            FieldUpdate::PinHash(new_hash) => account.pin_hash = new_hash,
        }

        let updated = account.clone();
        accounts.insert(account.username.clone(), account);
        Ok(updated)
    }

    fn adjust_balance(&self, account_number: &str, delta: i64) -> Result<Account, BankError> {
        let mut accounts = self.accounts.write();

        let account = accounts
            .values_mut()
            .find(|a| a.account_number == account_number)
            .ok_or_else(|| BankError::account_not_found(account_number))?;

        let new_balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| BankError::arithmetic_overflow(account_number))?;

        if new_balance < 0 {
            return Err(BankError::insufficient_balance(account.balance, -delta));
        }

        account.balance = new_balance;
        Ok(account.clone())
    }

    fn transfer_balances(
        &self,
        from_account: &str,
        to_account: &str,
        amount: i64,
    ) -> Result<(Account, Account), BankError> {
        let mut accounts = self.accounts.write();

        // Validate both legs before touching either balance
        let (from_username, from_balance) = accounts
            .values()
            .find(|a| a.account_number == from_account)
            .map(|a| (a.username.clone(), a.balance))
            .ok_or_else(|| BankError::account_not_found(from_account))?;
        let (to_username, to_balance) = accounts
            .values()
            .find(|a| a.account_number == to_account)
            .map(|a| (a.username.clone(), a.balance))
            .ok_or_else(|| BankError::destination_not_found(to_account))?;

        if from_balance < amount {
            return Err(BankError::insufficient_balance(from_balance, amount));
        }

        let credit_base = if from_username == to_username {
            from_balance - amount
        } else {
            to_balance
        };
        credit_base
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow(to_account))?;

        // Commit both legs; nothing below can fail
        debit(&mut accounts, &from_username, amount)?;
        credit(&mut accounts, &to_username, amount)?;

        let from_after = accounts
            .get(&from_username)
            .cloned()
            .ok_or_else(|| BankError::persistence("source vanished mid-transfer"))?;
        let to_after = accounts
            .get(&to_username)
            .cloned()
            .ok_or_else(|| BankError::persistence("destination vanished mid-transfer"))?;
        Ok((from_after, to_after))
    }

    fn remove(&self, username: &str) -> Option<Account> {
        self.accounts.write().remove(username)
    }

    fn all_accounts(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }
}

fn debit(
    accounts: &mut HashMap<String, Account>,
    username: &str,
    amount: i64,
) -> Result<(), BankError> {
    let account = accounts
        .get_mut(username)
        .ok_or_else(|| BankError::persistence("account vanished mid-transfer"))?;
    account.balance -= amount;
    Ok(())
}

fn credit(
    accounts: &mut HashMap<String, Account>,
    username: &str,
    amount: i64,
) -> Result<(), BankError> {
    let account = accounts
        .get_mut(username)
        .ok_or_else(|| BankError::persistence("account vanished mid-transfer"))?;
    account.balance += amount;
    Ok(())
}
