//! Account lifecycle management
//!
//! Registration with ordered uniqueness checks, guarded field updates,
//! and account deletion. Every guarded operation runs the password
//! comparison before reporting anything else, against the filler hash
//! when the account does not exist, mirroring the login path's
//! anti-enumeration behavior.

use rand::Rng;
use std::sync::Arc;

use tracing::info;

use crate::auth::password;
use crate::store::{AccountStore, FieldUpdate};
use crate::types::{Account, AccountField, AccountProfile, BankError, NewAccount, BANK_CODE};

/// Attempts at generating a fresh account number before giving up
const GENERATION_RETRIES: u32 = 5;

/// Account lifecycle manager
///
/// Stateless apart from its handle to the credential store; safe to share
/// across threads.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        AccountService { store }
    }

    /// Register a new account with a zero balance
    ///
    /// The password confirmation is compared before any uniqueness check.
    /// Uniqueness runs strictly in the order username, email, phone; the
    /// first violation wins so error reporting is deterministic. The
    /// account number is generated with a bounded regenerate-and-recheck
    /// loop; the store's own uniqueness enforcement backstops the rare
    /// race between the check and the insert.
    pub fn register(&self, new_account: NewAccount) -> Result<AccountProfile, BankError> {
        if new_account.password != new_account.password_confirm {
            return Err(BankError::PasswordMismatch);
        }

        if self.store.find_by_username(&new_account.username).is_some() {
            return Err(BankError::duplicate_username(&new_account.username));
        }
        if self.store.find_by_email(&new_account.email).is_some() {
            return Err(BankError::duplicate_email(&new_account.email));
        }
        if self.store.find_by_phone(&new_account.phone_number).is_some() {
            return Err(BankError::duplicate_phone(&new_account.phone_number));
        }

        let account_number = self.generate_account_number()?;
        let account = Account {
            username: new_account.username,
            email: new_account.email,
            password_hash: password::hash_secret(&new_account.password)?,
            phone_number: new_account.phone_number,
            address: new_account.address,
            pin_hash: password::hash_secret(&new_account.pin)?,
            account_number,
            balance: 0,
        };

        let profile = account.profile();
        self.store.insert(account)?;

        info!(
            username = %profile.username,
            account_number = %profile.account_number,
            "account registered"
        );
        Ok(profile)
    }

    /// Read one account's public profile
    pub fn get_account(&self, username: &str) -> Option<AccountProfile> {
        self.store.find_by_username(username).map(|a| a.profile())
    }

    /// Change one account field, gated by the current password
    ///
    /// The account number is immutable. Username, email and phone re-run
    /// their uniqueness check against the new value; password and PIN are
    /// re-hashed before storing; the address stores verbatim.
    pub fn update_field(
        &self,
        username: &str,
        field: AccountField,
        new_value: &str,
        current_password: &str,
    ) -> Result<AccountProfile, BankError> {
        let account = self.verify_password(username, current_password)?;

        let update = match field {
            AccountField::AccountNumber => {
                return Err(BankError::immutable_field(field.name()));
            }
            AccountField::Username => {
                if let Some(other) = self.store.find_by_username(new_value) {
                    if other.username != account.username {
                        return Err(BankError::duplicate_username(new_value));
                    }
                }
                FieldUpdate::Username(new_value.to_string())
            }
            AccountField::Email => {
                if let Some(other) = self.store.find_by_email(new_value) {
                    if other.username != account.username {
                        return Err(BankError::duplicate_email(new_value));
                    }
                }
                FieldUpdate::Email(new_value.to_string())
            }
            AccountField::PhoneNumber => {
                if let Some(other) = self.store.find_by_phone(new_value) {
                    if other.username != account.username {
                        return Err(BankError::duplicate_phone(new_value));
                    }
                }
                FieldUpdate::PhoneNumber(new_value.to_string())
            }
            AccountField::Address => FieldUpdate::Address(new_value.to_string()),
            AccountField::Password => {
                FieldUpdate::PasswordHash(password::hash_secret(new_value)?)
            }
            AccountField::Pin => FieldUpdate::PinHash(password::hash_secret(new_value)?),
        };

        let updated = self.store.update_field(username, update)?;
        info!(username, field = field.name(), "account field updated");
        Ok(updated.profile())
    }

    /// Remove an account, gated by the current password
    ///
    /// Historical transactions are left in place; records reference the
    /// account weakly by account number and deletion does not cascade.
    pub fn delete_account(&self, username: &str, current_password: &str) -> Result<(), BankError> {
        self.verify_password(username, current_password)?;

        self.store
            .remove(username)
            .ok_or_else(|| BankError::account_not_found(username))?;

        info!(username, "account deleted");
        Ok(())
    }

    /// Look up an account and verify the caller's password
    ///
    /// The comparison runs even when the account is missing (against the
    /// filler hash); only then is the NotFound reported.
    fn verify_password(&self, username: &str, password_attempt: &str) -> Result<Account, BankError> {
        let account = self.store.find_by_username(username);
        let matched = password::matches_or_filler(
            password_attempt,
            account.as_ref().map(|a| a.password_hash.as_str()),
        );

        let account = account.ok_or_else(|| BankError::account_not_found(username))?;
        if !matched {
            return Err(BankError::PasswordMismatch);
        }
        Ok(account)
    }

    /// Generate a fresh 12-digit account number: bank code plus a random
    /// 9-digit suffix, rechecked against existing accounts
    fn generate_account_number(&self) -> Result<String, BankError> {
        let mut rng = rand::thread_rng();
        for _ in 0..GENERATION_RETRIES {
            let candidate = format!("{}{:09}", BANK_CODE, rng.gen_range(0..1_000_000_000u32));
            if self.store.find_by_account_number(&candidate).is_none() {
                return Ok(candidate);
            }
        }
        Err(BankError::persistence(
            "account number generation exhausted retries",
        ))
    }
}
