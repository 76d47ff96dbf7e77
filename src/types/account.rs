//! Account-related types for the banking core
//!
//! This module defines the Account record as persisted by the credential
//! store, the public profile view returned by core operations, and the
//! set of account fields addressable by the update operation.

use serde::{Deserialize, Serialize};

use super::error::BankError;

/// Bank code prefixing every generated account number
pub const BANK_CODE: &str = "391";

/// Full length of an account number: bank code plus a 9-digit suffix
pub const ACCOUNT_NUMBER_LEN: usize = 12;

/// Stored account record
///
/// This is the shape the credential store persists. It carries the two
/// secret hashes and must never cross the core boundary; callers receive
/// an [`AccountProfile`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique login name
    pub username: String,

    /// Unique email address, the identifier used for authentication
    pub email: String,

    /// Argon2 hash of the password
    pub password_hash: String,

    /// Unique phone number
    pub phone_number: String,

    /// Free-form postal address
    pub address: String,

    /// Argon2 hash of the transaction PIN
    pub pin_hash: String,

    /// Unique 12-digit account number prefixed with the bank code
    pub account_number: String,

    /// Balance in minor currency units
    ///
    /// Never negative after a successful outgoing movement; the store's
    /// conditional balance update enforces this.
    pub balance: i64,
}

impl Account {
    /// Public view of this account, with both secret hashes stripped
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            account_number: self.account_number.clone(),
            balance: self.balance,
        }
    }
}

/// Public account view
///
/// The only account shape returned by core operations. Contains no hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub account_number: String,
    /// Balance in minor currency units
    pub balance: i64,
}

/// Account fields addressable by the update operation
///
/// `AccountNumber` is listed so the immutability rule is expressed in the
/// type: the update operation rejects it unconditionally. The balance is
/// not addressable at all; it only moves through the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Username,
    Email,
    PhoneNumber,
    Address,
    Password,
    Pin,
    AccountNumber,
}

impl AccountField {
    /// Column name as it appears in command rows and error messages
    pub fn name(&self) -> &'static str {
        match self {
            AccountField::Username => "username",
            AccountField::Email => "email",
            AccountField::PhoneNumber => "phone_number",
            AccountField::Address => "address",
            AccountField::Password => "password",
            AccountField::Pin => "pin",
            AccountField::AccountNumber => "account_number",
        }
    }
}

impl std::str::FromStr for AccountField {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(AccountField::Username),
            "email" => Ok(AccountField::Email),
            "phone_number" => Ok(AccountField::PhoneNumber),
            "address" => Ok(AccountField::Address),
            "password" => Ok(AccountField::Password),
            "pin" => Ok(AccountField::Pin),
            "account_number" => Ok(AccountField::AccountNumber),
            other => Err(BankError::invalid_command(format!(
                "unknown account field '{other}'"
            ))),
        }
    }
}

/// Registration payload
///
/// Carried by the register command; the password confirmation is compared
/// before any uniqueness check runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub phone_number: String,
    pub address: String,
    pub pin: String,
}
