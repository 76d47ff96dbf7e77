//! Error types for the banking core
//!
//! This module defines all error kinds that can surface from the account
//! lifecycle, ledger, and history components. Errors are descriptive and
//! carry the context needed to map them onto a response at the boundary.
//!
//! # Error Categories
//!
//! - **Lookup errors**: account or transaction absent
//! - **Uniqueness errors**: username/email/phone already taken
//! - **Verification errors**: password or PIN mismatch
//! - **Ledger errors**: invalid amount, insufficient balance, overflow
//! - **Command/I/O errors**: malformed command rows, file problems
//! - **Storage errors**: propagated from the storage layer, not interpreted

use thiserror::Error;

/// Main error type for the banking core
///
/// Every fallible operation in the crate returns this enum. The login
/// throttle is the one deliberate exception: its outcomes (no match,
/// locked out) are ordinary return values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// No account exists for the given username or email
    #[error("Account '{identifier}' not found")]
    AccountNotFound {
        /// The username or email that matched nothing
        identifier: String,
    },

    /// No account exists for the given destination account number
    #[error("Destination account '{account_number}' not found")]
    DestinationNotFound {
        /// The account number that matched nothing
        account_number: String,
    },

    /// No transaction exists for the given transaction id
    #[error("Transaction '{transaction_id}' not found")]
    TransactionNotFound {
        /// The transaction id that matched nothing
        transaction_id: String,
    },

    /// The username is already registered to another account
    #[error("Username '{username}' is already taken")]
    DuplicateUsername { username: String },

    /// The email is already registered to another account
    #[error("Email '{email}' is already taken")]
    DuplicateEmail { email: String },

    /// The phone number is already registered to another account
    #[error("Phone number '{phone_number}' is already taken")]
    DuplicatePhone { phone_number: String },

    /// The supplied password does not match the stored hash
    ///
    /// Also returned by registration when the password and its
    /// confirmation differ.
    #[error("Incorrect password")]
    PasswordMismatch,

    /// The supplied PIN does not match the stored hash
    #[error("Incorrect pin")]
    PinMismatch,

    /// The field cannot be changed once the account exists
    #[error("Field '{field}' cannot be changed")]
    ImmutableField { field: String },

    /// A ledger operation was given a non-positive amount
    #[error("Invalid amount {amount}: must be positive")]
    InvalidAmount { amount: i64 },

    /// The account balance cannot cover the requested outgoing amount
    ///
    /// The operation performs no mutation; the balance is unchanged.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance at the time of the check, in minor units
        available: i64,
        /// Requested outgoing amount, in minor units
        requested: i64,
    },

    /// A balance update would overflow the integer range
    #[error("Balance overflow on account '{account_number}'")]
    ArithmeticOverflow { account_number: String },

    /// A command row is missing a field its operation requires
    #[error("{op} command requires a '{field}' field")]
    MissingField {
        /// Operation name from the command row
        op: String,
        /// Name of the missing column
        field: String,
    },

    /// A command row could not be interpreted
    #[error("Invalid command: {message}")]
    InvalidCommand { message: String },

    /// The hashing utility failed to produce a hash
    #[error("Hashing failure: {message}")]
    Hashing { message: String },

    /// Propagated storage-layer failure, not interpreted by the core
    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    /// I/O error while reading or writing files
    #[error("I/O error: {message}")]
    Io { message: String },

    /// CSV parsing error
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an AccountNotFound error
    pub fn account_not_found(identifier: &str) -> Self {
        BankError::AccountNotFound {
            identifier: identifier.to_string(),
        }
    }

    /// Create a DestinationNotFound error
    pub fn destination_not_found(account_number: &str) -> Self {
        BankError::DestinationNotFound {
            account_number: account_number.to_string(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(transaction_id: &str) -> Self {
        BankError::TransactionNotFound {
            transaction_id: transaction_id.to_string(),
        }
    }

    /// Create a DuplicateUsername error
    pub fn duplicate_username(username: &str) -> Self {
        BankError::DuplicateUsername {
            username: username.to_string(),
        }
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email(email: &str) -> Self {
        BankError::DuplicateEmail {
            email: email.to_string(),
        }
    }

    /// Create a DuplicatePhone error
    pub fn duplicate_phone(phone_number: &str) -> Self {
        BankError::DuplicatePhone {
            phone_number: phone_number.to_string(),
        }
    }

    /// Create an ImmutableField error
    pub fn immutable_field(field: &str) -> Self {
        BankError::ImmutableField {
            field: field.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(available: i64, requested: i64) -> Self {
        BankError::InsufficientBalance {
            available,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        BankError::InvalidAmount { amount }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account_number: &str) -> Self {
        BankError::ArithmeticOverflow {
            account_number: account_number.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(op: &str, field: &str) -> Self {
        BankError::MissingField {
            op: op.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an InvalidCommand error
    pub fn invalid_command(message: impl Into<String>) -> Self {
        BankError::InvalidCommand {
            message: message.into(),
        }
    }

    /// Create a PersistenceFailure error
    pub fn persistence(message: impl Into<String>) -> Self {
        BankError::PersistenceFailure {
            message: message.into(),
        }
    }
}
