//! Core data types for the banking core
//!
//! This module groups the domain types used throughout the system:
//!
//! - [`account`] - Stored account record, public profile, field selectors
//! - [`transaction`] - Ledger records plus history filter/sort descriptors
//! - [`command`] - Typed commands routed through the bank engine
//! - [`error`] - The crate-wide error enum

pub mod account;
pub mod command;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountField, AccountProfile, NewAccount, ACCOUNT_NUMBER_LEN, BANK_CODE};
pub use command::{Command, HistoryQuery};
pub use error::BankError;
pub use transaction::{
    HistoryFilter, HistorySort, SortOrder, Transaction, TransactionField, TransactionKind,
    TRANSACTION_ID_LEN,
};
