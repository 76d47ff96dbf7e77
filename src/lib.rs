//! Banking Core Library
//! # Overview
//!
//! This library implements the core of a banking-style account service:
//! authenticated access to monetary accounts and a ledger of their
//! transactions, driven through a command-file processor with sync and
//! async strategies.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, Command, errors)
//! - [`auth`] - Login throttle, password/PIN hashing, session tokens
//! - [`store`] - Storage contracts plus in-memory reference stores
//! - [`core`] - Business logic components:
//!   - [`core::accounts`] - Registration, guarded updates, deletion
//!   - [`core::ledger`] - Deposit/withdraw/transfer and their records
//!   - [`core::history`] - Filtered, sorted, paginated history queries
//!   - [`core::engine`] - Command routing over all of the above
//! - [`io`] - Command-file parsing and account-state output
//! - [`strategy`] - Sync and async processing pipelines
//! - [`cli`] - CLI argument parsing
//!
//! # Ledger Invariants
//!
//! - Balances never go negative: outgoing movements pass a sufficiency
//!   check inside the store's atomic conditional increment
//! - A transfer's two legs (debit + credit, two records) commit as one
//!   unit with a single shared timestamp
//! - Transaction amounts store the signed delta actually applied
//!
//! # Authentication Path
//!
//! Logins pass through a per-identifier throttle (5 failures within 30
//! minutes locks the identifier out), credential comparison always runs
//! against a real or filler hash, and successful logins are issued an
//! opaque signed session token.

// Module declarations
pub mod auth;
pub mod cli;
pub mod core;
pub mod io;
pub mod store;
pub mod strategy;
pub mod types;

pub use crate::core::{BankEngine, CommandOutcome, EngineConfig, HistoryPage};
pub use auth::{LoginOutcome, ThrottleConfig};
pub use io::write_accounts_csv;
pub use store::{AccountStore, MemoryAccountStore, MemoryTransactionStore, TransactionStore};
pub use types::{
    Account, AccountField, AccountProfile, BankError, Command, HistoryQuery, NewAccount,
    Transaction, TransactionKind,
};
