//! Business logic components
//!
//! # Components
//!
//! - [`accounts`] - registration, guarded field updates, deletion
//! - [`ledger`] - deposit/withdraw/transfer and transaction records
//! - [`history`] - filtered, sorted, paginated history queries
//! - [`engine`] - the command-routing facade over all of the above

pub mod accounts;
pub mod engine;
pub mod history;
pub mod ledger;

pub use accounts::AccountService;
pub use engine::{BankEngine, CommandOutcome, EngineConfig, DEFAULT_TOKEN_SECRET};
pub use history::{HistoryPage, HistoryService};
pub use ledger::{LedgerService, MovementReceipt, TransferReceipt};
