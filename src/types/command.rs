//! Typed commands routed through the bank engine
//!
//! One command corresponds to one row of the input file and to one core
//! operation. The io layer converts raw CSV rows into this enum; the
//! engine routes each variant to the owning component.

use super::account::{AccountField, NewAccount};

/// Pagination, search and sort parameters of a history command
///
/// All fields are optional; the history engine applies the defaults
/// (page 1, page size = total matching count, no filter, natural order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Requested page, 1-based; absent or non-positive clamps to 1
    pub page_number: Option<i64>,
    /// Records per page; absent or non-positive means "everything"
    pub page_size: Option<i64>,
    /// `field:substring` search expression
    pub search: Option<String>,
    /// `field:asc|desc` sort expression
    pub sort: Option<String>,
}

/// A single operation against the banking core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new account with a zero balance
    Register(NewAccount),

    /// Authenticate an email/password pair through the login throttle
    Login { email: String, password: String },

    /// Read one account's public profile
    GetAccount { username: String },

    /// Change one account field, gated by the current password
    UpdateAccount {
        username: String,
        field: AccountField,
        value: String,
        password: String,
    },

    /// Remove an account, gated by the current password
    DeleteAccount { username: String, password: String },

    /// Credit funds, gated by the PIN
    Deposit {
        username: String,
        amount: i64,
        pin: String,
    },

    /// Debit funds, gated by the PIN and the sufficiency check
    Withdraw {
        username: String,
        amount: i64,
        pin: String,
    },

    /// Move funds to another account, gated by the PIN and sufficiency
    Transfer {
        username: String,
        amount: i64,
        description: String,
        to_account: String,
        pin: String,
    },

    /// Query the transaction history of an account
    History {
        username: String,
        query: HistoryQuery,
    },

    /// Delete one transaction record, gated by the PIN
    DeleteTransaction {
        username: String,
        transaction_id: String,
        pin: String,
    },
}

impl Command {
    /// Operation name, matching the `op` column of the command file
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::Register(_) => "register",
            Command::Login { .. } => "login",
            Command::GetAccount { .. } => "get_account",
            Command::UpdateAccount { .. } => "update_account",
            Command::DeleteAccount { .. } => "delete_account",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::Transfer { .. } => "transfer",
            Command::History { .. } => "history",
            Command::DeleteTransaction { .. } => "delete_transaction",
        }
    }

    /// Key the async strategy partitions by
    ///
    /// Commands sharing a key execute in file order relative to each
    /// other; commands with different keys may run concurrently. Login
    /// commands key on the email because the throttle state is
    /// per-identifier, everything else keys on the acting username.
    pub fn partition_key(&self) -> &str {
        match self {
            Command::Register(new_account) => &new_account.username,
            Command::Login { email, .. } => email,
            Command::GetAccount { username }
            | Command::UpdateAccount { username, .. }
            | Command::DeleteAccount { username, .. }
            | Command::Deposit { username, .. }
            | Command::Withdraw { username, .. }
            | Command::Transfer { username, .. }
            | Command::History { username, .. }
            | Command::DeleteTransaction { username, .. } => username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_key_uses_email_for_login() {
        let command = Command::Login {
            email: "alice@x.com".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(command.partition_key(), "alice@x.com");
    }

    #[test]
    fn test_partition_key_uses_username_for_ledger_ops() {
        let command = Command::Deposit {
            username: "alice".to_string(),
            amount: 10_000,
            pin: "123456".to_string(),
        };
        assert_eq!(command.partition_key(), "alice");
        assert_eq!(command.op_name(), "deposit");
    }
}
