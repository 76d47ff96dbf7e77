//! CSV format handling for command rows and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvCommand structure for deserialization
//! - Conversion from raw rows to typed [`Command`]s
//! - Final account-state serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! The command file uses one column superset across operations; columns an
//! operation does not use stay empty. Numeric columns arrive as strings
//! and are parsed here so a malformed value is reported per-row instead of
//! aborting the whole file.

use serde::Deserialize;
use std::io::Write;

use crate::types::{
    AccountProfile, BankError, Command, HistoryQuery, NewAccount,
};

/// Raw command row as deserialized from the CSV input
///
/// Only `op` is mandatory at this level; every other column is optional
/// and validated per operation by [`convert_csv_command`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CsvCommand {
    pub op: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirm: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub page_number: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Header row of the command file, in column order
pub const COMMAND_HEADERS: [&str; 18] = [
    "op",
    "username",
    "email",
    "password",
    "password_confirm",
    "phone_number",
    "address",
    "pin",
    "amount",
    "to_account",
    "description",
    "field",
    "value",
    "transaction_id",
    "page_number",
    "page_size",
    "search",
    "sort",
];

/// Convert a raw CSV row into a typed command
///
/// Validates per-operation required fields and parses numeric columns.
///
/// # Errors
///
/// - `MissingField` when an operation's required column is empty
/// - `InvalidCommand` for an unknown op, unknown update field, or a
///   numeric column that does not parse
pub fn convert_csv_command(row: CsvCommand) -> Result<Command, BankError> {
    let op = row.op.trim().to_lowercase();

    match op.as_str() {
        "register" => Ok(Command::Register(NewAccount {
            username: require(&op, "username", row.username)?,
            email: require(&op, "email", row.email)?,
            password: require(&op, "password", row.password)?,
            password_confirm: require(&op, "password_confirm", row.password_confirm)?,
            phone_number: require(&op, "phone_number", row.phone_number)?,
            address: require(&op, "address", row.address)?,
            pin: require(&op, "pin", row.pin)?,
        })),
        "login" => Ok(Command::Login {
            email: require(&op, "email", row.email)?,
            password: require(&op, "password", row.password)?,
        }),
        "get_account" => Ok(Command::GetAccount {
            username: require(&op, "username", row.username)?,
        }),
        "update_account" => Ok(Command::UpdateAccount {
            username: require(&op, "username", row.username)?,
            field: require(&op, "field", row.field)?.parse()?,
            value: require(&op, "value", row.value)?,
            password: require(&op, "password", row.password)?,
        }),
        "delete_account" => Ok(Command::DeleteAccount {
            username: require(&op, "username", row.username)?,
            password: require(&op, "password", row.password)?,
        }),
        "deposit" => Ok(Command::Deposit {
            username: require(&op, "username", row.username)?,
            amount: parse_amount(&op, row.amount)?,
            pin: require(&op, "pin", row.pin)?,
        }),
        "withdraw" => Ok(Command::Withdraw {
            username: require(&op, "username", row.username)?,
            amount: parse_amount(&op, row.amount)?,
            pin: require(&op, "pin", row.pin)?,
        }),
        "transfer" => Ok(Command::Transfer {
            username: require(&op, "username", row.username)?,
            amount: parse_amount(&op, row.amount)?,
            description: optional(row.description).unwrap_or_default(),
            to_account: require(&op, "to_account", row.to_account)?,
            pin: require(&op, "pin", row.pin)?,
        }),
        "history" => Ok(Command::History {
            username: require(&op, "username", row.username)?,
            query: HistoryQuery {
                page_number: parse_optional_number(&op, "page_number", row.page_number)?,
                page_size: parse_optional_number(&op, "page_size", row.page_size)?,
                search: optional(row.search),
                sort: optional(row.sort),
            },
        }),
        "delete_transaction" => Ok(Command::DeleteTransaction {
            username: require(&op, "username", row.username)?,
            transaction_id: require(&op, "transaction_id", row.transaction_id)?,
            pin: require(&op, "pin", row.pin)?,
        }),
        other => Err(BankError::invalid_command(format!("unknown op '{other}'"))),
    }
}

/// Write final account states as CSV
///
/// Columns: account_number, username, balance. Rows are sorted by account
/// number for deterministic output.
pub fn write_accounts_csv(
    accounts: &[AccountProfile],
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account_number", "username", "balance"])?;

    let mut sorted: Vec<&AccountProfile> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.account_number.cmp(&b.account_number));

    for account in sorted {
        writer.write_record([
            account.account_number.as_str(),
            account.username.as_str(),
            &account.balance.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(op: &str, name: &str, value: Option<String>) -> Result<String, BankError> {
    optional(value).ok_or_else(|| BankError::missing_field(op, name))
}

fn parse_amount(op: &str, value: Option<String>) -> Result<i64, BankError> {
    let raw = require(op, "amount", value)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| BankError::invalid_command(format!("invalid amount '{raw}' for {op}")))
}

fn parse_optional_number(
    op: &str,
    name: &str,
    value: Option<String>,
) -> Result<Option<i64>, BankError> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| BankError::invalid_command(format!("invalid {name} '{raw}' for {op}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountField;
    use rstest::rstest;

    fn row(op: &str) -> CsvCommand {
        CsvCommand {
            op: op.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_register() {
        let mut csv_row = row("register");
        csv_row.username = Some("alice".to_string());
        csv_row.email = Some("alice@x.com".to_string());
        csv_row.password = Some("correct horse".to_string());
        csv_row.password_confirm = Some("correct horse".to_string());
        csv_row.phone_number = Some("0800000000001".to_string());
        csv_row.address = Some("1 Main St".to_string());
        csv_row.pin = Some("123456".to_string());

        match convert_csv_command(csv_row).unwrap() {
            Command::Register(new_account) => {
                assert_eq!(new_account.username, "alice");
                assert_eq!(new_account.pin, "123456");
            }
            other => panic!("expected Register, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_deposit_parses_amount() {
        let mut csv_row = row("deposit");
        csv_row.username = Some("alice".to_string());
        csv_row.amount = Some("10000".to_string());
        csv_row.pin = Some("123456".to_string());

        assert_eq!(
            convert_csv_command(csv_row).unwrap(),
            Command::Deposit {
                username: "alice".to_string(),
                amount: 10_000,
                pin: "123456".to_string(),
            }
        );
    }

    #[test]
    fn test_convert_update_account_parses_field() {
        let mut csv_row = row("update_account");
        csv_row.username = Some("alice".to_string());
        csv_row.field = Some("address".to_string());
        csv_row.value = Some("9 Elm St".to_string());
        csv_row.password = Some("correct horse".to_string());

        match convert_csv_command(csv_row).unwrap() {
            Command::UpdateAccount { field, .. } => assert_eq!(field, AccountField::Address),
            other => panic!("expected UpdateAccount, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_history_with_paging() {
        let mut csv_row = row("history");
        csv_row.username = Some("alice".to_string());
        csv_row.page_number = Some("2".to_string());
        csv_row.page_size = Some("10".to_string());
        csv_row.search = Some("type:deposit".to_string());
        csv_row.sort = Some("amount:desc".to_string());

        match convert_csv_command(csv_row).unwrap() {
            Command::History { query, .. } => {
                assert_eq!(query.page_number, Some(2));
                assert_eq!(query.page_size, Some(10));
                assert_eq!(query.search.as_deref(), Some("type:deposit"));
                assert_eq!(query.sort.as_deref(), Some("amount:desc"));
            }
            other => panic!("expected History, got {:?}", other),
        }
    }

    #[rstest]
    #[case::missing_pin("deposit", "pin")]
    #[case::missing_amount("withdraw", "amount")]
    fn test_missing_required_field(#[case] op: &str, #[case] missing: &str) {
        let mut csv_row = row(op);
        csv_row.username = Some("alice".to_string());
        if missing != "amount" {
            csv_row.amount = Some("100".to_string());
        }
        if missing != "pin" {
            csv_row.pin = Some("123456".to_string());
        }

        let err = convert_csv_command(csv_row).unwrap_err();
        assert_eq!(err, BankError::missing_field(op, missing));
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut csv_row = row("login");
        csv_row.email = Some("  ".to_string());
        csv_row.password = Some("pw".to_string());

        let err = convert_csv_command(csv_row).unwrap_err();
        assert_eq!(err, BankError::missing_field("login", "email"));
    }

    #[test]
    fn test_malformed_amount_rejected() {
        let mut csv_row = row("deposit");
        csv_row.username = Some("alice".to_string());
        csv_row.amount = Some("ten thousand".to_string());
        csv_row.pin = Some("123456".to_string());

        let err = convert_csv_command(csv_row).unwrap_err();
        assert!(matches!(err, BankError::InvalidCommand { .. }));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let err = convert_csv_command(row("fly_to_the_moon")).unwrap_err();
        assert!(matches!(err, BankError::InvalidCommand { .. }));
    }

    #[test]
    fn test_op_is_case_insensitive() {
        let mut csv_row = row("LOGIN");
        csv_row.email = Some("alice@x.com".to_string());
        csv_row.password = Some("pw".to_string());

        assert!(matches!(
            convert_csv_command(csv_row).unwrap(),
            Command::Login { .. }
        ));
    }

    #[test]
    fn test_write_accounts_csv_sorted_by_account_number() {
        let accounts = vec![
            AccountProfile {
                username: "bob".to_string(),
                email: "bob@x.com".to_string(),
                phone_number: "0802".to_string(),
                address: "2 Main St".to_string(),
                account_number: "391000000002".to_string(),
                balance: 4_000,
            },
            AccountProfile {
                username: "alice".to_string(),
                email: "alice@x.com".to_string(),
                phone_number: "0801".to_string(),
                address: "1 Main St".to_string(),
                account_number: "391000000001".to_string(),
                balance: 6_000,
            },
        ];

        let mut output = Vec::new();
        write_accounts_csv(&accounts, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "account_number,username,balance");
        assert_eq!(lines[1], "391000000001,alice,6000");
        assert_eq!(lines[2], "391000000002,bob,4000");
    }
}
