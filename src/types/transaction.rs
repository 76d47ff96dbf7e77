//! Transaction-related types for the banking core
//!
//! This module defines the immutable transaction record written by the
//! ledger engine, plus the filter and sort descriptors the history query
//! engine hands to the transaction store.
//!
//! # Sign Convention
//!
//! A transaction's `amount` is always the signed delta actually applied to
//! the balance: deposits and incoming transfers are positive, withdrawals
//! and outgoing transfers are negative. One convention, applied uniformly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Length of a generated transaction id
pub const TRANSACTION_ID_LEN: usize = 12;

/// Movement categories recorded in the ledger
///
/// A transfer produces two records, one per leg: `TransferOut` on the
/// source account and `TransferIn` on the destination account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Credit funds into an account
    Deposit,
    /// Debit funds from an account
    Withdraw,
    /// Credit leg of a transfer, recorded on the destination account
    #[serde(rename = "Transfer In")]
    TransferIn,
    /// Debit leg of a transfer, recorded on the source account
    #[serde(rename = "Transfer Out")]
    TransferOut,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::TransferIn => "Transfer In",
            TransactionKind::TransferOut => "Transfer Out",
        };
        f.write_str(label)
    }
}

/// Immutable ledger record
///
/// Created once per balance movement and never modified afterwards; the
/// only mutation is explicit deletion by transaction id. References its
/// account weakly by account number: deleting the account leaves its
/// records in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 12-character random alphanumeric id, best-effort unique
    pub transaction_id: String,

    /// Account number of the account whose balance this record moved
    pub account_number: String,

    /// Movement category
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Signed delta applied to the balance, in minor units
    pub amount: i64,

    /// Calendar date of the movement, `YYYY-MM-DD`
    pub date: String,

    /// Wall-clock time of the movement, `HH:MM:SS`
    pub time: String,
}

/// Transaction fields addressable by history search and sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    TransactionId,
    AccountNumber,
    Kind,
    Amount,
    Date,
    Time,
}

impl TransactionField {
    /// Parse a field name from a search or sort expression
    ///
    /// Returns `None` for unrecognized names; the caller decides whether
    /// that means "match nothing" (search) or "natural order" (sort).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "transaction_id" => Some(TransactionField::TransactionId),
            "account_number" => Some(TransactionField::AccountNumber),
            "type" => Some(TransactionField::Kind),
            "amount" => Some(TransactionField::Amount),
            "date" => Some(TransactionField::Date),
            "time" => Some(TransactionField::Time),
            _ => None,
        }
    }
}

impl Transaction {
    /// Textual form of one field, used for substring matching
    pub fn field_text(&self, field: TransactionField) -> String {
        match field {
            TransactionField::TransactionId => self.transaction_id.clone(),
            TransactionField::AccountNumber => self.account_number.clone(),
            TransactionField::Kind => self.kind.to_string(),
            TransactionField::Amount => self.amount.to_string(),
            TransactionField::Date => self.date.clone(),
            TransactionField::Time => self.time.clone(),
        }
    }

    /// Field-wise ordering used by history sorting
    ///
    /// The amount field compares numerically; every other field compares
    /// as text.
    pub fn compare_by(&self, other: &Self, field: TransactionField) -> Ordering {
        match field {
            TransactionField::Amount => self.amount.cmp(&other.amount),
            _ => self.field_text(field).cmp(&other.field_text(field)),
        }
    }
}

/// Filter descriptor built from a `field:substring` search expression
///
/// Matching is case-insensitive on the textual form of the field. An
/// unrecognized field name yields [`HistoryFilter::Nothing`]: the query is
/// well-formed but cannot match any record, mirroring a lookup on a field
/// no document has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    /// No search expression: every record of the account matches
    All,
    /// Case-insensitive substring match on one field
    Field {
        field: TransactionField,
        needle: String,
    },
    /// Search named an unknown field: no record matches
    Nothing,
}

impl HistoryFilter {
    /// Build a filter from an optional `field:substring` expression
    ///
    /// A missing colon treats the whole expression as a field name with an
    /// empty needle, which matches every record carrying that field.
    pub fn parse(search: Option<&str>) -> Self {
        let Some(search) = search else {
            return HistoryFilter::All;
        };
        let (name, needle) = match search.split_once(':') {
            Some((name, needle)) => (name, needle),
            None => (search, ""),
        };
        match TransactionField::parse(name) {
            Some(field) => HistoryFilter::Field {
                field,
                needle: needle.to_lowercase(),
            },
            None => HistoryFilter::Nothing,
        }
    }

    /// Whether a record satisfies this filter
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Field { field, needle } => {
                tx.field_text(*field).to_lowercase().contains(needle)
            }
            HistoryFilter::Nothing => false,
        }
    }
}

/// Sort direction for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort descriptor built from a `field:asc|desc` expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySort {
    pub field: TransactionField,
    pub order: SortOrder,
}

impl HistorySort {
    /// Build a sort descriptor from an optional `field:asc|desc` expression
    ///
    /// Returns `None` (natural insertion order) when the expression is
    /// absent or names an unknown field. An unrecognized or omitted order
    /// defaults to ascending.
    pub fn parse(sort: Option<&str>) -> Option<Self> {
        let sort = sort?;
        let (name, order) = match sort.split_once(':') {
            Some((name, order)) => (name, order),
            None => (sort, "asc"),
        };
        let field = TransactionField::parse(name)?;
        let order = if order == "desc" {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        Some(HistorySort { field, order })
    }

    /// Ordering of two records under this descriptor
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = a.compare_by(b, self.field);
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tx(kind: TransactionKind, amount: i64) -> Transaction {
        Transaction {
            transaction_id: "aB3dE6gH9jK2".to_string(),
            account_number: "391000000001".to_string(),
            kind,
            amount,
            date: "2024-05-01".to_string(),
            time: "09:30:00".to_string(),
        }
    }

    #[rstest]
    #[case(TransactionKind::Deposit, "Deposit")]
    #[case(TransactionKind::Withdraw, "Withdraw")]
    #[case(TransactionKind::TransferIn, "Transfer In")]
    #[case(TransactionKind::TransferOut, "Transfer Out")]
    fn test_kind_display(#[case] kind: TransactionKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_kind_serializes_with_spaces() {
        let json = serde_json::to_string(&TransactionKind::TransferOut).unwrap();
        assert_eq!(json, "\"Transfer Out\"");
    }

    #[rstest]
    #[case::absent(None, true)]
    #[case::type_match(Some("type:transfer"), true)]
    #[case::type_case_insensitive(Some("type:TRANSFER IN"), true)]
    #[case::type_mismatch(Some("type:deposit"), false)]
    #[case::date_prefix(Some("date:2024-05"), true)]
    #[case::unknown_field(Some("description:x"), false)]
    #[case::known_field_no_colon(Some("date"), true)]
    #[case::unknown_field_no_colon(Some("bogus"), false)]
    fn test_filter_matching(#[case] search: Option<&str>, #[case] expect_match: bool) {
        let filter = HistoryFilter::parse(search);
        assert_eq!(filter.matches(&tx(TransactionKind::TransferIn, 4000)), expect_match);
    }

    #[test]
    fn test_amount_sorts_numerically() {
        let small = tx(TransactionKind::Deposit, 900);
        let big = tx(TransactionKind::Deposit, 5000);

        let sort = HistorySort::parse(Some("amount:asc")).unwrap();
        assert_eq!(sort.compare(&small, &big), Ordering::Less);

        // Text comparison would order "5000" before "900"
        let sort = HistorySort::parse(Some("amount:desc")).unwrap();
        assert_eq!(sort.compare(&small, &big), Ordering::Greater);
    }

    #[rstest]
    #[case::absent(None)]
    #[case::unknown_field(Some("description:asc"))]
    fn test_sort_falls_back_to_natural_order(#[case] sort: Option<&str>) {
        assert!(HistorySort::parse(sort).is_none());
    }

    #[test]
    fn test_unrecognized_order_defaults_to_ascending() {
        let sort = HistorySort::parse(Some("amount:sideways")).unwrap();
        assert_eq!(sort.order, SortOrder::Ascending);

        let sort = HistorySort::parse(Some("amount")).unwrap();
        assert_eq!(sort.order, SortOrder::Ascending);
    }
}
