//! History query engine: filtered, sorted, paginated retrieval
//!
//! Resolves a username to its account number, builds filter and sort
//! descriptors from the query's `field:substring` / `field:asc|desc`
//! expressions, and assembles a pagination envelope around the matching
//! records. A page number past the end is not an error; it yields an
//! empty page inside a well-formed envelope.

use serde::Serialize;
use std::sync::Arc;

use crate::store::{AccountStore, TransactionStore};
use crate::types::{BankError, HistoryFilter, HistoryQuery, HistorySort, Transaction};

/// One page of transaction history with its pagination envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    /// 1-based page number actually served
    pub page_number: u64,
    /// Page size actually used (the total matching count when the query
    /// did not constrain it)
    pub page_size: usize,
    /// Total records matching the account and filter, across all pages
    pub count: usize,
    /// Total pages, at least 1 even when nothing matches
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<Transaction>,
}

/// Read-side query engine over transaction records
pub struct HistoryService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl HistoryService {
    pub fn new(accounts: Arc<dyn AccountStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        HistoryService {
            accounts,
            transactions,
        }
    }

    /// Query one account's transaction history
    ///
    /// Defaults: page 1, page size = total matching count (one single
    /// page), no filter, natural insertion order. A non-positive page
    /// number clamps to 1.
    pub fn history(&self, username: &str, query: &HistoryQuery) -> Result<HistoryPage, BankError> {
        let account = self
            .accounts
            .find_by_username(username)
            .ok_or_else(|| BankError::account_not_found(username))?;

        let filter = HistoryFilter::parse(query.search.as_deref());
        let sort = HistorySort::parse(query.sort.as_deref());

        let count = self.transactions.count(&account.account_number, &filter);

        let page_number = query.page_number.unwrap_or(1).max(1) as u64;
        let page_size = match query.page_size {
            Some(size) if size > 0 => size as usize,
            _ => count,
        };

        let total_pages = if count == 0 || page_size == 0 {
            1
        } else {
            count.div_ceil(page_size) as u64
        };

        let offset = usize::try_from((page_number - 1).saturating_mul(page_size as u64))
            .unwrap_or(usize::MAX);

        let data = self.transactions.find(
            &account.account_number,
            &filter,
            sort.as_ref(),
            offset,
            page_size,
        );

        Ok(HistoryPage {
            page_number,
            page_size,
            count,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAccountStore, MemoryTransactionStore};
    use crate::types::{Account, TransactionKind};

    fn fixture(transaction_count: usize) -> HistoryService {
        let accounts = Arc::new(MemoryAccountStore::new());
        let transactions = Arc::new(MemoryTransactionStore::new());

        accounts
            .insert(Account {
                username: "alice".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "$argon2id$pw".to_string(),
                phone_number: "0801".to_string(),
                address: "1 Main St".to_string(),
                pin_hash: "$argon2id$pin".to_string(),
                account_number: "391000000001".to_string(),
                balance: 0,
            })
            .unwrap();

        for i in 0..transaction_count {
            let (kind, amount) = if i % 2 == 0 {
                (TransactionKind::Deposit, 1_000 + i as i64)
            } else {
                (TransactionKind::Withdraw, -(500 + i as i64))
            };
            transactions.insert(Transaction {
                transaction_id: format!("tx-{:08}", i),
                account_number: "391000000001".to_string(),
                kind,
                amount,
                date: format!("2024-05-{:02}", (i % 28) + 1),
                time: "10:00:00".to_string(),
            });
        }

        HistoryService::new(accounts, transactions)
    }

    #[test]
    fn test_defaults_serve_everything_as_one_page() {
        let service = fixture(5);

        let page = service.history("alice", &HistoryQuery::default()).unwrap();
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_previous_page);
        assert!(!page.has_next_page);
        assert_eq!(page.data.len(), 5);
    }

    #[test]
    fn test_middle_page_has_both_neighbours() {
        let service = fixture(5);

        let query = HistoryQuery {
            page_number: Some(2),
            page_size: Some(2),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
        let ids: Vec<&str> = page.data.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["tx-00000002", "tx-00000003"]);
    }

    #[test]
    fn test_last_page_may_be_short() {
        let service = fixture(5);

        let query = HistoryQuery {
            page_number: Some(3),
            page_size: Some(2),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_page_beyond_the_end_is_empty_but_well_formed() {
        let service = fixture(5);

        let query = HistoryQuery {
            page_number: Some(99),
            page_size: Some(2),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        assert_eq!(page.page_number, 99);
        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.data.is_empty());
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_non_positive_page_number_clamps_to_one() {
        let service = fixture(5);

        for bad_page in [0, -7] {
            let query = HistoryQuery {
                page_number: Some(bad_page),
                page_size: Some(2),
                ..Default::default()
            };
            let page = service.history("alice", &query).unwrap();
            assert_eq!(page.page_number, 1);
            assert!(!page.has_previous_page);
            assert_eq!(page.data[0].transaction_id, "tx-00000000");
        }
    }

    #[test]
    fn test_non_positive_page_size_means_everything() {
        let service = fixture(5);

        let query = HistoryQuery {
            page_size: Some(0),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();
        assert_eq!(page.page_size, 5);
        assert_eq!(page.data.len(), 5);
    }

    #[test]
    fn test_empty_history_keeps_envelope_sane() {
        let service = fixture(0);

        let page = service.history("alice", &HistoryQuery::default()).unwrap();
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next_page);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_search_filters_and_recounts() {
        let service = fixture(6);

        let query = HistoryQuery {
            search: Some("type:deposit".to_string()),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        assert_eq!(page.count, 3);
        assert!(page
            .data
            .iter()
            .all(|t| t.kind == TransactionKind::Deposit));
    }

    #[test]
    fn test_search_on_unknown_field_matches_nothing() {
        let service = fixture(4);

        let query = HistoryQuery {
            search: Some("description:rent".to_string()),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_sort_descending_by_amount() {
        let service = fixture(4);

        let query = HistoryQuery {
            sort: Some("amount:desc".to_string()),
            ..Default::default()
        };
        let page = service.history("alice", &query).unwrap();

        let amounts: Vec<i64> = page.data.iter().map(|t| t.amount).collect();
        let mut sorted = amounts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(amounts, sorted);
    }

    #[test]
    fn test_unknown_username_is_an_error() {
        let service = fixture(1);

        let err = service
            .history("nobody", &HistoryQuery::default())
            .unwrap_err();
        assert!(matches!(err, BankError::AccountNotFound { .. }));
    }
}
