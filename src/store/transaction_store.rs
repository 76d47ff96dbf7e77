//! In-memory transaction store
//!
//! Reference [`TransactionStore`] implementation backed by a
//! `parking_lot::RwLock<Vec>`. Records are kept in insertion order, which
//! is the natural order unsorted history queries observe. Sorting uses a
//! stable sort, so ties keep their insertion order too.

use parking_lot::RwLock;

use crate::store::traits::TransactionStore;
use crate::types::{HistoryFilter, HistorySort, Transaction};

/// Thread-safe in-memory transaction store
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        MemoryTransactionStore {
            transactions: RwLock::new(Vec::new()),
        }
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn insert(&self, transaction: Transaction) {
        self.transactions.write().push(transaction);
    }

    fn get(&self, transaction_id: &str) -> Option<Transaction> {
        self.transactions
            .read()
            .iter()
            .find(|tx| tx.transaction_id == transaction_id)
            .cloned()
    }

    fn count(&self, account_number: &str, filter: &HistoryFilter) -> usize {
        self.transactions
            .read()
            .iter()
            .filter(|tx| tx.account_number == account_number && filter.matches(tx))
            .count()
    }

    fn find(
        &self,
        account_number: &str,
        filter: &HistoryFilter,
        sort: Option<&HistorySort>,
        skip: usize,
        limit: usize,
    ) -> Vec<Transaction> {
        let transactions = self.transactions.read();

        let mut matching: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.account_number == account_number && filter.matches(tx))
            .collect();

        if let Some(sort) = sort {
            matching.sort_by(|a, b| sort.compare(a, b));
        }

        matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    fn remove(&self, transaction_id: &str) -> Option<Transaction> {
        let mut transactions = self.transactions.write();
        let index = transactions
            .iter()
            .position(|tx| tx.transaction_id == transaction_id)?;
        Some(transactions.remove(index))
    }
}
