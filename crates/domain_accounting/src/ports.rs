//! Persistence port for the transaction store
//!
//! The in-memory [`crate::Ledger`] is the authoritative engine; durable
//! adapters implement this trait with the same atomic-replace semantics
//! (delete old rows, insert new rows, one transaction boundary).

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::AccountId;

use crate::transaction::{DocumentRef, Transaction};

/// Error type for store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation conflicts with existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The underlying store is unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// An internal adapter error occurred
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Durable transaction store for ledger lines
///
/// Implementations must guarantee that `replace_document_transactions` is
/// atomic: a concurrent reader observes either the fully-old or fully-new
/// row set for the document, never a partial one.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Atomically replaces every row for the document's reference
    async fn replace_document_transactions(
        &self,
        doc_ref: DocumentRef,
        rows: Vec<Transaction>,
    ) -> Result<(), StoreError>;

    /// Deletes every row for the document's reference
    ///
    /// Returns the number of rows removed; zero is not an error.
    async fn delete_document_transactions(&self, doc_ref: DocumentRef)
        -> Result<u64, StoreError>;

    /// Raw signed sum of the rows posted against an account
    async fn account_balance(&self, account_id: AccountId) -> Result<Decimal, StoreError>;

    /// The rows recorded for a document
    async fn transactions_for(&self, doc_ref: DocumentRef)
        -> Result<Vec<Transaction>, StoreError>;
}
