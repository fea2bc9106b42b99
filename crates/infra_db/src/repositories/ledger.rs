//! Ledger repository
//!
//! Durable counterpart to the in-memory posting engine. The replace runs as
//! delete-then-insert inside one database transaction, so a concurrent
//! reader sees either the fully-old or fully-new row set for a document,
//! never a partial one. Two concurrent replaces of the same reference are
//! last-committer-wins; no advisory lock is taken.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::AccountId;
use domain_accounting::{DocumentRef, StoreError, Transaction, TransactionStore, TransactionType};

use crate::error::DatabaseError;

/// Repository for ledger transaction rows
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

/// Flat transaction row as stored
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    ref_type: String,
    ref_id: Uuid,
    account_id: Uuid,
    entry_type: String,
    amount: Decimal,
    date: NaiveDate,
    name: String,
    note: String,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> Result<Transaction, DatabaseError> {
        Ok(Transaction {
            id: self.id.into(),
            doc_ref: doc_ref_from_parts(&self.ref_type, self.ref_id)?,
            name: self.name,
            note: self.note,
            date: self.date,
            account_id: self.account_id.into(),
            entry_type: parse_entry_type(&self.entry_type)?,
            amount: self.amount,
            created_at: self.created_at,
        })
    }
}

impl LedgerRepository {
    /// Creates a new repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically replaces every row for a document's reference
    ///
    /// Delete and inserts commit together; a failed insert rolls the delete
    /// back, leaving the document's previous rows intact.
    #[instrument(skip(self, rows), fields(doc_ref = %doc_ref, count = rows.len()))]
    pub async fn replace_for_document(
        &self,
        doc_ref: DocumentRef,
        rows: &[Transaction],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM transactions WHERE ref_type = $1 AND ref_id = $2")
            .bind(doc_ref.kind())
            .bind(doc_ref.ref_uuid())
            .execute(&mut *tx)
            .await?;

        for row in rows {
            sqlx::query(
                "INSERT INTO transactions \
                 (id, ref_type, ref_id, account_id, entry_type, amount, date, name, note, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(Uuid::from(row.id))
            .bind(row.doc_ref.kind())
            .bind(row.doc_ref.ref_uuid())
            .bind(Uuid::from(row.account_id))
            .bind(row.entry_type.as_str())
            .bind(row.amount)
            .bind(row.date)
            .bind(&row.name)
            .bind(&row.note)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("replaced document transactions");
        Ok(())
    }

    /// Deletes every row for a document's reference
    ///
    /// Returns the number of rows removed; zero is not an error.
    pub async fn delete_for_document(&self, doc_ref: DocumentRef) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM transactions WHERE ref_type = $1 AND ref_id = $2")
            .bind(doc_ref.kind())
            .bind(doc_ref.ref_uuid())
            .execute(&self.pool)
            .await?;
        debug!(%doc_ref, removed = result.rows_affected(), "deleted document transactions");
        Ok(result.rows_affected())
    }

    /// Raw signed sum of the rows posted against an account
    pub async fn balance_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Decimal, DatabaseError> {
        let (balance,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE account_id = $1",
        )
        .bind(Uuid::from(account_id))
        .fetch_one(&self.pool)
        .await?;
        Ok(balance)
    }

    /// The rows recorded for a document, in posting order
    pub async fn rows_for_document(
        &self,
        doc_ref: DocumentRef,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            "SELECT id, ref_type, ref_id, account_id, entry_type, amount, date, name, note, created_at \
             FROM transactions WHERE ref_type = $1 AND ref_id = $2 ORDER BY created_at, id",
        )
        .bind(doc_ref.kind())
        .bind(doc_ref.ref_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }
}

#[async_trait]
impl TransactionStore for LedgerRepository {
    async fn replace_document_transactions(
        &self,
        doc_ref: DocumentRef,
        rows: Vec<Transaction>,
    ) -> Result<(), StoreError> {
        self.replace_for_document(doc_ref, &rows)
            .await
            .map_err(StoreError::from)
    }

    async fn delete_document_transactions(&self, doc_ref: DocumentRef) -> Result<u64, StoreError> {
        self.delete_for_document(doc_ref).await.map_err(StoreError::from)
    }

    async fn account_balance(&self, account_id: AccountId) -> Result<Decimal, StoreError> {
        self.balance_for_account(account_id)
            .await
            .map_err(StoreError::from)
    }

    async fn transactions_for(&self, doc_ref: DocumentRef) -> Result<Vec<Transaction>, StoreError> {
        self.rows_for_document(doc_ref).await.map_err(StoreError::from)
    }
}

fn doc_ref_from_parts(ref_type: &str, ref_id: Uuid) -> Result<DocumentRef, DatabaseError> {
    match ref_type {
        "invoice" => Ok(DocumentRef::Invoice(ref_id.into())),
        "bill" => Ok(DocumentRef::Bill(ref_id.into())),
        "expense" => Ok(DocumentRef::Expense(ref_id.into())),
        "payment_received" => Ok(DocumentRef::PaymentReceived(ref_id.into())),
        "payment_made" => Ok(DocumentRef::PaymentMade(ref_id.into())),
        "journal_entry" => Ok(DocumentRef::JournalEntry(ref_id.into())),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown document kind '{other}'"
        ))),
    }
}

fn parse_entry_type(value: &str) -> Result<TransactionType, DatabaseError> {
    match value {
        "debit" => Ok(TransactionType::Debit),
        "credit" => Ok(TransactionType::Credit),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown entry type '{other}'"
        ))),
    }
}
