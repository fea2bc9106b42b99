//! Ledger lines and the declarative posting contract
//!
//! Business documents never write ledger rows themselves: they hand the
//! engine an ordered list of [`EntrySpec`]s plus the header data carried by
//! the [`SourceDocument`] trait, and the engine materializes the rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{
    AccountId, BillId, ExpenseId, InvoiceId, JournalEntryId, PaymentMadeId, PaymentReceivedId,
    TransactionId,
};

/// Side of the ledger a line posts to
///
/// Debits increase asset and expense accounts and decrease liability, equity
/// and income accounts; credits are the inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference from a ledger line back to its source document
///
/// A closed enum over the document kinds that post to the ledger; each
/// variant carries the strongly-typed id of its document. The engine
/// dispatches on this tag, so there is no runtime model lookup to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "ref_type", content = "ref_id", rename_all = "snake_case")]
pub enum DocumentRef {
    Invoice(InvoiceId),
    Bill(BillId),
    Expense(ExpenseId),
    PaymentReceived(PaymentReceivedId),
    PaymentMade(PaymentMadeId),
    JournalEntry(JournalEntryId),
}

impl DocumentRef {
    /// Storage tag for the document kind
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentRef::Invoice(_) => "invoice",
            DocumentRef::Bill(_) => "bill",
            DocumentRef::Expense(_) => "expense",
            DocumentRef::PaymentReceived(_) => "payment_received",
            DocumentRef::PaymentMade(_) => "payment_made",
            DocumentRef::JournalEntry(_) => "journal_entry",
        }
    }

    /// The underlying document id
    pub fn ref_uuid(&self) -> Uuid {
        match self {
            DocumentRef::Invoice(id) => (*id).into(),
            DocumentRef::Bill(id) => (*id).into(),
            DocumentRef::Expense(id) => (*id).into(),
            DocumentRef::PaymentReceived(id) => (*id).into(),
            DocumentRef::PaymentMade(id) => (*id).into(),
            DocumentRef::JournalEntry(id) => (*id).into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.ref_uuid())
    }
}

/// A single ledger line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Source document this line belongs to
    pub doc_ref: DocumentRef,
    /// Display name, usually the source document's
    pub name: String,
    /// Free-form note carried from the source document
    pub note: String,
    /// Posting date of the source document
    pub date: NaiveDate,
    /// Account the line posts against
    pub account_id: AccountId,
    /// Debit or credit
    pub entry_type: TransactionType,
    /// Signed amount, two fractional digits
    pub amount: Decimal,
    /// When the line was written
    pub created_at: DateTime<Utc>,
}

/// One requested ledger line, account addressed by code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySpec {
    /// Code of the account to post against, resolved active at posting time
    pub account_code: String,
    /// Debit or credit
    pub entry_type: TransactionType,
    /// Signed amount
    pub amount: Decimal,
    /// Per-entry name override (e.g., the tax name on aggregated tax rows)
    pub name: Option<String>,
}

impl EntrySpec {
    /// Creates a debit entry
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: TransactionType::Debit,
            amount,
            name: None,
        }
    }

    /// Creates a credit entry
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: TransactionType::Credit,
            amount,
            name: None,
        }
    }

    /// Overrides the row name for this entry
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Header data a document supplies when posting
///
/// Implemented by every document kind in [`DocumentRef`]. The reference must
/// be stable for the document's lifetime: the engine keys the atomic replace
/// on it.
pub trait SourceDocument {
    /// Stable reference identifying the document
    fn document_ref(&self) -> DocumentRef;

    /// Posting date written on each ledger line
    fn posting_date(&self) -> NaiveDate;

    /// Display name written on each ledger line
    fn posting_name(&self) -> String;

    /// Note written on each ledger line
    fn posting_note(&self) -> String;
}
