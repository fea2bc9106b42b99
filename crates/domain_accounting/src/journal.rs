//! Manual journal entries
//!
//! Journal entries are the one document kind whose ledger lines are written
//! by hand. They must balance before publishing, and each line's stored
//! amount is sign-normalized exactly once, when the line is created.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::JournalEntryId;

use crate::account::Account;
use crate::error::AccountingError;
use crate::ledger::Ledger;
use crate::transaction::{DocumentRef, EntrySpec, SourceDocument, TransactionType};

/// A manually entered journal line
///
/// The stored `amount` is signed: a debit against a credit-normal account
/// (or a credit against a debit-normal account) is negated at construction,
/// so the aggregator can sum raw amounts per account without re-deriving
/// the sign from the account type at read time.
///
/// The sign is fixed once. Editing the line's account or type afterwards
/// does not recompute the stored amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Line identifier
    pub id: Uuid,
    /// Code of the account the line posts against
    account_code: String,
    /// Debit or credit, as entered
    entry_type: TransactionType,
    /// Signed stored amount
    amount: Decimal,
}

impl JournalEntryLine {
    /// Creates a line, normalizing the stored sign
    ///
    /// # Arguments
    ///
    /// * `account` - The account the line posts against
    /// * `entry_type` - Debit or credit, as entered by the user
    /// * `magnitude` - Non-negative amount as entered
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` when `magnitude` is negative.
    pub fn new(
        account: &Account,
        entry_type: TransactionType,
        magnitude: Decimal,
    ) -> Result<Self, AccountingError> {
        if magnitude.is_sign_negative() {
            return Err(AccountingError::InvalidAmount(format!(
                "journal line magnitude must not be negative, got {magnitude}"
            )));
        }

        let debit_normal = account.account_type.is_debit_normal();
        let amount = match entry_type {
            TransactionType::Debit if !debit_normal => -magnitude,
            TransactionType::Credit if debit_normal => -magnitude,
            _ => magnitude,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            account_code: account.code.clone(),
            entry_type,
            amount,
        })
    }

    /// The code of the account this line posts against
    pub fn account_code(&self) -> &str {
        &self.account_code
    }

    /// Debit or credit, as entered
    pub fn entry_type(&self) -> TransactionType {
        self.entry_type
    }

    /// The signed stored amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The amount as entered, before sign normalization
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    /// Points the line at a different account
    ///
    /// The stored amount keeps the sign computed when the line was created.
    pub fn set_account(&mut self, account: &Account) {
        self.account_code = account.code.clone();
    }

    /// Changes the line's entry type
    ///
    /// The stored amount keeps the sign computed when the line was created.
    pub fn set_entry_type(&mut self, entry_type: TransactionType) {
        self.entry_type = entry_type;
    }
}

/// A manual journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: JournalEntryId,
    /// Entry name shown on the ledger rows
    pub name: String,
    /// Free-form note
    pub note: String,
    /// Posting date
    pub date: NaiveDate,
    /// Published entries have ledger rows; publishing is one-way
    is_published: bool,
    /// The entry's lines
    lines: Vec<JournalEntryLine>,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates a draft journal entry
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: JournalEntryId::new_v7(),
            name: name.into(),
            note: String::new(),
            date,
            is_published: false,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Adds a line
    pub fn push_line(&mut self, line: JournalEntryLine) {
        self.lines.push(line);
    }

    /// The entry's lines
    pub fn lines(&self) -> &[JournalEntryLine] {
        &self.lines
    }

    /// Mutable access to a line by id
    pub fn line_mut(&mut self, id: Uuid) -> Option<&mut JournalEntryLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    /// Whether the entry has been published
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    /// Sum of debit line magnitudes, as entered
    pub fn total_debits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.entry_type == TransactionType::Debit)
            .map(JournalEntryLine::magnitude)
            .sum()
    }

    /// Sum of credit line magnitudes, as entered
    pub fn total_credits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.entry_type == TransactionType::Credit)
            .map(JournalEntryLine::magnitude)
            .sum()
    }

    /// Checks that the entry is publishable
    ///
    /// # Errors
    ///
    /// - `NotEnoughLines` with fewer than two lines
    /// - `Unbalanced` when debit and credit magnitudes differ
    pub fn validate(&self) -> Result<(), AccountingError> {
        if self.lines.len() < 2 {
            return Err(AccountingError::NotEnoughLines);
        }
        let debits = self.total_debits();
        let credits = self.total_credits();
        if debits != credits {
            return Err(AccountingError::Unbalanced { debits, credits });
        }
        Ok(())
    }

    /// Publishes the entry, writing its ledger rows
    ///
    /// One-way: a published entry cannot be published again or unpublished.
    /// Nothing is persisted when validation or posting fails.
    ///
    /// # Errors
    ///
    /// Validation errors from [`JournalEntry::validate`], `AlreadyPublished`,
    /// or any posting failure from the engine.
    pub fn mark_as_published(&mut self, ledger: &mut Ledger) -> Result<(), AccountingError> {
        if self.is_published {
            return Err(AccountingError::AlreadyPublished);
        }
        self.validate()?;

        let entries: Vec<EntrySpec> = self
            .lines
            .iter()
            .map(|line| EntrySpec {
                account_code: line.account_code.clone(),
                entry_type: line.entry_type,
                amount: line.amount,
                name: None,
            })
            .collect();

        ledger.post(&*self, &entries)?;
        self.is_published = true;
        Ok(())
    }
}

impl SourceDocument for JournalEntry {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::JournalEntry(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.date
    }

    fn posting_name(&self) -> String {
        format!("Journal Entry: {}", self.name)
    }

    fn posting_note(&self) -> String {
        self.note.clone()
    }
}
