//! The ledger posting engine
//!
//! Single authority over the transaction store: documents ask it to replace
//! or delete their ledger lines, and read-side callers ask it for balances.
//!
//! # Invariants
//!
//! - A document's lines are replaced wholesale; re-posting the same entries
//!   leaves the store unchanged
//! - Every line resolves to an active account at the moment it is written
//! - A failed posting leaves the document's previous lines intact

use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::{AccountId, TransactionId};

use crate::account::Account;
use crate::chart::ChartOfAccounts;
use crate::error::AccountingError;
use crate::transaction::{DocumentRef, EntrySpec, SourceDocument, Transaction};

/// The ledger: chart of accounts plus the transaction store
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    chart: ChartOfAccounts,
    rows: Vec<Transaction>,
}

impl Ledger {
    /// Creates a ledger over an existing chart
    pub fn new(chart: ChartOfAccounts) -> Self {
        Self {
            chart,
            rows: Vec::new(),
        }
    }

    /// Creates a ledger seeded with the default chart of accounts
    pub fn with_default_chart() -> Self {
        Self::new(ChartOfAccounts::with_defaults())
    }

    /// The chart of accounts
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Mutable access to the chart of accounts
    ///
    /// Account deletion goes through [`Ledger::delete_account`] instead, so
    /// the referential guard cannot be bypassed.
    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    /// Replaces a document's ledger lines
    ///
    /// Every entry is staged first: each `account_code` must resolve to an
    /// active account. Only when the whole set resolves are the document's
    /// existing lines deleted and the staged lines written, so a failure
    /// cannot leave the document half-posted.
    ///
    /// Calling this twice with the same entries yields the same final rows.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` / `AccountArchived` when an entry's code does not
    ///   resolve to an active account
    /// - `MultipleAccounts` when a code matches more than one active account
    pub fn post(
        &mut self,
        source: &dyn SourceDocument,
        entries: &[EntrySpec],
    ) -> Result<(), AccountingError> {
        let doc_ref = source.document_ref();

        let mut staged = Vec::with_capacity(entries.len());
        for entry in entries {
            let account = self.chart.resolve_active(&entry.account_code)?;
            staged.push(Transaction {
                id: TransactionId::new_v7(),
                doc_ref,
                name: entry
                    .name
                    .clone()
                    .unwrap_or_else(|| source.posting_name()),
                note: source.posting_note(),
                date: source.posting_date(),
                account_id: account.id,
                entry_type: entry.entry_type,
                amount: entry.amount,
                created_at: chrono::Utc::now(),
            });
        }

        self.rows.retain(|row| row.doc_ref != doc_ref);
        self.rows.extend(staged);
        debug!(%doc_ref, rows = entries.len(), "replaced document transactions");
        Ok(())
    }

    /// Deletes every ledger line for a document
    ///
    /// Used when a document moves back to draft or is deleted. Not an error
    /// when no lines exist.
    pub fn delete(&mut self, doc_ref: DocumentRef) {
        let before = self.rows.len();
        self.rows.retain(|row| row.doc_ref != doc_ref);
        debug!(%doc_ref, removed = before - self.rows.len(), "deleted document transactions");
    }

    /// Raw signed sum of every line posted against an account
    pub fn account_balance(&self, account_id: &AccountId) -> Decimal {
        self.rows
            .iter()
            .filter(|row| row.account_id == *account_id)
            .map(|row| row.amount)
            .sum()
    }

    /// The ledger lines for a document, in posting order
    pub fn transactions_for(&self, doc_ref: DocumentRef) -> Vec<&Transaction> {
        self.rows
            .iter()
            .filter(|row| row.doc_ref == doc_ref)
            .collect()
    }

    /// The ledger lines posted against an account
    pub fn account_transactions(&self, account_id: &AccountId) -> Vec<&Transaction> {
        self.rows
            .iter()
            .filter(|row| row.account_id == *account_id)
            .collect()
    }

    /// Deletes an account from the chart
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` while any transaction still references the
    /// account; archived accounts with history stay archived instead.
    pub fn delete_account(&mut self, id: &AccountId) -> Result<Account, AccountingError> {
        let code = self
            .chart
            .get(id)
            .map(|a| a.code.clone())
            .ok_or_else(|| AccountingError::AccountNotFound(id.to_string()))?;
        if self.rows.iter().any(|row| row.account_id == *id) {
            return Err(AccountingError::AccountInUse(code));
        }
        self.chart
            .remove(id)
            .ok_or(AccountingError::AccountNotFound(code))
    }

    /// Generates a trial balance over the current store
    pub fn trial_balance(&self) -> TrialBalance {
        let mut entries = Vec::new();
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;

        for account in self.chart.list_all() {
            let balance = self.account_balance(&account.id);
            if balance.is_zero() {
                continue;
            }

            let (debit, credit) = if account.account_type.is_debit_normal() {
                (balance.abs(), Decimal::ZERO)
            } else {
                (Decimal::ZERO, balance.abs())
            };

            total_debits += debit;
            total_credits += credit;
            entries.push(TrialBalanceEntry {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                debit,
                credit,
            });
        }

        TrialBalance {
            entries,
            total_debits,
            total_credits,
            is_balanced: total_debits == total_credits,
        }
    }
}

/// Trial balance report
#[derive(Debug)]
pub struct TrialBalance {
    /// Per-account rows, ordered by code
    pub entries: Vec<TrialBalanceEntry>,
    /// Total of the debit column
    pub total_debits: Decimal,
    /// Total of the credit column
    pub total_credits: Decimal,
    /// Whether the two columns match
    pub is_balanced: bool,
}

/// A single row in the trial balance
#[derive(Debug)]
pub struct TrialBalanceEntry {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub debit: Decimal,
    pub credit: Decimal,
}
