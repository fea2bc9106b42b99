//! Accounting Domain - Chart of Accounts and Ledger Posting Engine
//!
//! This crate implements the double-entry core of the accounting system:
//! the chart of accounts, the posting engine that translates business
//! documents into balanced sets of ledger lines, and manual journal entries.
//!
//! # Double-Entry Accounting Principles
//!
//! - Debits increase asset/expense accounts and decrease liability, equity
//!   and income accounts
//! - Credits are the inverse
//! - A document's ledger lines are always written as one atomic replacement,
//!   keyed by a typed reference back to the source document
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_accounting::{codes, EntrySpec, Ledger};
//!
//! let mut ledger = Ledger::with_default_chart();
//!
//! // Record an invoice being sent
//! let entries = [
//!     EntrySpec::debit(codes::ACCOUNTS_RECEIVABLE, total_incl_tax),
//!     EntrySpec::credit(codes::SALES_REVENUE, total_excl_tax),
//! ];
//! ledger.post(&invoice, &entries)?;
//! ```

pub mod account;
pub mod aggregate;
pub mod chart;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod ports;
pub mod tax;
pub mod transaction;

pub use account::{codes, default_chart, Account, AccountSubType, AccountType, DefaultChart};
pub use aggregate::Outstanding;
pub use chart::{ChartOfAccounts, Siblings};
pub use error::AccountingError;
pub use journal::{JournalEntry, JournalEntryLine};
pub use ledger::{Ledger, TrialBalance, TrialBalanceEntry};
pub use ports::{StoreError, TransactionStore};
pub use tax::{tax_totals, Tax};
pub use transaction::{DocumentRef, EntrySpec, SourceDocument, Transaction, TransactionType};
