//! Repository implementations
//!
//! Data access for the accounting core, one repository per aggregate. The
//! queries are runtime-checked so the crate builds without a live database.

pub mod accounts;
pub mod ledger;

pub use accounts::AccountRepository;
pub use ledger::LedgerRepository;
