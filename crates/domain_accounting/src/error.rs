//! Accounting domain errors

use core_kernel::CoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the accounting domain
///
/// Everything here is user-correctable and maps to a validation failure at
/// the boundary; none of these variants indicate a broken ledger.
#[derive(Debug, Error)]
pub enum AccountingError {
    /// No active account carries the given code
    #[error("Account {0} was not found or is archived")]
    AccountNotFound(String),

    /// The account exists but has been archived
    #[error("Account {0} is archived and cannot receive postings")]
    AccountArchived(String),

    /// More than one active account matched a code
    #[error("Multiple accounts found with code {0}")]
    MultipleAccounts(String),

    /// Account codes are unique per chart
    #[error("An account with code {0} already exists")]
    DuplicateCode(String),

    /// Sub type names are unique per chart
    #[error("An account sub type named {0} already exists")]
    DuplicateSubType(String),

    /// The referenced sub type is not part of the chart
    #[error("Account sub type {0} was not found")]
    SubTypeNotFound(String),

    /// System-reserved accounts cannot be edited
    #[error("Account {0} cannot be edited because it is used for automated transactions")]
    AccountLocked(String),

    /// The account still has ledger lines recorded against it
    #[error("Account {0} still has transactions recorded against it")]
    AccountInUse(String),

    /// Journal entry debits and credits do not match
    #[error("Journal entry not balanced: debits={debits}, credits={credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    /// A journal entry needs at least one debit and one credit line
    #[error("At least a debit and a credit line should be provided")]
    NotEnoughLines,

    /// Journal entries publish exactly once
    #[error("This journal entry has already been published")]
    AlreadyPublished,

    /// An entry amount failed a precondition
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Boundary classification for callers outside the domain
///
/// Every accounting failure is user-correctable, so all variants surface as
/// validation errors.
impl From<AccountingError> for CoreError {
    fn from(error: AccountingError) -> Self {
        CoreError::validation(error.to_string())
    }
}
