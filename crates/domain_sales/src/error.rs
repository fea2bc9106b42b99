//! Sales domain errors

use core_kernel::CoreError;
use domain_accounting::AccountingError;
use thiserror::Error;

/// Errors that can occur in the sales domain
#[derive(Debug, Error)]
pub enum SalesError {
    /// Only draft invoices can be sent
    #[error("This invoice cannot be marked as sent")]
    MarkAsSentNotAllowed,

    /// Only sent invoices with no payments can go back to draft
    #[error("This invoice cannot be moved to draft")]
    MoveToDraftNotAllowed,

    /// Only draft invoices can be deleted
    #[error("Only draft invoices can be deleted")]
    DeleteNotAllowed,

    /// The payment references a different invoice
    #[error("Payment does not belong to this invoice")]
    PaymentMismatch,

    /// Posting-side failure
    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

/// Boundary classification for callers outside the domain
impl From<SalesError> for CoreError {
    fn from(error: SalesError) -> Self {
        match error {
            SalesError::MarkAsSentNotAllowed
            | SalesError::MoveToDraftNotAllowed
            | SalesError::DeleteNotAllowed => CoreError::invalid_state(error.to_string()),
            SalesError::PaymentMismatch => CoreError::validation(error.to_string()),
            SalesError::Accounting(inner) => inner.into(),
        }
    }
}
