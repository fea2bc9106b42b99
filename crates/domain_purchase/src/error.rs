//! Purchase domain errors

use core_kernel::CoreError;
use domain_accounting::AccountingError;
use thiserror::Error;

/// Errors that can occur in the purchase domain
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// Only draft bills can be opened
    #[error("This bill cannot be marked as open")]
    MarkAsOpenNotAllowed,

    /// Only open bills with no payments can go back to draft
    #[error("This bill cannot be moved to draft")]
    MoveToDraftNotAllowed,

    /// The payment references a different bill
    #[error("Payment does not belong to this bill")]
    PaymentMismatch,

    /// Posting-side failure
    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

/// Boundary classification for callers outside the domain
impl From<PurchaseError> for CoreError {
    fn from(error: PurchaseError) -> Self {
        match error {
            PurchaseError::MarkAsOpenNotAllowed | PurchaseError::MoveToDraftNotAllowed => {
                CoreError::invalid_state(error.to_string())
            }
            PurchaseError::PaymentMismatch => CoreError::validation(error.to_string()),
            PurchaseError::Accounting(inner) => inner.into(),
        }
    }
}
