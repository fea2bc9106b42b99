//! Payments made against bills
//!
//! A payment made settles part of a bill. Both legs are recorded as
//! credit-typed reversals with negative amounts: Accounts Payable shrinks
//! and Cash & Bank shrinks. Creating the first payment on a draft bill
//! implicitly opens it; only the draft flag flips.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, PaymentMadeId};
use domain_accounting::account::codes;
use domain_accounting::{DocumentRef, EntrySpec, Ledger, SourceDocument};

use crate::bill::Bill;
use crate::error::PurchaseError;

/// A payment made to a vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMade {
    /// Unique identifier
    pub id: PaymentMadeId,
    /// Bill the payment settles
    pub bill_id: BillId,
    /// Date the payment was made
    pub date: NaiveDate,
    /// Amount paid
    pub amount: Decimal,
    /// Payment mode, e.g. "cheque"
    pub mode: String,
    /// Free-form description
    pub description: String,
    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

impl PaymentMade {
    /// Creates a new payment against a bill
    pub fn new(bill_id: BillId, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: PaymentMadeId::new_v7(),
            bill_id,
            date,
            amount,
            mode: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the payment mode
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl SourceDocument for PaymentMade {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::PaymentMade(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.date
    }

    fn posting_name(&self) -> String {
        format!("Payment Made: {}", self.amount)
    }

    fn posting_note(&self) -> String {
        self.description.clone()
    }
}

/// Records a payment made, posting its ledger rows
///
/// Both legs are credit-typed with negative amounts, reversing the payable
/// and the bank balance. If the bill is still a draft, the payment opens it.
///
/// # Errors
///
/// `PaymentMismatch` when the payment references a different bill, or any
/// posting failure. A failed posting leaves the bill untouched.
pub fn record_payment_made(
    bill: &mut Bill,
    payment: &PaymentMade,
    ledger: &mut Ledger,
) -> Result<(), PurchaseError> {
    if payment.bill_id != bill.id {
        return Err(PurchaseError::PaymentMismatch);
    }

    ledger.post(
        payment,
        &[
            EntrySpec::credit(codes::ACCOUNTS_PAYABLE, -payment.amount),
            EntrySpec::credit(codes::CASH_AND_BANK, -payment.amount),
        ],
    )?;

    if bill.is_draft() {
        bill.open_for_payment();
    }
    Ok(())
}

/// Deletes a payment's ledger rows
///
/// Not an error when the payment was never recorded.
pub fn delete_payment_made(payment: &PaymentMade, ledger: &mut Ledger) {
    ledger.delete(payment.document_ref());
}
