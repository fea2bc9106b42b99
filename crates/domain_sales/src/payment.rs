//! Payments received against invoices
//!
//! A payment received moves money from Accounts Receivable into Cash & Bank.
//! Creating the first payment on a draft invoice implicitly opens it; only
//! the draft flag flips, the invoice's own rows are not posted by that side
//! effect.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, PaymentReceivedId};
use domain_accounting::account::codes;
use domain_accounting::{DocumentRef, EntrySpec, Ledger, SourceDocument};

use crate::error::SalesError;
use crate::invoice::Invoice;

/// A payment received from a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceived {
    /// Unique identifier
    pub id: PaymentReceivedId,
    /// Invoice the payment settles
    pub invoice_id: InvoiceId,
    /// Date the payment was received
    pub date: NaiveDate,
    /// Amount received
    pub amount: Decimal,
    /// Payment mode, e.g. "bank transfer"
    pub mode: String,
    /// Free-form description
    pub description: String,
    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

impl PaymentReceived {
    /// Creates a new payment against an invoice
    pub fn new(invoice_id: InvoiceId, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: PaymentReceivedId::new_v7(),
            invoice_id,
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

impl SourceDocument for PaymentReceived {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::PaymentReceived(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.date
    }

    fn posting_name(&self) -> String {
        format!("Payment Received: {}", self.amount)
    }

    fn posting_note(&self) -> String {
        self.description.clone()
    }
}

/// Records a payment received, posting its ledger rows
///
/// Debits Cash & Bank and credits Accounts Receivable by the payment amount.
/// If the invoice is still a draft, the payment opens it.
///
/// # Errors
///
/// `PaymentMismatch` when the payment references a different invoice, or any
/// posting failure. A failed posting leaves the invoice untouched.
pub fn record_payment_received(
    invoice: &mut Invoice,
    payment: &PaymentReceived,
    ledger: &mut Ledger,
) -> Result<(), SalesError> {
    if payment.invoice_id != invoice.id {
        return Err(SalesError::PaymentMismatch);
    }

    ledger.post(
        payment,
        &[
            EntrySpec::debit(codes::CASH_AND_BANK, payment.amount),
            EntrySpec::credit(codes::ACCOUNTS_RECEIVABLE, payment.amount),
        ],
    )?;

    if invoice.is_draft() {
        invoice.open_for_payment();
    }
    Ok(())
}

/// Deletes a payment's ledger rows
///
/// Not an error when the payment was never recorded.
pub fn delete_payment_received(payment: &PaymentReceived, ledger: &mut Ledger) {
    ledger.delete(payment.document_ref());
}
