//! Invoices and their lifecycle
//!
//! An invoice is a proof of sale showing the items or services sold to a
//! client and the amount paid or due. Sending an invoice debits the amount
//! due (incl. tax) to Accounts Receivable and credits Sales Revenue plus one
//! Tax Payable row per distinct tax name; moving it back to draft removes
//! those rows again. All ledger writes go through the posting engine.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use core_kernel::{next_number, ClientId, InvoiceId};
use domain_accounting::account::codes;
use domain_accounting::tax::{tax_totals, Tax};
use domain_accounting::{DocumentRef, EntrySpec, Ledger, Outstanding, SourceDocument};

use crate::error::SalesError;
use crate::payment::PaymentReceived;

/// Derived invoice lifecycle states
///
/// Only the draft flag is persisted; every other state is computed from the
/// invoice's amounts and due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Generated but not sent to the client
    Draft,
    /// Sent to the client, nothing paid yet
    Sent,
    /// Some payment received, balance remains
    PartlyPaid,
    /// Nothing left to pay
    Paid,
    /// Full payment not made as of the due date
    Overdue,
}

/// A line on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Line identifier
    pub id: Uuid,
    /// Item or service sold
    pub item: String,
    /// Free-form description
    pub description: String,
    /// Quantity sold
    pub quantity: Decimal,
    /// Price per unit
    pub rate: Decimal,
    /// Taxes applied to this line
    pub taxes: Vec<Tax>,
}

impl InvoiceLine {
    /// Creates a new line
    pub fn new(item: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            item: item.into(),
            description: String::new(),
            quantity,
            rate,
            taxes: Vec::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Applies a tax to the line
    pub fn with_tax(mut self, tax: Tax) -> Self {
        self.taxes.push(tax);
        self
    }

    /// Line total before tax
    pub fn total_excl_tax(&self) -> Decimal {
        self.rate * self.quantity
    }

    /// Total tax charged on this line
    pub fn taxes_total(&self) -> Decimal {
        self.taxes
            .iter()
            .map(|tax| tax.amount_on(self.total_excl_tax()))
            .sum()
    }

    /// Line total including tax
    pub fn total_incl_tax(&self) -> Decimal {
        self.total_excl_tax() + self.taxes_total()
    }
}

/// An invoice issued to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Human-readable invoice number, e.g. `INV-000042`
    pub number: String,
    /// Client the invoice bills
    pub client_id: ClientId,
    /// The persisted half of the state machine
    is_draft: bool,
    /// Date the invoice was issued
    pub issued_date: NaiveDate,
    /// Payment due date
    pub due_date: Option<NaiveDate>,
    /// Notes shown to the client
    pub notes: String,
    /// Payment terms shown to the client
    pub terms: String,
    /// Archived invoices are excluded from outstanding rollups
    pub archived: bool,
    /// The invoice's lines
    lines: Vec<InvoiceLine>,
    /// When the invoice was created
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Prefix for invoice numbers
    pub const NUMBER_PREFIX: &'static str = "INV";

    /// Creates a draft invoice
    pub fn new(number: impl Into<String>, client_id: ClientId, issued_date: NaiveDate) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            number: number.into(),
            client_id,
            is_draft: true,
            issued_date,
            due_date: None,
            notes: String::new(),
            terms: String::new(),
            archived: false,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The invoice number following the highest issued so far
    pub fn next_number(last_number: Option<&str>) -> String {
        next_number(Self::NUMBER_PREFIX, last_number)
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the payment terms
    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = terms.into();
        self
    }

    /// Adds a line
    pub fn push_line(&mut self, line: InvoiceLine) {
        self.lines.push(line);
    }

    /// The invoice's lines, in document order
    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    /// Whether the draft flag is set
    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    /// Sum of line totals before tax
    pub fn total_excl_tax(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::total_excl_tax).sum()
    }

    /// Total tax across all lines
    pub fn taxes_total(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::taxes_total).sum()
    }

    /// Sum of line totals including tax
    pub fn total_incl_tax(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::total_incl_tax).sum()
    }

    /// Total paid across the invoice's payments
    pub fn amount_paid(&self, payments: &[PaymentReceived]) -> Decimal {
        payments
            .iter()
            .filter(|payment| payment.invoice_id == self.id)
            .map(|payment| payment.amount)
            .sum()
    }

    /// Amount still owed by the client
    pub fn amount_due(&self, payments: &[PaymentReceived]) -> Decimal {
        self.total_incl_tax() - self.amount_paid(payments)
    }

    /// Whether the due date has passed on a non-draft invoice
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.map_or(false, |due| today > due) && !self.is_draft
    }

    /// The derived status
    pub fn status(&self, payments: &[PaymentReceived], today: NaiveDate) -> InvoiceStatus {
        if self.amount_due(payments).is_zero() {
            InvoiceStatus::Paid
        } else if self.is_overdue(today) {
            InvoiceStatus::Overdue
        } else if self.amount_paid(payments) > Decimal::ZERO {
            InvoiceStatus::PartlyPaid
        } else if self.is_draft {
            InvoiceStatus::Draft
        } else {
            InvoiceStatus::Sent
        }
    }

    /// Tax totals grouped by tax name across all lines
    ///
    /// One aggregate per distinct name; the posting below writes one ledger
    /// row per entry here, never one per line-tax pair.
    pub fn each_tax_total(&self) -> BTreeMap<String, Decimal> {
        tax_totals(
            self.lines
                .iter()
                .map(|line| (line.total_excl_tax(), line.taxes.as_slice())),
        )
    }

    /// Marks the invoice as sent, writing its ledger rows
    ///
    /// Only legal from Draft. Nothing is persisted when posting fails.
    ///
    /// # Errors
    ///
    /// `MarkAsSentNotAllowed` outside Draft, or any posting failure.
    pub fn mark_as_sent(
        &mut self,
        ledger: &mut Ledger,
        payments: &[PaymentReceived],
        today: NaiveDate,
    ) -> Result<(), SalesError> {
        if self.status(payments, today) != InvoiceStatus::Draft {
            return Err(SalesError::MarkAsSentNotAllowed);
        }
        let entries = self.posting_entries();
        ledger.post(&*self, &entries)?;
        self.is_draft = false;
        info!(invoice = %self.number, "invoice marked as sent");
        Ok(())
    }

    /// Moves a sent invoice back to draft, deleting its ledger rows
    ///
    /// Only legal while the status is Sent: once a payment exists the
    /// payments must be removed first.
    ///
    /// # Errors
    ///
    /// `MoveToDraftNotAllowed` outside Sent.
    pub fn move_to_draft(
        &mut self,
        ledger: &mut Ledger,
        payments: &[PaymentReceived],
        today: NaiveDate,
    ) -> Result<(), SalesError> {
        if self.status(payments, today) != InvoiceStatus::Sent {
            return Err(SalesError::MoveToDraftNotAllowed);
        }
        self.is_draft = true;
        ledger.delete(self.document_ref());
        info!(invoice = %self.number, "invoice moved to draft");
        Ok(())
    }

    /// Re-posts the invoice's ledger rows after an edit
    ///
    /// Draft invoices have no rows to refresh; for sent invoices this is the
    /// same idempotent replace the engine applies everywhere.
    pub fn record(
        &self,
        ledger: &mut Ledger,
        payments: &[PaymentReceived],
        today: NaiveDate,
    ) -> Result<(), SalesError> {
        if self.status(payments, today) == InvoiceStatus::Draft {
            return Ok(());
        }
        let entries = self.posting_entries();
        ledger.post(self, &entries)?;
        Ok(())
    }

    /// Validates deletion and removes the invoice's ledger rows
    ///
    /// Only draft invoices may be deleted; the caller drops the invoice once
    /// this succeeds.
    ///
    /// # Errors
    ///
    /// `DeleteNotAllowed` outside Draft.
    pub fn delete(
        &self,
        ledger: &mut Ledger,
        payments: &[PaymentReceived],
        today: NaiveDate,
    ) -> Result<(), SalesError> {
        if self.status(payments, today) != InvoiceStatus::Draft {
            return Err(SalesError::DeleteNotAllowed);
        }
        ledger.delete(self.document_ref());
        Ok(())
    }

    /// First payment on a draft invoice opens it; flag flip only
    pub(crate) fn open_for_payment(&mut self) {
        self.is_draft = false;
    }

    fn posting_entries(&self) -> Vec<EntrySpec> {
        let mut entries = vec![
            EntrySpec::debit(codes::ACCOUNTS_RECEIVABLE, self.total_incl_tax()),
            EntrySpec::credit(codes::SALES_REVENUE, self.total_excl_tax()),
        ];
        for (name, amount) in self.each_tax_total() {
            entries.push(EntrySpec::credit(codes::TAX_PAYABLE, amount).named(name));
        }
        entries
    }
}

impl SourceDocument for Invoice {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::Invoice(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.issued_date
    }

    fn posting_name(&self) -> String {
        format!("Invoice: {}", self.number)
    }

    fn posting_note(&self) -> String {
        self.notes.clone()
    }
}

/// Outstanding amounts across a set of invoices
///
/// Archived invoices are skipped. Draft invoices collect into the `draft`
/// bucket and never into `total`; `overdue` is the past-due slice of `total`.
pub fn outstanding(
    invoices: &[Invoice],
    payments: &[PaymentReceived],
    today: NaiveDate,
) -> Outstanding {
    let mut totals = Outstanding::default();
    for invoice in invoices.iter().filter(|invoice| !invoice.archived) {
        totals.accumulate(
            invoice.is_draft(),
            invoice.is_overdue(today),
            invoice.amount_due(payments),
        );
    }
    totals
}
