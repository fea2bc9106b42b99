//! Bills and their lifecycle
//!
//! A bill is a proof of purchase sent by a vendor showing the items or
//! services purchased and the amount owed. Opening a bill credits the amount
//! due (incl. tax) to Accounts Payable and debits Tax Expense once per
//! distinct tax name; moving it back to draft removes those rows again.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use core_kernel::{next_number, BillId, VendorId};
use domain_accounting::account::codes;
use domain_accounting::tax::{tax_totals, Tax};
use domain_accounting::{DocumentRef, EntrySpec, Ledger, Outstanding, SourceDocument};

use crate::error::PurchaseError;
use crate::payment::PaymentMade;

/// Derived bill lifecycle states
///
/// Only the draft flag is persisted; every other state is computed from the
/// bill's amounts and due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Received but not yet recorded against the ledger
    Draft,
    /// Owed to the vendor, nothing paid yet
    Open,
    /// Some payment made, balance remains
    PartlyPaid,
    /// Nothing left to pay
    Paid,
    /// Full payment not made as of the due date
    Overdue,
}

/// A line on a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    /// Line identifier
    pub id: Uuid,
    /// Item or service purchased
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Quantity purchased
    pub quantity: Decimal,
    /// Price per unit
    pub rate: Decimal,
    /// Taxes applied to this line
    pub taxes: Vec<Tax>,
}

impl BillLine {
    /// Creates a new line
    pub fn new(name: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
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

/// A bill received from a vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,
    /// Human-readable bill number, e.g. `B-000042`
    pub number: String,
    /// Vendor the bill is owed to
    pub vendor_id: VendorId,
    /// The persisted half of the state machine
    is_draft: bool,
    /// Date on the bill
    pub bill_date: NaiveDate,
    /// Payment due date
    pub due_date: Option<NaiveDate>,
    /// Notes
    pub notes: String,
    /// Payment terms
    pub terms: String,
    /// Archived bills are excluded from outstanding rollups
    pub archived: bool,
    /// The bill's lines
    lines: Vec<BillLine>,
    /// When the bill was created
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Prefix for bill numbers
    pub const NUMBER_PREFIX: &'static str = "B";

    /// Creates a draft bill
    pub fn new(number: impl Into<String>, vendor_id: VendorId, bill_date: NaiveDate) -> Self {
        Self {
            id: BillId::new_v7(),
            number: number.into(),
            vendor_id,
            is_draft: true,
            bill_date,
            due_date: None,
            notes: String::new(),
            terms: String::new(),
            archived: false,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The bill number following the highest issued so far
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

    /// Adds a line
    pub fn push_line(&mut self, line: BillLine) {
        self.lines.push(line);
    }

    /// The bill's lines, in document order
    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    /// Whether the draft flag is set
    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    /// Sum of line totals before tax
    pub fn total_excl_tax(&self) -> Decimal {
        self.lines.iter().map(BillLine::total_excl_tax).sum()
    }

    /// Total tax across all lines
    pub fn taxes_total(&self) -> Decimal {
        self.lines.iter().map(BillLine::taxes_total).sum()
    }

    /// Sum of line totals including tax
    pub fn total_incl_tax(&self) -> Decimal {
        self.lines.iter().map(BillLine::total_incl_tax).sum()
    }

    /// Total paid across the bill's payments
    pub fn amount_paid(&self, payments: &[PaymentMade]) -> Decimal {
        payments
            .iter()
            .filter(|payment| payment.bill_id == self.id)
            .map(|payment| payment.amount)
            .sum()
    }

    /// Amount still owed to the vendor
    pub fn amount_due(&self, payments: &[PaymentMade]) -> Decimal {
        self.total_incl_tax() - self.amount_paid(payments)
    }

    /// Whether the due date has passed on a non-draft bill
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.map_or(false, |due| today > due) && !self.is_draft
    }

    /// The derived status
    pub fn status(&self, payments: &[PaymentMade], today: NaiveDate) -> BillStatus {
        if self.amount_due(payments).is_zero() {
            BillStatus::Paid
        } else if self.is_overdue(today) {
            BillStatus::Overdue
        } else if self.amount_paid(payments) > Decimal::ZERO {
            BillStatus::PartlyPaid
        } else if self.is_draft {
            BillStatus::Draft
        } else {
            BillStatus::Open
        }
    }

    /// Tax totals grouped by tax name across all lines
    pub fn each_tax_total(&self) -> BTreeMap<String, Decimal> {
        tax_totals(
            self.lines
                .iter()
                .map(|line| (line.total_excl_tax(), line.taxes.as_slice())),
        )
    }

    /// Marks the bill as open, writing its ledger rows
    ///
    /// Only legal from Draft. Nothing is persisted when posting fails.
    ///
    /// # Errors
    ///
    /// `MarkAsOpenNotAllowed` outside Draft, or any posting failure.
    pub fn mark_as_open(
        &mut self,
        ledger: &mut Ledger,
        payments: &[PaymentMade],
        today: NaiveDate,
    ) -> Result<(), PurchaseError> {
        if self.status(payments, today) != BillStatus::Draft {
            return Err(PurchaseError::MarkAsOpenNotAllowed);
        }
        let entries = self.posting_entries();
        ledger.post(&*self, &entries)?;
        self.is_draft = false;
        info!(bill = %self.number, "bill marked as open");
        Ok(())
    }

    /// Moves an open bill back to draft, deleting its ledger rows
    ///
    /// Only legal while the status is Open: once a payment exists the
    /// payments must be removed first.
    ///
    /// # Errors
    ///
    /// `MoveToDraftNotAllowed` outside Open.
    pub fn move_to_draft(
        &mut self,
        ledger: &mut Ledger,
        payments: &[PaymentMade],
        today: NaiveDate,
    ) -> Result<(), PurchaseError> {
        if self.status(payments, today) != BillStatus::Open {
            return Err(PurchaseError::MoveToDraftNotAllowed);
        }
        self.is_draft = true;
        ledger.delete(self.document_ref());
        info!(bill = %self.number, "bill moved to draft");
        Ok(())
    }

    /// Re-posts the bill's ledger rows after an edit
    pub fn record(
        &self,
        ledger: &mut Ledger,
        payments: &[PaymentMade],
        today: NaiveDate,
    ) -> Result<(), PurchaseError> {
        if self.status(payments, today) == BillStatus::Draft {
            return Ok(());
        }
        let entries = self.posting_entries();
        ledger.post(self, &entries)?;
        Ok(())
    }

    /// Removes the bill's ledger rows ahead of deletion
    ///
    /// Bills carry no draft-only guard; the caller drops the bill once this
    /// returns.
    pub fn delete(&self, ledger: &mut Ledger) {
        ledger.delete(self.document_ref());
    }

    /// First payment on a draft bill opens it; flag flip only
    pub(crate) fn open_for_payment(&mut self) {
        self.is_draft = false;
    }

    fn posting_entries(&self) -> Vec<EntrySpec> {
        let mut entries = vec![EntrySpec::credit(
            codes::ACCOUNTS_PAYABLE,
            self.total_incl_tax(),
        )];
        for (name, amount) in self.each_tax_total() {
            entries.push(EntrySpec::debit(codes::TAX_EXPENSE, amount).named(name));
        }
        entries
    }
}

impl SourceDocument for Bill {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::Bill(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.bill_date
    }

    fn posting_name(&self) -> String {
        format!("Bill: {}", self.number)
    }

    fn posting_note(&self) -> String {
        self.notes.clone()
    }
}

/// Outstanding amounts across a set of bills
///
/// Archived bills are skipped. Draft bills collect into the `draft` bucket
/// and never into `total`; `overdue` is the past-due slice of `total`.
pub fn outstanding(bills: &[Bill], payments: &[PaymentMade], today: NaiveDate) -> Outstanding {
    let mut totals = Outstanding::default();
    for bill in bills.iter().filter(|bill| !bill.archived) {
        totals.accumulate(
            bill.is_draft(),
            bill.is_overdue(today),
            bill.amount_due(payments),
        );
    }
    totals
}
