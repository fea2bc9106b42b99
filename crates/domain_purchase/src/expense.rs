//! Expenses paid directly from an asset account
//!
//! An expense records money already spent: the expense account is debited
//! with the amount excl. tax, Tax Expense is debited once per distinct tax
//! name, and the paid-through account is credited with the full amount as a
//! negative row. Expenses post on creation and re-post on every edit through
//! the engine's idempotent replace.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{round_money, ExpenseId, Rate, VendorId};
use domain_accounting::account::codes;
use domain_accounting::tax::Tax;
use domain_accounting::{DocumentRef, EntrySpec, Ledger, SourceDocument};

use crate::error::PurchaseError;

/// Money spent from an asset account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Vendor the money went to, when known
    pub vendor_id: Option<VendorId>,
    /// Code of the expense account debited
    account_code: String,
    /// The entered amount; see `tax_inclusive` for its meaning
    pub amount: Decimal,
    /// Taxes applied to the expense
    taxes: Vec<Tax>,
    /// When true, `amount` already contains the taxes
    pub tax_inclusive: bool,
    /// Code of the asset account the expense was paid from
    paid_through_code: String,
    /// Date the expense was incurred
    pub date: NaiveDate,
    /// Free-form notes
    pub notes: String,
    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Creates a new tax-exclusive expense
    pub fn new(
        account_code: impl Into<String>,
        amount: Decimal,
        paid_through_code: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new_v7(),
            vendor_id: None,
            account_code: account_code.into(),
            amount,
            taxes: Vec::new(),
            tax_inclusive: false,
            paid_through_code: paid_through_code.into(),
            date,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the vendor
    pub fn with_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    /// Applies a tax to the expense
    pub fn with_tax(mut self, tax: Tax) -> Self {
        self.taxes.push(tax);
        self
    }

    /// Marks the entered amount as already containing the taxes
    pub fn tax_inclusive(mut self) -> Self {
        self.tax_inclusive = true;
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// The code of the expense account debited
    pub fn account_code(&self) -> &str {
        &self.account_code
    }

    /// The code of the account the expense was paid from
    pub fn paid_through_code(&self) -> &str {
        &self.paid_through_code
    }

    /// The taxes applied to the expense
    pub fn taxes(&self) -> &[Tax] {
        &self.taxes
    }

    /// The tax amount a single rate contributes, rounded to stored money
    pub fn tax_amount(&self, rate: Decimal) -> Decimal {
        if self.tax_inclusive {
            let tax_rate = Decimal::ONE + Rate::from_percentage(rate).as_decimal();
            round_money(self.amount - self.amount / tax_rate)
        } else {
            round_money(Rate::from_percentage(rate).apply(self.amount))
        }
    }

    /// Total tax on the expense
    pub fn taxes_total(&self) -> Decimal {
        self.taxes.iter().map(|tax| self.tax_amount(tax.rate)).sum()
    }

    /// The amount including taxes
    pub fn amount_incl_tax(&self) -> Decimal {
        if self.tax_inclusive {
            self.amount
        } else {
            self.amount + self.taxes_total()
        }
    }

    /// The amount excluding taxes
    pub fn amount_excl_tax(&self) -> Decimal {
        if self.tax_inclusive {
            self.amount - self.taxes_total()
        } else {
            self.amount
        }
    }

    /// Tax totals grouped by tax name
    pub fn each_tax_total(&self) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for tax in &self.taxes {
            *totals.entry(tax.name.clone()).or_insert(Decimal::ZERO) +=
                self.tax_amount(tax.rate);
        }
        totals
    }

    /// Writes or refreshes the expense's ledger rows
    ///
    /// Called on creation and after every edit; the engine replaces the
    /// previous rows wholesale.
    ///
    /// # Errors
    ///
    /// Any posting failure; the previous rows survive a failed replace.
    pub fn record(&self, ledger: &mut Ledger) -> Result<(), PurchaseError> {
        let mut entries = vec![EntrySpec::debit(
            self.account_code.as_str(),
            self.amount_excl_tax(),
        )];
        for (name, amount) in self.each_tax_total() {
            entries.push(EntrySpec::debit(codes::TAX_EXPENSE, amount).named(name));
        }
        entries.push(EntrySpec::credit(
            self.paid_through_code.as_str(),
            -self.amount_incl_tax(),
        ));

        ledger.post(self, &entries)?;
        Ok(())
    }

    /// Removes the expense's ledger rows ahead of deletion
    pub fn delete(&self, ledger: &mut Ledger) {
        ledger.delete(self.document_ref());
    }
}

impl SourceDocument for Expense {
    fn document_ref(&self) -> DocumentRef {
        DocumentRef::Expense(self.id)
    }

    fn posting_date(&self) -> NaiveDate {
        self.date
    }

    fn posting_name(&self) -> String {
        format!("Expense: {}", self.amount)
    }

    fn posting_note(&self) -> String {
        self.notes.clone()
    }
}
