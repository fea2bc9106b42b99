//! Test data builders
//!
//! Builder patterns for constructing documents with sensible defaults, so
//! tests specify only the fields they care about. Party names come from
//! `fake` to keep fixtures from all looking alike.

use chrono::NaiveDate;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClientId, VendorId};
use domain_accounting::Tax;
use domain_purchase::{Bill, BillLine, Expense, Vendor};
use domain_sales::{Client, Invoice, InvoiceLine};

use crate::fixtures::DateFixtures;

/// A client with generated contact details
pub fn sample_client() -> Client {
    Client::new(CompanyName().fake::<String>()).with_email(SafeEmail().fake::<String>())
}

/// A vendor with generated contact details
pub fn sample_vendor() -> Vendor {
    Vendor::new(CompanyName().fake::<String>()).with_email(SafeEmail().fake::<String>())
}

/// Builder for test invoices
pub struct InvoiceBuilder {
    number: String,
    client_id: ClientId,
    issued_date: NaiveDate,
    due_date: Option<NaiveDate>,
    lines: Vec<InvoiceLine>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            number: Invoice::next_number(None),
            client_id: ClientId::new(),
            issued_date: DateFixtures::posting_date(),
            due_date: None,
            lines: Vec::new(),
        }
    }

    /// Sets the invoice number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the client
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sets the issued date
    pub fn with_issued_date(mut self, date: NaiveDate) -> Self {
        self.issued_date = date;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Adds a line
    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Builds the draft invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(self.number, self.client_id, self.issued_date);
        if let Some(due) = self.due_date {
            invoice = invoice.with_due_date(due);
        }
        for line in self.lines {
            invoice.push_line(line);
        }
        invoice
    }
}

/// Builder for test bills
pub struct BillBuilder {
    number: String,
    vendor_id: VendorId,
    bill_date: NaiveDate,
    due_date: Option<NaiveDate>,
    lines: Vec<BillLine>,
}

impl Default for BillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            number: Bill::next_number(None),
            vendor_id: VendorId::new(),
            bill_date: DateFixtures::posting_date(),
            due_date: None,
            lines: Vec::new(),
        }
    }

    /// Sets the bill number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the vendor
    pub fn with_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Sets the bill date
    pub fn with_bill_date(mut self, date: NaiveDate) -> Self {
        self.bill_date = date;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Adds a line
    pub fn with_line(mut self, line: BillLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Builds the draft bill
    pub fn build(self) -> Bill {
        let mut bill = Bill::new(self.number, self.vendor_id, self.bill_date);
        if let Some(due) = self.due_date {
            bill = bill.with_due_date(due);
        }
        for line in self.lines {
            bill.push_line(line);
        }
        bill
    }
}

/// Builder for test expenses
pub struct ExpenseBuilder {
    account_code: String,
    amount: Decimal,
    paid_through_code: String,
    date: NaiveDate,
    taxes: Vec<Tax>,
    tax_inclusive: bool,
}

impl Default for ExpenseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBuilder {
    /// Creates a builder posting against General Expense, paid from Cash & Bank
    pub fn new() -> Self {
        Self {
            account_code: "6000".to_string(),
            amount: dec!(100),
            paid_through_code: "1000".to_string(),
            date: DateFixtures::posting_date(),
            taxes: Vec::new(),
            tax_inclusive: false,
        }
    }

    /// Sets the expense account code
    pub fn with_account(mut self, code: impl Into<String>) -> Self {
        self.account_code = code.into();
        self
    }

    /// Sets the entered amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the paid-through account code
    pub fn with_paid_through(mut self, code: impl Into<String>) -> Self {
        self.paid_through_code = code.into();
        self
    }

    /// Sets the expense date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Applies a tax
    pub fn with_tax(mut self, tax: Tax) -> Self {
        self.taxes.push(tax);
        self
    }

    /// Marks the amount as already containing the taxes
    pub fn tax_inclusive(mut self) -> Self {
        self.tax_inclusive = true;
        self
    }

    /// Builds the expense
    pub fn build(self) -> Expense {
        let mut expense = Expense::new(
            self.account_code,
            self.amount,
            self.paid_through_code,
            self.date,
        );
        for tax in self.taxes {
            expense = expense.with_tax(tax);
        }
        if self.tax_inclusive {
            expense = expense.tax_inclusive();
        }
        expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_builder_defaults() {
        let invoice = InvoiceBuilder::new().build();
        assert_eq!(invoice.number, "INV-000001");
        assert!(invoice.is_draft());
        assert!(invoice.lines().is_empty());
    }

    #[test]
    fn test_bill_builder_customization() {
        let vendor = sample_vendor();
        let bill = BillBuilder::new()
            .with_number("B-000007")
            .with_vendor(vendor.id)
            .with_due_date(DateFixtures::future_due())
            .build();

        assert_eq!(bill.number, "B-000007");
        assert_eq!(bill.vendor_id, vendor.id);
        assert_eq!(bill.due_date, Some(DateFixtures::future_due()));
    }

    #[test]
    fn test_sample_parties_have_names() {
        assert!(!sample_client().display_name.is_empty());
        assert!(!sample_vendor().display_name.is_empty());
    }
}
