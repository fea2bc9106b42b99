//! Comprehensive tests for domain_sales

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_accounting::account::codes;
use domain_accounting::{Ledger, SourceDocument, TransactionType};
use domain_sales::{
    delete_payment_received, outstanding, record_payment_received, Invoice, InvoiceLine,
    InvoiceStatus, PaymentReceived, SalesError,
};
use test_utils::{seeded_ledger, DateFixtures, InvoiceBuilder, TaxFixtures};

fn today() -> NaiveDate {
    DateFixtures::today()
}

fn setup() -> Ledger {
    test_utils::init_tracing();
    seeded_ledger()
}

// ============================================================================
// Invoice State Machine Tests
// ============================================================================

mod invoice_tests {
    use super::*;

    #[test]
    fn test_mark_as_sent_posts_receivable_revenue_and_tax_rows() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Design", dec!(1), dec!(1000)).with_tax(TaxFixtures::vat()))
            .build();

        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();
        assert!(!invoice.is_draft());

        let rows = ledger.transactions_for(invoice.document_ref());
        assert_eq!(rows.len(), 3);

        let receivable = ledger.chart().resolve_active(codes::ACCOUNTS_RECEIVABLE).unwrap().id;
        let revenue = ledger.chart().resolve_active(codes::SALES_REVENUE).unwrap().id;
        let debit = rows.iter().find(|r| r.account_id == receivable).unwrap();
        assert_eq!(debit.entry_type, TransactionType::Debit);
        assert_eq!(debit.amount, dec!(1050.00));
        assert_eq!(debit.name, format!("Invoice: {}", invoice.number));

        let credit = rows.iter().find(|r| r.account_id == revenue).unwrap();
        assert_eq!(credit.entry_type, TransactionType::Credit);
        assert_eq!(credit.amount, dec!(1000));
    }

    #[test]
    fn test_tax_aggregation_posts_one_row_per_tax_name() {
        // Three lines taxed "VAT" at 5% on 1000/2000/3000 collapse into a
        // single 300.00 credit, not three 50/100/150 rows.
        let mut ledger = setup();
        let mut builder = InvoiceBuilder::new();
        for base in [dec!(1000), dec!(2000), dec!(3000)] {
            builder = builder
                .with_line(InvoiceLine::new("Item", dec!(1), base).with_tax(TaxFixtures::vat()));
        }
        let mut invoice = builder.build();

        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        let tax_account = ledger.chart().resolve_active(codes::TAX_PAYABLE).unwrap().id;
        let rows = ledger.transactions_for(invoice.document_ref());
        let tax_rows: Vec<_> = rows.iter().filter(|r| r.account_id == tax_account).collect();
        assert_eq!(tax_rows.len(), 1);
        assert_eq!(tax_rows[0].amount, dec!(300.00));
        assert_eq!(tax_rows[0].name, "VAT");
        assert_eq!(tax_rows[0].entry_type, TransactionType::Credit);
    }

    #[test]
    fn test_mark_as_sent_requires_draft() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();

        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();
        let result = invoice.mark_as_sent(&mut ledger, &[], today());
        assert!(matches!(result, Err(SalesError::MarkAsSentNotAllowed)));
    }

    #[test]
    fn test_failed_send_leaves_invoice_in_draft() {
        // An empty chart cannot resolve the reserved codes, so the posting
        // fails and the draft flag must survive.
        let mut ledger = Ledger::default();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();

        let result = invoice.mark_as_sent(&mut ledger, &[], today());
        assert!(matches!(result, Err(SalesError::Accounting(_))));
        assert!(invoice.is_draft());
        assert!(ledger.transactions_for(invoice.document_ref()).is_empty());
    }

    #[test]
    fn test_move_to_draft_removes_rows() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(2), dec!(50)).with_tax(TaxFixtures::vat()))
            .build();

        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();
        assert!(!ledger.transactions_for(invoice.document_ref()).is_empty());

        invoice.move_to_draft(&mut ledger, &[], today()).unwrap();
        assert!(invoice.is_draft());
        assert!(ledger.transactions_for(invoice.document_ref()).is_empty());
    }

    #[test]
    fn test_move_to_draft_rejected_once_partly_paid() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        let payment = PaymentReceived::new(invoice.id, dec!(40), today());
        record_payment_received(&mut invoice, &payment, &mut ledger).unwrap();
        let payments = [payment];

        assert_eq!(invoice.status(&payments, today()), InvoiceStatus::PartlyPaid);
        let result = invoice.move_to_draft(&mut ledger, &payments, today());
        assert!(matches!(result, Err(SalesError::MoveToDraftNotAllowed)));
        assert!(!invoice.is_draft());

        // Removing the payment unblocks the transition.
        delete_payment_received(&payments[0], &mut ledger);
        invoice.move_to_draft(&mut ledger, &[], today()).unwrap();
        assert!(invoice.is_draft());
    }

    #[test]
    fn test_status_precedence() {
        let mut ledger = setup();
        let due = DateFixtures::past_due();
        let mut invoice = InvoiceBuilder::new()
            .with_due_date(due)
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();

        // Draft wins while the flag is set, even past the due date.
        assert_eq!(invoice.status(&[], today()), InvoiceStatus::Draft);

        invoice.mark_as_sent(&mut ledger, &[], due).unwrap();
        assert_eq!(invoice.status(&[], due), InvoiceStatus::Sent);

        // Past due and unpaid: overdue beats partly paid.
        let partial = PaymentReceived::new(invoice.id, dec!(40), today());
        record_payment_received(&mut invoice, &partial, &mut ledger).unwrap();
        assert_eq!(invoice.status(&[partial.clone()], today()), InvoiceStatus::Overdue);

        // Fully paid wins over everything.
        let rest = PaymentReceived::new(invoice.id, dec!(60), today());
        record_payment_received(&mut invoice, &rest, &mut ledger).unwrap();
        assert_eq!(invoice.status(&[partial, rest], today()), InvoiceStatus::Paid);
    }

    #[test]
    fn test_record_after_edit_replaces_rows() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        invoice.push_line(InvoiceLine::new("Extra", dec!(1), dec!(50)));
        invoice.record(&mut ledger, &[], today()).unwrap();

        let rows = ledger.transactions_for(invoice.document_ref());
        assert_eq!(rows.len(), 2);
        let receivable = ledger.chart().resolve_active(codes::ACCOUNTS_RECEIVABLE).unwrap().id;
        let debit = rows.iter().find(|r| r.account_id == receivable).unwrap();
        assert_eq!(debit.amount, dec!(150));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::PartlyPaid).unwrap(),
            "\"partly_paid\""
        );
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Overdue).unwrap(),
            "\"overdue\""
        );
    }

    #[test]
    fn test_record_on_draft_is_a_no_op() {
        let mut ledger = setup();
        let invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();

        invoice.record(&mut ledger, &[], today()).unwrap();
        assert!(ledger.transactions_for(invoice.document_ref()).is_empty());
    }

    #[test]
    fn test_delete_guard() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        // Sent invoices are protected.
        let result = invoice.delete(&mut ledger, &[], today());
        assert!(matches!(result, Err(SalesError::DeleteNotAllowed)));
        assert!(!ledger.transactions_for(invoice.document_ref()).is_empty());

        // Back in draft, deletion succeeds and cascades the rows.
        invoice.move_to_draft(&mut ledger, &[], today()).unwrap();
        invoice.delete(&mut ledger, &[], today()).unwrap();
        assert!(ledger.transactions_for(invoice.document_ref()).is_empty());
    }
}

// ============================================================================
// Payment Received Tests
// ============================================================================

mod payment_tests {
    use super::*;

    #[test]
    fn test_payment_posts_cash_and_receivable() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(500)))
            .build();
        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        let payment = PaymentReceived::new(invoice.id, dec!(500), today())
            .with_mode("bank transfer");
        record_payment_received(&mut invoice, &payment, &mut ledger).unwrap();

        let rows = ledger.transactions_for(payment.document_ref());
        assert_eq!(rows.len(), 2);

        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().id;
        let receivable = ledger.chart().resolve_active(codes::ACCOUNTS_RECEIVABLE).unwrap().id;
        let debit = rows.iter().find(|r| r.account_id == cash).unwrap();
        assert_eq!(debit.entry_type, TransactionType::Debit);
        assert_eq!(debit.amount, dec!(500));
        let credit = rows.iter().find(|r| r.account_id == receivable).unwrap();
        assert_eq!(credit.entry_type, TransactionType::Credit);
        assert_eq!(credit.amount, dec!(500));

        assert_eq!(invoice.status(&[payment], today()), InvoiceStatus::Paid);
    }

    #[test]
    fn test_first_payment_auto_opens_draft_invoice() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        assert!(invoice.is_draft());

        let payment = PaymentReceived::new(invoice.id, dec!(30), today());
        record_payment_received(&mut invoice, &payment, &mut ledger).unwrap();

        // Flag flip only: the invoice's own rows are not posted.
        assert!(!invoice.is_draft());
        assert!(ledger.transactions_for(invoice.document_ref()).is_empty());
        assert_eq!(ledger.transactions_for(payment.document_ref()).len(), 2);
    }

    #[test]
    fn test_payment_for_other_invoice_rejected() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        let other = InvoiceBuilder::new().build();

        let payment = PaymentReceived::new(other.id, dec!(10), today());
        let result = record_payment_received(&mut invoice, &payment, &mut ledger);
        assert!(matches!(result, Err(SalesError::PaymentMismatch)));
        assert!(invoice.is_draft());
        assert!(ledger.transactions_for(payment.document_ref()).is_empty());
    }

    #[test]
    fn test_delete_payment_removes_rows() {
        let mut ledger = setup();
        let mut invoice = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Item", dec!(1), dec!(100)))
            .build();
        invoice.mark_as_sent(&mut ledger, &[], today()).unwrap();

        let payment = PaymentReceived::new(invoice.id, dec!(100), today());
        record_payment_received(&mut invoice, &payment, &mut ledger).unwrap();
        delete_payment_received(&payment, &mut ledger);

        assert!(ledger.transactions_for(payment.document_ref()).is_empty());
        // Deleting again stays quiet.
        delete_payment_received(&payment, &mut ledger);
    }
}

// ============================================================================
// Outstanding Rollup Tests
// ============================================================================

mod outstanding_tests {
    use super::*;

    #[test]
    fn test_outstanding_buckets() {
        let mut ledger = setup();

        // Draft invoice owing 500.
        let draft = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Draft work", dec!(1), dec!(500)))
            .build();

        // Overdue invoice owing 200.
        let mut overdue = InvoiceBuilder::new()
            .with_due_date(DateFixtures::past_due())
            .with_line(InvoiceLine::new("Late work", dec!(1), dec!(200)))
            .build();
        overdue.mark_as_sent(&mut ledger, &[], DateFixtures::past_due()).unwrap();

        // Current invoice owing 300.
        let mut current = InvoiceBuilder::new()
            .with_due_date(DateFixtures::future_due())
            .with_line(InvoiceLine::new("Current work", dec!(1), dec!(300)))
            .build();
        current.mark_as_sent(&mut ledger, &[], today()).unwrap();

        let totals = outstanding(&[draft, overdue, current], &[], today());
        assert_eq!(totals.draft, dec!(500));
        assert_eq!(totals.overdue, dec!(200));
        assert_eq!(totals.total, dec!(500));
    }

    #[test]
    fn test_outstanding_skips_archived_and_counts_payments() {
        let mut ledger = setup();

        let mut archived = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Old work", dec!(1), dec!(900)))
            .build();
        archived.mark_as_sent(&mut ledger, &[], today()).unwrap();
        archived.archived = true;

        let mut open = InvoiceBuilder::new()
            .with_line(InvoiceLine::new("Work", dec!(1), dec!(100)))
            .build();
        open.mark_as_sent(&mut ledger, &[], today()).unwrap();
        let payment = PaymentReceived::new(open.id, dec!(25), today());
        record_payment_received(&mut open, &payment, &mut ledger).unwrap();

        let totals = outstanding(&[archived, open], &[payment], today());
        assert_eq!(totals.draft, Decimal::ZERO);
        assert_eq!(totals.total, dec!(75));
    }
}
