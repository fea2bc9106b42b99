//! Comprehensive tests for domain_accounting

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::ExpenseId;

use domain_accounting::account::codes;
use domain_accounting::journal::{JournalEntry, JournalEntryLine};
use domain_accounting::ledger::Ledger;
use domain_accounting::transaction::{
    DocumentRef, EntrySpec, SourceDocument, TransactionType,
};
use domain_accounting::AccountingError;

/// Minimal posting source standing in for a business document
struct TestDocument {
    doc_ref: DocumentRef,
    date: NaiveDate,
    name: String,
}

impl TestDocument {
    fn new(name: &str) -> Self {
        Self {
            doc_ref: DocumentRef::Expense(ExpenseId::new()),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            name: name.to_string(),
        }
    }
}

impl SourceDocument for TestDocument {
    fn document_ref(&self) -> DocumentRef {
        self.doc_ref
    }

    fn posting_date(&self) -> NaiveDate {
        self.date
    }

    fn posting_name(&self) -> String {
        self.name.clone()
    }

    fn posting_note(&self) -> String {
        String::new()
    }
}

// ============================================================================
// Posting Engine Tests
// ============================================================================

mod posting_tests {
    use super::*;

    #[test]
    fn test_post_writes_resolved_rows() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Office supplies");

        let entries = [
            EntrySpec::debit("6000", dec!(120.00)),
            EntrySpec::credit(codes::CASH_AND_BANK, dec!(-120.00)),
        ];
        ledger.post(&doc, &entries).unwrap();

        let rows = ledger.transactions_for(doc.document_ref());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Office supplies");
        assert_eq!(rows[0].date, doc.date);

        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().id;
        assert_eq!(rows[1].account_id, cash);
    }

    #[test]
    fn test_post_is_idempotent() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Repeated");
        let entries = [
            EntrySpec::debit("6000", dec!(75.50)),
            EntrySpec::credit(codes::CASH_AND_BANK, dec!(-75.50)),
        ];

        ledger.post(&doc, &entries).unwrap();
        ledger.post(&doc, &entries).unwrap();

        let rows = ledger.transactions_for(doc.document_ref());
        assert_eq!(rows.len(), 2);
        let sum: Decimal = rows.iter().map(|r| r.amount).sum();
        assert_eq!(sum, Decimal::ZERO);
    }

    #[test]
    fn test_repost_replaces_rather_than_appends() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Edited");

        ledger
            .post(&doc, &[EntrySpec::debit("6000", dec!(10))])
            .unwrap();
        ledger
            .post(
                &doc,
                &[
                    EntrySpec::debit("6001", dec!(40)),
                    EntrySpec::credit(codes::CASH_AND_BANK, dec!(-40)),
                ],
            )
            .unwrap();

        let rows = ledger.transactions_for(doc.document_ref());
        assert_eq!(rows.len(), 2);
        let old_account = ledger.chart().resolve_active("6000").unwrap().id;
        assert!(rows.iter().all(|r| r.account_id != old_account));
    }

    #[test]
    fn test_failed_post_keeps_previous_rows() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Atomic");

        ledger
            .post(&doc, &[EntrySpec::debit("6000", dec!(10))])
            .unwrap();

        // The second entry fails to resolve, so the first set must survive.
        let result = ledger.post(
            &doc,
            &[
                EntrySpec::debit("6001", dec!(99)),
                EntrySpec::credit("9999", dec!(-99)),
            ],
        );
        assert!(matches!(result, Err(AccountingError::AccountNotFound(_))));

        let rows = ledger.transactions_for(doc.document_ref());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec!(10));
    }

    #[test]
    fn test_post_against_archived_account_rejected() {
        let mut ledger = Ledger::with_default_chart();
        let id = ledger.chart().get_by_code("6001").unwrap().id;
        ledger.chart_mut().archive_account(&id).unwrap();

        let doc = TestDocument::new("Archived target");
        let result = ledger.post(&doc, &[EntrySpec::debit("6001", dec!(5))]);
        assert!(matches!(result, Err(AccountingError::AccountArchived(_))));
        assert!(ledger.transactions_for(doc.document_ref()).is_empty());
    }

    #[test]
    fn test_delete_removes_rows_and_tolerates_absence() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Deleted");

        // Deleting before anything is posted is not an error.
        ledger.delete(doc.document_ref());

        ledger
            .post(&doc, &[EntrySpec::debit("6000", dec!(10))])
            .unwrap();
        ledger.delete(doc.document_ref());
        assert!(ledger.transactions_for(doc.document_ref()).is_empty());
    }

    #[test]
    fn test_account_balance_is_raw_signed_sum() {
        let mut ledger = Ledger::with_default_chart();
        let first = TestDocument::new("First");
        let second = TestDocument::new("Second");

        ledger
            .post(&first, &[EntrySpec::debit("6000", dec!(100))])
            .unwrap();
        ledger
            .post(&second, &[EntrySpec::credit("6000", dec!(-40))])
            .unwrap();

        let account = ledger.chart().resolve_active("6000").unwrap().id;
        assert_eq!(ledger.account_balance(&account), dec!(60));
    }

    #[test]
    fn test_per_entry_name_override() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Invoice INV-000001");

        ledger
            .post(
                &doc,
                &[
                    EntrySpec::debit(codes::ACCOUNTS_RECEIVABLE, dec!(105)),
                    EntrySpec::credit(codes::TAX_PAYABLE, dec!(5)).named("VAT"),
                ],
            )
            .unwrap();

        let rows = ledger.transactions_for(doc.document_ref());
        assert_eq!(rows[0].name, "Invoice INV-000001");
        assert_eq!(rows[1].name, "VAT");
    }

    #[test]
    fn test_delete_account_guarded_while_referenced() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Guard");
        ledger
            .post(&doc, &[EntrySpec::debit("6000", dec!(10))])
            .unwrap();

        let account = ledger.chart().resolve_active("6000").unwrap().id;
        assert!(matches!(
            ledger.delete_account(&account),
            Err(AccountingError::AccountInUse(_))
        ));

        // Once the referencing rows are gone, deletion succeeds.
        ledger.delete(doc.document_ref());
        let removed = ledger.delete_account(&account).unwrap();
        assert_eq!(removed.code, "6000");
        assert!(ledger.chart().get(&account).is_none());
    }

    #[test]
    fn test_trial_balance_of_balanced_postings() {
        let mut ledger = Ledger::with_default_chart();
        let doc = TestDocument::new("Balanced");
        ledger
            .post(
                &doc,
                &[
                    EntrySpec::debit(codes::ACCOUNTS_RECEIVABLE, dec!(500)),
                    EntrySpec::credit(codes::SALES_REVENUE, dec!(500)),
                ],
            )
            .unwrap();

        let trial = ledger.trial_balance();
        assert_eq!(trial.entries.len(), 2);
        assert_eq!(trial.total_debits, dec!(500));
        assert_eq!(trial.total_credits, dec!(500));
        assert!(trial.is_balanced);
    }
}

// ============================================================================
// Journal Entry Tests
// ============================================================================

mod journal_tests {
    use super::*;

    fn entry_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_sign_convention_round_trip() {
        let ledger = Ledger::with_default_chart();
        let asset = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap();
        let liability = ledger.chart().resolve_active(codes::ACCOUNTS_PAYABLE).unwrap();
        let income = ledger.chart().resolve_active(codes::SALES_REVENUE).unwrap();

        let debit_asset =
            JournalEntryLine::new(asset, TransactionType::Debit, dec!(100)).unwrap();
        assert_eq!(debit_asset.amount(), dec!(100));

        let debit_liability =
            JournalEntryLine::new(liability, TransactionType::Debit, dec!(100)).unwrap();
        assert_eq!(debit_liability.amount(), dec!(-100));

        let credit_asset =
            JournalEntryLine::new(asset, TransactionType::Credit, dec!(100)).unwrap();
        assert_eq!(credit_asset.amount(), dec!(-100));

        let credit_income =
            JournalEntryLine::new(income, TransactionType::Credit, dec!(100)).unwrap();
        assert_eq!(credit_income.amount(), dec!(100));
    }

    #[test]
    fn test_negative_magnitude_rejected() {
        let ledger = Ledger::with_default_chart();
        let asset = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap();

        let result = JournalEntryLine::new(asset, TransactionType::Debit, dec!(-1));
        assert!(matches!(result, Err(AccountingError::InvalidAmount(_))));
    }

    #[test]
    fn test_unbalanced_entry_rejected_without_rows() {
        let mut ledger = Ledger::with_default_chart();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().clone();
        let sales = ledger.chart().resolve_active(codes::SALES_REVENUE).unwrap().clone();

        let mut entry = JournalEntry::new("Opening balance", entry_date());
        entry.push_line(JournalEntryLine::new(&cash, TransactionType::Debit, dec!(100)).unwrap());
        entry.push_line(JournalEntryLine::new(&sales, TransactionType::Credit, dec!(90)).unwrap());

        let result = entry.mark_as_published(&mut ledger);
        assert!(matches!(
            result,
            Err(AccountingError::Unbalanced { debits, credits })
                if debits == dec!(100) && credits == dec!(90)
        ));
        assert!(!entry.is_published());
        assert!(ledger.transactions_for(entry.document_ref()).is_empty());
    }

    #[test]
    fn test_single_line_entry_rejected() {
        let mut ledger = Ledger::with_default_chart();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().clone();

        let mut entry = JournalEntry::new("Lonely line", entry_date());
        entry.push_line(JournalEntryLine::new(&cash, TransactionType::Debit, dec!(10)).unwrap());

        assert!(matches!(
            entry.mark_as_published(&mut ledger),
            Err(AccountingError::NotEnoughLines)
        ));
    }

    #[test]
    fn test_publish_writes_signed_rows() {
        let mut ledger = Ledger::with_default_chart();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().clone();
        let equity = ledger.chart().resolve_active("3000").unwrap().clone();

        let mut entry = JournalEntry::new("Owner investment", entry_date())
            .with_note("Initial capital");
        entry.push_line(JournalEntryLine::new(&cash, TransactionType::Debit, dec!(5000)).unwrap());
        entry
            .push_line(JournalEntryLine::new(&equity, TransactionType::Credit, dec!(5000)).unwrap());

        entry.mark_as_published(&mut ledger).unwrap();
        assert!(entry.is_published());

        let rows = ledger.transactions_for(entry.document_ref());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name == "Journal Entry: Owner investment"));
        assert!(rows.iter().all(|r| r.note == "Initial capital"));
        // Both legs store +5000: debit on a debit-normal account and credit
        // on a credit-normal account keep their sign.
        assert!(rows.iter().all(|r| r.amount == dec!(5000)));

        assert_eq!(ledger.account_balance(&cash.id), dec!(5000));
        assert_eq!(ledger.account_balance(&equity.id), dec!(5000));
    }

    #[test]
    fn test_publish_is_one_way() {
        let mut ledger = Ledger::with_default_chart();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().clone();
        let equity = ledger.chart().resolve_active("3000").unwrap().clone();

        let mut entry = JournalEntry::new("Once only", entry_date());
        entry.push_line(JournalEntryLine::new(&cash, TransactionType::Debit, dec!(10)).unwrap());
        entry.push_line(JournalEntryLine::new(&equity, TransactionType::Credit, dec!(10)).unwrap());

        entry.mark_as_published(&mut ledger).unwrap();
        assert!(matches!(
            entry.mark_as_published(&mut ledger),
            Err(AccountingError::AlreadyPublished)
        ));
    }

    #[test]
    fn test_stored_sign_survives_line_edits() {
        // The sign is computed once at creation. Re-pointing the line at an
        // account of the opposite normal balance, or flipping its type, does
        // not recompute the stored amount. Documented source behavior.
        let ledger = Ledger::with_default_chart();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap();
        let payable = ledger.chart().resolve_active(codes::ACCOUNTS_PAYABLE).unwrap();

        let mut line = JournalEntryLine::new(cash, TransactionType::Debit, dec!(100)).unwrap();
        assert_eq!(line.amount(), dec!(100));

        line.set_account(payable);
        assert_eq!(line.amount(), dec!(100));
        assert_eq!(line.account_code(), payable.code);

        line.set_entry_type(TransactionType::Credit);
        assert_eq!(line.amount(), dec!(100));
    }

    #[test]
    fn test_balance_check_uses_magnitudes_not_stored_signs() {
        // A debit on a liability stores -100, but the balance check compares
        // the entered magnitudes, so debit 100 / credit 100 balances.
        let mut ledger = Ledger::with_default_chart();
        let payable = ledger.chart().resolve_active(codes::ACCOUNTS_PAYABLE).unwrap().clone();
        let cash = ledger.chart().resolve_active(codes::CASH_AND_BANK).unwrap().clone();

        let mut entry = JournalEntry::new("Settle payable", entry_date());
        entry
            .push_line(JournalEntryLine::new(&payable, TransactionType::Debit, dec!(100)).unwrap());
        entry.push_line(JournalEntryLine::new(&cash, TransactionType::Credit, dec!(100)).unwrap());

        assert_eq!(entry.total_debits(), dec!(100));
        assert_eq!(entry.total_credits(), dec!(100));
        entry.mark_as_published(&mut ledger).unwrap();

        let rows = ledger.transactions_for(entry.document_ref());
        assert!(rows.iter().all(|r| r.amount == dec!(-100)));
    }
}

// ============================================================================
// Posting Engine Property Tests
// ============================================================================

mod posting_proptests {
    use super::*;
    use proptest::prelude::*;

    fn entry_strategy() -> impl Strategy<Value = EntrySpec> {
        let codes = prop_oneof![
            Just("1000"),
            Just("1100"),
            Just("6000"),
            Just("6001"),
            Just("6002"),
        ];
        (codes, any::<bool>(), -1_000_000i64..1_000_000i64).prop_map(|(code, debit, minor)| {
            let amount = Decimal::new(minor, 2);
            if debit {
                EntrySpec::debit(code, amount)
            } else {
                EntrySpec::credit(code, amount)
            }
        })
    }

    proptest! {
        #[test]
        fn repost_is_idempotent(entries in prop::collection::vec(entry_strategy(), 0..12)) {
            let mut ledger = Ledger::with_default_chart();
            let doc = TestDocument::new("Property");

            ledger.post(&doc, &entries).unwrap();
            let first: Vec<(Decimal, TransactionType)> = ledger
                .transactions_for(doc.document_ref())
                .iter()
                .map(|r| (r.amount, r.entry_type))
                .collect();

            ledger.post(&doc, &entries).unwrap();
            let second: Vec<(Decimal, TransactionType)> = ledger
                .transactions_for(doc.document_ref())
                .iter()
                .map(|r| (r.amount, r.entry_type))
                .collect();

            prop_assert_eq!(first, second);
        }
    }
}
