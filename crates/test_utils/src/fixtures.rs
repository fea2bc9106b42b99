//! Pre-built test fixtures
//!
//! Consistent, predictable data shared by the crate test suites.

use chrono::NaiveDate;
use domain_accounting::{Ledger, Tax};
use rust_decimal_macros::dec;

/// A ledger seeded with the default chart of accounts
pub fn seeded_ledger() -> Ledger {
    Ledger::with_default_chart()
}

/// Fixture for tax test data
pub struct TaxFixtures;

impl TaxFixtures {
    /// Standard 5% value-added tax
    pub fn vat() -> Tax {
        Tax::new("VAT", dec!(5))
    }

    /// Secondary 2% levy for multi-tax scenarios
    pub fn levy() -> Tax {
        Tax::new("Levy", dec!(2))
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// The reference "today" used by status and outstanding tests
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Standard posting date, before `today`
    pub fn posting_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// A due date already in the past relative to `today`
    pub fn past_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    }

    /// A due date still in the future relative to `today`
    pub fn future_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }
}
