//! Read-side rollups over documents
//!
//! Account balances live on the [`crate::Ledger`]; this module holds the
//! outstanding-amount buckets shared by the invoice and bill rollups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outstanding amounts across a document set
///
/// `draft` collects amounts due on draft documents and is excluded from
/// `total`; `overdue` is the past-due slice of `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outstanding {
    pub draft: Decimal,
    pub overdue: Decimal,
    pub total: Decimal,
}

impl Outstanding {
    /// Folds one document into the buckets
    pub fn accumulate(&mut self, is_draft: bool, is_overdue: bool, amount_due: Decimal) {
        if is_draft {
            self.draft += amount_due;
            return;
        }
        if is_overdue {
            self.overdue += amount_due;
        }
        self.total += amount_due;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_draft_excluded_from_total() {
        let mut outstanding = Outstanding::default();
        outstanding.accumulate(true, false, dec!(500));
        outstanding.accumulate(false, true, dec!(200));
        outstanding.accumulate(false, false, dec!(300));

        assert_eq!(outstanding.draft, dec!(500));
        assert_eq!(outstanding.overdue, dec!(200));
        assert_eq!(outstanding.total, dec!(500));
    }

    #[test]
    fn test_overdue_draft_counts_as_draft() {
        let mut outstanding = Outstanding::default();
        outstanding.accumulate(true, true, dec!(100));

        assert_eq!(outstanding.draft, dec!(100));
        assert_eq!(outstanding.overdue, Decimal::ZERO);
        assert_eq!(outstanding.total, Decimal::ZERO);
    }
}
