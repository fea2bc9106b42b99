//! Taxes and per-tax-name aggregation

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Rate, TaxId};

/// A named tax rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Unique identifier
    pub id: TaxId,
    /// Tax name (unique), e.g. "VAT"
    pub name: String,
    /// Rate as a percentage, e.g. 5.00 for 5%
    pub rate: Decimal,
    /// Registration number printed on documents
    pub number: Option<String>,
}

impl Tax {
    /// Creates a new tax
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            id: TaxId::new_v7(),
            name: name.into(),
            rate,
            number: None,
        }
    }

    /// Sets the registration number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// The tax amount on a base amount, unrounded
    pub fn amount_on(&self, base: Decimal) -> Decimal {
        Rate::from_percentage(self.rate).apply(base)
    }
}

/// Aggregates tax amounts by tax name across document lines
///
/// Takes `(base amount excl. tax, taxes applied to that base)` pairs and
/// returns one total per distinct tax name. The ledger posts one row per
/// name, never one row per line-tax pair.
pub fn tax_totals<'a, I>(lines: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = (Decimal, &'a [Tax])>,
{
    let mut totals = BTreeMap::new();
    for (base, taxes) in lines {
        for tax in taxes {
            *totals.entry(tax.name.clone()).or_insert(Decimal::ZERO) += tax.amount_on(base);
        }
    }
    totals
}
