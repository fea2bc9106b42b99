//! Money precision helpers and percentage rates
//!
//! Monetary amounts are plain `rust_decimal::Decimal` values stored with two
//! fractional digits. This module provides the single rounding rule used when
//! an amount is persisted, and the `Rate` type for percentage calculations
//! (tax rates, discounts) without floating-point errors.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept on stored monetary amounts
pub const MONEY_DP: u32 = 2;

/// Rounds an amount to the stored money precision
///
/// Uses banker's rounding (round half to even) so repeated ledger sums do
/// not drift in one direction.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Represents a percentage rate (e.g., a tax rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a base amount
    ///
    /// The result is not rounded; callers round once at the point where the
    /// amount is stored.
    pub fn apply(&self, base: Decimal) -> Decimal {
        base * self.value
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4))
    }
}
