//! Core Kernel - Foundational types and utilities for the accounting system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money precision helpers and percentage rates backed by rust_decimal
//! - Strongly-typed identifiers for every document kind
//! - Sequential document numbering
//! - The core error taxonomy

pub mod error;
pub mod identifiers;
pub mod money;
pub mod numbering;

pub use error::CoreError;
pub use identifiers::{
    AccountId, AccountSubTypeId, BillId, ClientId, ExpenseId, InvoiceId, JournalEntryId,
    PaymentMadeId, PaymentReceivedId, TaxId, TransactionId, VendorId,
};
pub use money::{round_money, Rate, MONEY_DP};
pub use numbering::next_number;
