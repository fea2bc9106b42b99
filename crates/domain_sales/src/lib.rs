//! Sales Domain - Clients, Invoices, and Payments Received
//!
//! An invoice is a proof of sale showing the items or services sold to a
//! client and the amount paid or due. When an invoice is sent, its amount
//! due is posted to Accounts Receivable; payments received move money from
//! receivable to cash. All ledger writes go through the posting engine in
//! `domain_accounting`.

pub mod client;
pub mod error;
pub mod invoice;
pub mod payment;

pub use client::Client;
pub use error::SalesError;
pub use invoice::{outstanding, Invoice, InvoiceLine, InvoiceStatus};
pub use payment::{delete_payment_received, record_payment_received, PaymentReceived};
