//! Purchase Domain - Vendors, Bills, Expenses, and Payments Made
//!
//! A bill is a proof of purchase sent by a vendor showing the items or
//! services purchased and the amount owed. When a bill is opened, the amount
//! due is credited to Accounts Payable; payments made settle it. Expenses
//! record money spent directly from an asset account. All ledger writes go
//! through the posting engine in `domain_accounting`.

pub mod bill;
pub mod error;
pub mod expense;
pub mod payment;
pub mod vendor;

pub use bill::{outstanding, Bill, BillLine, BillStatus};
pub use error::PurchaseError;
pub use expense::Expense;
pub use payment::{delete_payment_made, record_payment_made, PaymentMade};
pub use vendor::Vendor;
