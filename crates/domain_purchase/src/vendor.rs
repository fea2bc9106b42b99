//! Vendors billed from and paid to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::VendorId;

/// A vendor or supplier of the organisation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique identifier
    pub id: VendorId,
    /// Name shown on bills
    pub display_name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// When the vendor was created
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    /// Creates a new vendor
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: VendorId::new_v7(),
            display_name: display_name.into(),
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the contact phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
