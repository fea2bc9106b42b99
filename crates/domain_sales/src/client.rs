//! Clients billed through invoices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClientId;

/// A client of the organisation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: ClientId,
    /// Name shown on invoices
    pub display_name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// When the client was created
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Creates a new client
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new_v7(),
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
