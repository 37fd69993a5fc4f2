//! Contact columns of the `users` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use keeper_core::types::contact::UserContact;

/// Contact details owned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// When the phone number was verified, if ever.
    pub phone_verified_at: Option<DateTime<Utc>>,
}

impl From<ContactRow> for UserContact {
    fn from(row: ContactRow) -> Self {
        Self {
            email: row.email,
            phone: row.phone_number,
            phone_verified: row.phone_verified_at.is_some(),
        }
    }
}
