//! Inbox entries produced by the fan-out triggers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One inbox entry. Mutated only to flip `is_read`; the message text is
/// frozen at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub account: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(account: Uuid, message: impl Into<String>) -> Self {
        Notification {
            id: Uuid::new_v4(),
            account,
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
