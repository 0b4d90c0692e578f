//! Immutable audit trail of status and assignment changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Status;

/// One audit entry. Created exactly once per status or assignment change and
/// never mutated or deleted afterwards.
///
/// `from_status` is `None` for the creation event. A reassignment without a
/// status change records `from_status == Some(to_status)` with the detail in
/// `remarks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransition {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub actor: Uuid,
    pub from_status: Option<Status>,
    pub to_status: Status,
    pub remarks: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusTransition {
    pub fn new(
        complaint_id: Uuid,
        actor: Uuid,
        from_status: Option<Status>,
        to_status: Status,
        remarks: impl Into<String>,
    ) -> Self {
        StatusTransition {
            id: Uuid::new_v4(),
            complaint_id,
            actor,
            from_status,
            to_status,
            remarks: remarks.into(),
            timestamp: Utc::now(),
        }
    }

    /// True for the entry recorded when the complaint was filed.
    pub fn is_creation(&self) -> bool {
        self.from_status.is_none()
    }

    /// True for a reassignment entry (assignment changed, status did not).
    pub fn is_reassignment(&self) -> bool {
        self.from_status == Some(self.to_status)
    }
}
