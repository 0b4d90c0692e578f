//! The complaint ledger entry: the aggregate root of the desk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Priority, Status};

/// One filed complaint.
///
/// `number` is the human-readable reference (`CMP-YYYYMMDD-NNNN`), assigned
/// once at creation and never changed; external reports key on it.
/// `resolved_at` is stamped on the first transition into `Resolved`; whether
/// it survives a later re-open is a configuration policy, not hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub number: String,
    pub filer: Uuid,
    pub title: String,
    pub description: String,
    pub attachment: Option<String>,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub priority: Option<Priority>,
    pub status: Status,
    pub assignee: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Days elapsed since filing, for dashboard aging columns.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }

    /// Duration from filing to resolution, when resolved.
    pub fn resolution_time(&self) -> Option<chrono::Duration> {
        self.resolved_at.map(|at| at - self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            number: "CMP-20240115-0007".to_string(),
            filer: Uuid::new_v4(),
            title: "Broken window".to_string(),
            description: "Window latch broken in room 204".to_string(),
            attachment: None,
            category_id: Uuid::new_v4(),
            subcategory_id: None,
            priority: Some(Priority::High),
            status: Status::Pending,
            assignee: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn test_resolution_time_requires_resolved_at() {
        let mut complaint = sample();
        assert!(complaint.resolution_time().is_none());

        complaint.resolved_at = Some(complaint.created_at + Duration::hours(36));
        assert_eq!(
            complaint.resolution_time().unwrap(),
            Duration::hours(36)
        );
    }

    #[test]
    fn test_age_days() {
        let complaint = sample();
        let now = complaint.created_at + Duration::days(3) + Duration::hours(5);
        assert_eq!(complaint.age_days(now), 3);
    }
}
