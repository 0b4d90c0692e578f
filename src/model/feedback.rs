//! Post-resolution feedback, at most one per complaint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rating range accepted by [`Feedback`].
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub account: Uuid,
    pub rating: u8,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(complaint_id: Uuid, account: Uuid, rating: u8, comments: impl Into<String>) -> Self {
        Feedback {
            id: Uuid::new_v4(),
            complaint_id,
            account,
            rating,
            comments: comments.into(),
            created_at: Utc::now(),
        }
    }
}
