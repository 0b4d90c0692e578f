//! Accounts: identity plus role directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Role;

/// An account known to the desk.
///
/// `category_tag` is only meaningful for faculty accounts: it marks the
/// category area the faculty member covers and is used by admin screens when
/// binding faculty to categories, never by the routing engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub category_tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Account {
            id: Uuid::new_v4(),
            username: username.into(),
            full_name: full_name.into(),
            role,
            department: None,
            phone: None,
            category_tag: None,
            created_at: Utc::now(),
        }
    }

    /// Name shown in notification text: the full name when set, otherwise the
    /// username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
