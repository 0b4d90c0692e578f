//! Two-level category taxonomy used for routing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Priority;

/// Top-level category. `faculty` is the default assignee for complaints filed
/// under this category when the subcategory carries no override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub faculty: Option<Uuid>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            faculty: None,
        }
    }

    pub fn with_faculty(name: impl Into<String>, faculty: Uuid) -> Self {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            faculty: Some(faculty),
        }
    }
}

/// Subcategory: always belongs to exactly one category. Carries the priority
/// tier complaints filed under it inherit, and optionally a faculty account
/// that overrides the parent category's assignee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub faculty: Option<Uuid>,
    pub priority: Priority,
}

impl SubCategory {
    pub fn new(category_id: Uuid, name: impl Into<String>, priority: Priority) -> Self {
        SubCategory {
            id: Uuid::new_v4(),
            category_id,
            name: name.into(),
            faculty: None,
            priority,
        }
    }

    pub fn with_faculty(mut self, faculty: Uuid) -> Self {
        self.faculty = Some(faculty);
        self
    }
}
