//! Routing and priority derivation, evaluated once at filing time.
//!
//! Both functions are pure: they look only at the chosen category tree nodes.
//! The result is frozen onto the complaint; later changes to the tree's bound
//! faculty do not re-route existing complaints.

use uuid::Uuid;

use crate::model::{Category, Priority, SubCategory};

/// Resolve the responsible faculty account for a new complaint.
///
/// Precedence: the subcategory's bound faculty, else the parent category's,
/// else unassigned.
pub fn resolve_assignee(subcategory: Option<&SubCategory>, category: &Category) -> Option<Uuid> {
    subcategory
        .and_then(|sub| sub.faculty)
        .or(category.faculty)
}

/// Derive the complaint's initial priority.
///
/// The subcategory's configured tier is copied verbatim; a category-only
/// filing falls back to `fallback` (Medium by default configuration).
pub fn derive_priority(subcategory: Option<&SubCategory>, fallback: Priority) -> Priority {
    subcategory.map(|sub| sub.priority).unwrap_or(fallback)
}
