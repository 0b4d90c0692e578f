//! Persistence seam for the desk.
//!
//! `Store` abstracts storage the way an executor trait abstracts a database
//! connection: the desk's operations are written against it, and any backend
//! (in-memory, SQL) can sit behind it. All multi-row writes go through a
//! single [`ChangeSet`] so a status change and its audit entry, or a new
//! complaint and its notifications, are durably recorded together or not at
//! all.

use uuid::Uuid;

use crate::error::OmbudError;
use crate::model::{
    Account, Category, Complaint, Feedback, Notification, Role, StatusTransition, SubCategory,
};

pub mod memory;

pub use memory::MemoryStore;

/// One atomic unit of work.
///
/// A changeset carries at most one complaint write (insert or update) plus
/// the audit and inbox rows that belong to the same logical change.
/// `Store::apply` validates the whole set before touching anything.
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub insert_complaint: Option<Complaint>,
    pub update_complaint: Option<Complaint>,
    pub transitions: Vec<StatusTransition>,
    pub notifications: Vec<Notification>,
    pub insert_feedback: Option<Feedback>,
}

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet::default()
    }

    pub fn insert_complaint(mut self, complaint: Complaint) -> Self {
        self.insert_complaint = Some(complaint);
        self
    }

    pub fn update_complaint(mut self, complaint: Complaint) -> Self {
        self.update_complaint = Some(complaint);
        self
    }

    pub fn record(mut self, transition: StatusTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn notify(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn notify_all<I: IntoIterator<Item = Notification>>(mut self, notifications: I) -> Self {
        self.notifications.extend(notifications);
        self
    }

    pub fn insert_feedback(mut self, feedback: Feedback) -> Self {
        self.insert_feedback = Some(feedback);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.insert_complaint.is_none()
            && self.update_complaint.is_none()
            && self.transitions.is_empty()
            && self.notifications.is_empty()
            && self.insert_feedback.is_none()
    }
}

/// Storage operations the desk depends on.
///
/// Reference data (accounts, the category tree) is read-mostly and written
/// through direct methods; complaint-affecting writes must go through
/// `apply`.
pub trait Store: Send + Sync {
    // Reference data
    fn insert_account(&self, account: Account) -> Result<(), OmbudError>;
    fn insert_category(&self, category: Category) -> Result<(), OmbudError>;
    fn insert_subcategory(&self, subcategory: SubCategory) -> Result<(), OmbudError>;
    /// Delete an account. Complaints it filed are removed with their history,
    /// feedback, and notifications; complaints it was assigned to fall back
    /// to unassigned; category bindings to it are cleared.
    fn delete_account(&self, id: Uuid) -> Result<(), OmbudError>;
    /// Delete a category and, cascade, its subcategories and complaints.
    fn delete_category(&self, id: Uuid) -> Result<(), OmbudError>;

    // Reads
    fn account(&self, id: Uuid) -> Result<Account, OmbudError>;
    fn accounts_with_role(&self, role: Role) -> Result<Vec<Account>, OmbudError>;
    fn category(&self, id: Uuid) -> Result<Category, OmbudError>;
    fn subcategory(&self, id: Uuid) -> Result<SubCategory, OmbudError>;
    fn complaint(&self, id: Uuid) -> Result<Complaint, OmbudError>;
    fn complaint_by_number(&self, number: &str) -> Result<Complaint, OmbudError>;
    fn complaints(&self) -> Result<Vec<Complaint>, OmbudError>;
    /// All issued complaint numbers, for re-seeding the sequence arena.
    fn complaint_numbers(&self) -> Result<Vec<String>, OmbudError>;
    /// Audit entries for a complaint, newest first.
    fn transitions(&self, complaint_id: Uuid) -> Result<Vec<StatusTransition>, OmbudError>;
    /// Inbox entries for an account, newest first.
    fn notifications(&self, account: Uuid) -> Result<Vec<Notification>, OmbudError>;
    fn feedback(&self, complaint_id: Uuid) -> Result<Option<Feedback>, OmbudError>;

    /// Flip one notification to read. Only the owner may do so.
    fn mark_notification_read(&self, account: Uuid, id: Uuid) -> Result<Notification, OmbudError>;

    /// Apply a changeset atomically: every row becomes visible, or none does.
    fn apply(&self, change: ChangeSet) -> Result<(), OmbudError>;
}
