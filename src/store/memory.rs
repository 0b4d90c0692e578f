//! In-memory store.
//!
//! One mutex over the whole dataset. `apply` runs a full validation pass
//! before the first mutation, so a rejected changeset leaves the store
//! untouched and a poisoned half-write cannot occur. Good enough for tests,
//! demos, and as the reference semantics a SQL backend has to match.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::OmbudError;
use crate::model::{
    Account, Category, Complaint, Feedback, Notification, Role, StatusTransition, SubCategory,
};
use crate::store::{ChangeSet, Store};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    categories: HashMap<Uuid, Category>,
    subcategories: HashMap<Uuid, SubCategory>,
    complaints: HashMap<Uuid, Complaint>,
    /// complaint number -> complaint id; the uniqueness backstop.
    numbers: HashMap<String, Uuid>,
    transitions: Vec<StatusTransition>,
    notifications: Vec<Notification>,
    /// complaint id -> feedback; one-to-one.
    feedback: HashMap<Uuid, Feedback>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, OmbudError> {
        self.inner
            .lock()
            .map_err(|_| OmbudError::Conflict("store lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn insert_account(&self, account: Account) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;
        inner.accounts.insert(account.id, account);
        Ok(())
    }

    fn insert_category(&self, category: Category) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;
        inner.categories.insert(category.id, category);
        Ok(())
    }

    fn insert_subcategory(&self, subcategory: SubCategory) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;
        if !inner.categories.contains_key(&subcategory.category_id) {
            return Err(OmbudError::NotFound(format!(
                "category {} for subcategory {}",
                subcategory.category_id, subcategory.name
            )));
        }
        inner.subcategories.insert(subcategory.id, subcategory);
        Ok(())
    }

    fn delete_account(&self, id: Uuid) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;
        if inner.accounts.remove(&id).is_none() {
            return Err(OmbudError::NotFound(format!("account {id}")));
        }

        // Complaints filed by the account go with it, history and all.
        let filed: Vec<Uuid> = inner
            .complaints
            .values()
            .filter(|c| c.filer == id)
            .map(|c| c.id)
            .collect();
        for complaint_id in filed {
            if let Some(complaint) = inner.complaints.remove(&complaint_id) {
                inner.numbers.remove(&complaint.number);
            }
            inner.transitions.retain(|t| t.complaint_id != complaint_id);
            inner.feedback.remove(&complaint_id);
        }

        // Assignments fall back to unassigned; bindings are cleared.
        for complaint in inner.complaints.values_mut() {
            if complaint.assignee == Some(id) {
                complaint.assignee = None;
            }
        }
        for category in inner.categories.values_mut() {
            if category.faculty == Some(id) {
                category.faculty = None;
            }
        }
        for subcategory in inner.subcategories.values_mut() {
            if subcategory.faculty == Some(id) {
                subcategory.faculty = None;
            }
        }
        inner.notifications.retain(|n| n.account != id);
        Ok(())
    }

    fn delete_category(&self, id: Uuid) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;
        if inner.categories.remove(&id).is_none() {
            return Err(OmbudError::NotFound(format!("category {id}")));
        }
        inner.subcategories.retain(|_, sub| sub.category_id != id);

        let filed: Vec<Uuid> = inner
            .complaints
            .values()
            .filter(|c| c.category_id == id)
            .map(|c| c.id)
            .collect();
        for complaint_id in filed {
            if let Some(complaint) = inner.complaints.remove(&complaint_id) {
                inner.numbers.remove(&complaint.number);
            }
            inner.transitions.retain(|t| t.complaint_id != complaint_id);
            inner.feedback.remove(&complaint_id);
        }
        Ok(())
    }

    fn account(&self, id: Uuid) -> Result<Account, OmbudError> {
        let inner = self.lock()?;
        inner
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| OmbudError::NotFound(format!("account {id}")))
    }

    fn accounts_with_role(&self, role: Role) -> Result<Vec<Account>, OmbudError> {
        let inner = self.lock()?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    fn category(&self, id: Uuid) -> Result<Category, OmbudError> {
        let inner = self.lock()?;
        inner
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| OmbudError::NotFound(format!("category {id}")))
    }

    fn subcategory(&self, id: Uuid) -> Result<SubCategory, OmbudError> {
        let inner = self.lock()?;
        inner
            .subcategories
            .get(&id)
            .cloned()
            .ok_or_else(|| OmbudError::NotFound(format!("subcategory {id}")))
    }

    fn complaint(&self, id: Uuid) -> Result<Complaint, OmbudError> {
        let inner = self.lock()?;
        inner
            .complaints
            .get(&id)
            .cloned()
            .ok_or_else(|| OmbudError::NotFound(format!("complaint {id}")))
    }

    fn complaint_by_number(&self, number: &str) -> Result<Complaint, OmbudError> {
        let inner = self.lock()?;
        inner
            .numbers
            .get(number)
            .and_then(|id| inner.complaints.get(id))
            .cloned()
            .ok_or_else(|| OmbudError::NotFound(format!("complaint {number}")))
    }

    fn complaints(&self) -> Result<Vec<Complaint>, OmbudError> {
        let inner = self.lock()?;
        let mut complaints: Vec<Complaint> = inner.complaints.values().cloned().collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    fn complaint_numbers(&self) -> Result<Vec<String>, OmbudError> {
        let inner = self.lock()?;
        Ok(inner.numbers.keys().cloned().collect())
    }

    fn transitions(&self, complaint_id: Uuid) -> Result<Vec<StatusTransition>, OmbudError> {
        let inner = self.lock()?;
        let mut entries: Vec<StatusTransition> = inner
            .transitions
            .iter()
            .filter(|t| t.complaint_id == complaint_id)
            .cloned()
            .collect();
        // Insertion order is chronological; newest first for display.
        entries.reverse();
        Ok(entries)
    }

    fn notifications(&self, account: Uuid) -> Result<Vec<Notification>, OmbudError> {
        let inner = self.lock()?;
        let mut entries: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.account == account)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    fn feedback(&self, complaint_id: Uuid) -> Result<Option<Feedback>, OmbudError> {
        let inner = self.lock()?;
        Ok(inner.feedback.get(&complaint_id).cloned())
    }

    fn mark_notification_read(&self, account: Uuid, id: Uuid) -> Result<Notification, OmbudError> {
        let mut inner = self.lock()?;
        let entry = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| OmbudError::NotFound(format!("notification {id}")))?;
        if entry.account != account {
            return Err(OmbudError::Permission(
                "notification belongs to another account".to_string(),
            ));
        }
        entry.is_read = true;
        Ok(entry.clone())
    }

    fn apply(&self, change: ChangeSet) -> Result<(), OmbudError> {
        let mut inner = self.lock()?;

        // Validation pass: nothing below may mutate until every row checks out.
        if let Some(complaint) = &change.insert_complaint {
            if inner.numbers.contains_key(&complaint.number) {
                return Err(OmbudError::Conflict(format!(
                    "complaint number {} already exists",
                    complaint.number
                )));
            }
            if inner.complaints.contains_key(&complaint.id) {
                return Err(OmbudError::Conflict(format!(
                    "complaint {} already exists",
                    complaint.id
                )));
            }
            if !inner.accounts.contains_key(&complaint.filer) {
                return Err(OmbudError::NotFound(format!("account {}", complaint.filer)));
            }
            if !inner.categories.contains_key(&complaint.category_id) {
                return Err(OmbudError::NotFound(format!(
                    "category {}",
                    complaint.category_id
                )));
            }
        }
        if let Some(complaint) = &change.update_complaint {
            if !inner.complaints.contains_key(&complaint.id) {
                return Err(OmbudError::NotFound(format!("complaint {}", complaint.id)));
            }
        }
        let inserted_id = change.insert_complaint.as_ref().map(|c| c.id);
        for transition in &change.transitions {
            let known = inner.complaints.contains_key(&transition.complaint_id)
                || inserted_id == Some(transition.complaint_id);
            if !known {
                return Err(OmbudError::NotFound(format!(
                    "complaint {}",
                    transition.complaint_id
                )));
            }
        }
        for notification in &change.notifications {
            if !inner.accounts.contains_key(&notification.account) {
                return Err(OmbudError::NotFound(format!(
                    "account {}",
                    notification.account
                )));
            }
        }
        if let Some(feedback) = &change.insert_feedback {
            let known = inner.complaints.contains_key(&feedback.complaint_id)
                || inserted_id == Some(feedback.complaint_id);
            if !known {
                return Err(OmbudError::NotFound(format!(
                    "complaint {}",
                    feedback.complaint_id
                )));
            }
            if inner.feedback.contains_key(&feedback.complaint_id) {
                return Err(OmbudError::Conflict(format!(
                    "feedback for complaint {} already exists",
                    feedback.complaint_id
                )));
            }
        }

        // Mutation pass: infallible from here on.
        if let Some(complaint) = change.insert_complaint {
            inner.numbers.insert(complaint.number.clone(), complaint.id);
            inner.complaints.insert(complaint.id, complaint);
        }
        if let Some(complaint) = change.update_complaint {
            inner.complaints.insert(complaint.id, complaint);
        }
        inner.transitions.extend(change.transitions);
        inner.notifications.extend(change.notifications);
        if let Some(feedback) = change.insert_feedback {
            inner.feedback.insert(feedback.complaint_id, feedback);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use chrono::Utc;

    fn complaint(filer: Uuid, category_id: Uuid, number: &str) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            number: number.to_string(),
            filer,
            title: "t".to_string(),
            description: "d".to_string(),
            attachment: None,
            category_id,
            subcategory_id: None,
            priority: Some(Priority::Medium),
            status: Status::Pending,
            assignee: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    fn seeded() -> (MemoryStore, Account, Category) {
        let store = MemoryStore::new();
        let filer = Account::new("s1", "Student One", Role::Student);
        let category = Category::new("Hostel");
        store.insert_account(filer.clone()).unwrap();
        store.insert_category(category.clone()).unwrap();
        (store, filer, category)
    }

    #[test]
    fn test_duplicate_number_rejects_whole_changeset() {
        let (store, filer, category) = seeded();
        let first = complaint(filer.id, category.id, "CMP-20240301-0001");
        store
            .apply(ChangeSet::new().insert_complaint(first.clone()))
            .unwrap();

        let dup = complaint(filer.id, category.id, "CMP-20240301-0001");
        let dup_id = dup.id;
        let change = ChangeSet::new()
            .insert_complaint(dup)
            .record(StatusTransition::new(
                dup_id,
                filer.id,
                None,
                Status::Pending,
                "Complaint created",
            ))
            .notify(Notification::new(filer.id, "hello"));
        let err = store.apply(change).unwrap_err();
        assert!(matches!(err, OmbudError::Conflict(_)));

        // No partial rows: the transition and notification were rolled up
        // with the rejected insert.
        assert!(store.complaint(dup_id).is_err());
        assert!(store.transitions(dup_id).unwrap().is_empty());
        assert!(store.notifications(filer.id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_notification_recipient_rejects_whole_changeset() {
        let (store, filer, category) = seeded();
        let new = complaint(filer.id, category.id, "CMP-20240301-0001");
        let new_id = new.id;
        let change = ChangeSet::new()
            .insert_complaint(new)
            .notify(Notification::new(Uuid::new_v4(), "ghost"));
        assert!(store.apply(change).is_err());
        assert!(store.complaint(new_id).is_err());
    }

    #[test]
    fn test_duplicate_feedback_rejected_at_apply() {
        let (store, filer, category) = seeded();
        let c = complaint(filer.id, category.id, "CMP-20240301-0001");
        let cid = c.id;
        store.apply(ChangeSet::new().insert_complaint(c)).unwrap();
        store
            .apply(ChangeSet::new().insert_feedback(Feedback::new(cid, filer.id, 4, "ok")))
            .unwrap();
        let err = store
            .apply(ChangeSet::new().insert_feedback(Feedback::new(cid, filer.id, 5, "again")))
            .unwrap_err();
        assert!(matches!(err, OmbudError::Conflict(_)));
        assert_eq!(store.feedback(cid).unwrap().unwrap().rating, 4);
    }

    #[test]
    fn test_delete_account_clears_assignments_and_cascades_filings() {
        let (store, filer, category) = seeded();
        let faculty = Account::new("f1", "Fac One", Role::Faculty);
        store.insert_account(faculty.clone()).unwrap();

        let mut assigned = complaint(filer.id, category.id, "CMP-20240301-0001");
        assigned.assignee = Some(faculty.id);
        let assigned_id = assigned.id;
        store
            .apply(ChangeSet::new().insert_complaint(assigned))
            .unwrap();

        let filed_by_faculty = complaint(faculty.id, category.id, "CMP-20240301-0002");
        let filed_id = filed_by_faculty.id;
        store
            .apply(ChangeSet::new().insert_complaint(filed_by_faculty))
            .unwrap();

        store.delete_account(faculty.id).unwrap();

        // Assignment cleared, filing cascaded away.
        assert_eq!(store.complaint(assigned_id).unwrap().assignee, None);
        assert!(store.complaint(filed_id).is_err());
        assert!(store.complaint_by_number("CMP-20240301-0002").is_err());
    }

    #[test]
    fn test_delete_category_cascades_subcategories() {
        let (store, _filer, category) = seeded();
        let sub = SubCategory::new(category.id, "Room Maintenance", Priority::High);
        let sub_id = sub.id;
        store.insert_subcategory(sub).unwrap();

        store.delete_category(category.id).unwrap();
        assert!(store.subcategory(sub_id).is_err());
    }

    #[test]
    fn test_subcategory_requires_existing_parent() {
        let store = MemoryStore::new();
        let orphan = SubCategory::new(Uuid::new_v4(), "Orphan", Priority::Low);
        assert!(matches!(
            store.insert_subcategory(orphan).unwrap_err(),
            OmbudError::NotFound(_)
        ));
    }

    #[test]
    fn test_mark_read_is_owner_only() {
        let (store, filer, _category) = seeded();
        let other = Account::new("s2", "Student Two", Role::Student);
        store.insert_account(other.clone()).unwrap();

        let note = Notification::new(filer.id, "hello");
        let note_id = note.id;
        store.apply(ChangeSet::new().notify(note)).unwrap();

        assert!(matches!(
            store.mark_notification_read(other.id, note_id).unwrap_err(),
            OmbudError::Permission(_)
        ));
        let updated = store.mark_notification_read(filer.id, note_id).unwrap();
        assert!(updated.is_read);
    }
}
