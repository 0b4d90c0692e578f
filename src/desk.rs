//! The complaint desk: every complaint-affecting operation goes through here.
//!
//! Each operation is one request-scoped unit of work: it reads reference
//! data, enforces the permission matrix, builds one [`ChangeSet`], and hands
//! it to the store atomically. Nothing here logs-and-continues on a failed
//! write; every failure propagates to the caller typed.

use chrono::Utc;
use uuid::Uuid;

use crate::config::DeskConfig;
use crate::error::OmbudError;
use crate::model::{
    Account, Complaint, Feedback, Notification, Priority, Role, Status, StatusTransition,
};
use crate::notify::{self, NotificationHub};
use crate::numbering::SequenceArena;
use crate::routing;
use crate::store::{ChangeSet, Store};

/// Input for filing a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub attachment: Option<String>,
}

/// Partial edit of a complaint's own fields (not status, not assignment).
#[derive(Debug, Clone, Default)]
pub struct DetailEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<String>,
}

/// The operations façade over a store.
pub struct Desk<S: Store> {
    store: S,
    sequences: SequenceArena,
    config: DeskConfig,
    hub: NotificationHub,
}

impl<S: Store> Desk<S> {
    /// Open a desk over `store` with default configuration, re-seeding the
    /// numbering arena from identifiers already issued.
    pub fn new(store: S) -> Result<Self, OmbudError> {
        Desk::with_config(store, DeskConfig::default())
    }

    pub fn with_config(store: S, config: DeskConfig) -> Result<Self, OmbudError> {
        let sequences = SequenceArena::new();
        let numbers = store.complaint_numbers()?;
        sequences.seed(numbers.iter().map(String::as_str))?;
        Ok(Desk {
            store,
            sequences,
            config,
            hub: NotificationHub::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// File a new complaint: routing, priority, numbering, creation audit
    /// entry, and creation notifications, persisted as one unit.
    pub fn file_complaint(
        &self,
        filer_id: Uuid,
        new: NewComplaint,
    ) -> Result<Complaint, OmbudError> {
        let filer = self.store.account(filer_id)?;
        if !matches!(filer.role, Role::Student | Role::Faculty) {
            return Err(OmbudError::Permission(
                "only students and faculty can file complaints".to_string(),
            ));
        }
        if new.title.trim().is_empty() {
            return Err(OmbudError::Validation("title is required".to_string()));
        }
        if new.description.trim().is_empty() {
            return Err(OmbudError::Validation("description is required".to_string()));
        }

        let category = self.store.category(new.category_id)?;
        let subcategory = match new.subcategory_id {
            Some(id) => Some(self.store.subcategory(id)?),
            None => None,
        };
        if let Some(sub) = &subcategory {
            if sub.category_id != category.id {
                return Err(OmbudError::Validation(format!(
                    "subcategory {} does not belong to category {}",
                    sub.name, category.name
                )));
            }
        }

        let assignee = routing::resolve_assignee(subcategory.as_ref(), &category);
        let priority = routing::derive_priority(subcategory.as_ref(), self.config.default_priority);

        let admins = self.store.accounts_with_role(Role::Admin)?;
        let assignee_account = match assignee {
            Some(id) => Some(self.store.account(id)?),
            None => None,
        };

        // Numbering is a reserve-then-insert pair: the arena serializes the
        // reservation, the store's uniqueness check backstops it. On a
        // conflict (another writer got there through a different desk over
        // the same store) the arena is re-seeded and the filing retried a
        // bounded number of times.
        let attempts = self.config.numbering_max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            // One clock sample per attempt: the identifier's date and
            // created_at must agree even when filing straddles midnight.
            let now = Utc::now();
            let number = self.sequences.next(now.date_naive())?;

            let complaint = Complaint {
                id: Uuid::new_v4(),
                number: number.clone(),
                filer: filer.id,
                title: new.title.trim().to_string(),
                description: new.description.clone(),
                attachment: new.attachment.clone(),
                category_id: category.id,
                subcategory_id: subcategory.as_ref().map(|s| s.id),
                priority: Some(priority),
                status: Status::Pending,
                assignee,
                created_at: now,
                resolved_at: None,
            };

            let mut notifications: Vec<Notification> =
                notify::complaint_created(&admins, &filer, &number);
            if filer.role == Role::Faculty {
                if let Some(account) = &assignee_account {
                    notifications.push(notify::assigned_on_creation(account, &filer, &number));
                }
            }

            let change = ChangeSet::new()
                .insert_complaint(complaint.clone())
                .record(StatusTransition::new(
                    complaint.id,
                    filer.id,
                    None,
                    Status::Pending,
                    "Complaint created",
                ))
                .notify_all(notifications.iter().cloned());

            match self.store.apply(change) {
                Ok(()) => {
                    log::info!(
                        "complaint {} filed by {} (priority {priority}, assignee {:?})",
                        complaint.number,
                        filer.username,
                        complaint.assignee
                    );
                    self.hub.publish(&notifications);
                    return Ok(complaint);
                }
                Err(err) if err.is_retryable() && attempt < attempts => {
                    log::warn!("numbering conflict on {number}, re-seeding and retrying");
                    let numbers = self.store.complaint_numbers()?;
                    self.sequences.seed(numbers.iter().map(String::as_str))?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Move a complaint to a new status, recording the audit entry and the
    /// filer notification atomically.
    ///
    /// A call with the current status is a no-op: no audit row, no
    /// notification.
    pub fn transition_status(
        &self,
        complaint_id: Uuid,
        actor_id: Uuid,
        new_status: Status,
        remarks: Option<&str>,
    ) -> Result<Complaint, OmbudError> {
        let complaint = self.store.complaint(complaint_id)?;
        let actor = self.store.account(actor_id)?;
        let filer = self.store.account(complaint.filer)?;

        if !may_transition(&actor, &complaint, &filer) {
            return Err(OmbudError::Permission(format!(
                "{} may not change the status of complaint {}",
                actor.username, complaint.number
            )));
        }

        let old_status = complaint.status;
        if old_status == new_status {
            log::debug!("complaint {} already {new_status}, nothing to do", complaint.number);
            return Ok(complaint);
        }

        let mut updated = complaint.clone();
        updated.status = new_status;
        if new_status == Status::Resolved && updated.resolved_at.is_none() {
            updated.resolved_at = Some(Utc::now());
        } else if old_status == Status::Resolved
            && new_status != Status::Resolved
            && !self.config.retain_resolved_at_on_reopen
        {
            updated.resolved_at = None;
        }

        let notification = notify::status_changed(filer.id, &updated.number, new_status);
        let change = ChangeSet::new()
            .update_complaint(updated.clone())
            .record(StatusTransition::new(
                updated.id,
                actor.id,
                Some(old_status),
                new_status,
                remarks.unwrap_or_default(),
            ))
            .notify(notification.clone());
        self.store.apply(change)?;

        log::info!(
            "complaint {} moved {old_status} -> {new_status} by {}",
            updated.number,
            actor.username
        );
        self.hub.publish(std::slice::from_ref(&notification));
        Ok(updated)
    }

    /// Hand a complaint to a different faculty member.
    ///
    /// A complaint filed by a faculty account is never reassigned, whoever
    /// asks. Otherwise only HOD and admin may reassign, and only to a faculty
    /// account. The audit entry carries the old and new assignee in its
    /// remarks; the status does not change.
    pub fn reassign(
        &self,
        complaint_id: Uuid,
        actor_id: Uuid,
        new_assignee_id: Uuid,
        remarks: Option<&str>,
    ) -> Result<Complaint, OmbudError> {
        let complaint = self.store.complaint(complaint_id)?;
        let actor = self.store.account(actor_id)?;
        let filer = self.store.account(complaint.filer)?;

        // Absolute rule, checked before the actor gate: not even an admin
        // may reassign a faculty-filed complaint.
        if filer.role == Role::Faculty {
            return Err(OmbudError::Permission(
                "faculty complaints cannot be reassigned".to_string(),
            ));
        }
        if !matches!(actor.role, Role::Hod | Role::Admin) {
            return Err(OmbudError::Permission(
                "only HOD or admin may reassign complaints".to_string(),
            ));
        }

        let new_assignee = self.store.account(new_assignee_id)?;
        if new_assignee.role != Role::Faculty {
            return Err(OmbudError::Validation(format!(
                "{} is not a faculty account",
                new_assignee.username
            )));
        }

        let old_name = match complaint.assignee {
            Some(id) => self.store.account(id)?.display_name().to_string(),
            None => "unassigned".to_string(),
        };
        let mut updated = complaint.clone();
        updated.assignee = Some(new_assignee.id);

        let mut detail = format!(
            "Reassigned from {} to {}.",
            old_name,
            new_assignee.display_name()
        );
        if let Some(extra) = remarks {
            if !extra.trim().is_empty() {
                detail.push(' ');
                detail.push_str(extra.trim());
            }
        }

        let notification = notify::reassigned(new_assignee.id, &updated.number);
        let change = ChangeSet::new()
            .update_complaint(updated.clone())
            .record(StatusTransition::new(
                updated.id,
                actor.id,
                Some(updated.status),
                updated.status,
                detail,
            ))
            .notify(notification.clone());
        self.store.apply(change)?;

        log::info!(
            "complaint {} reassigned to {} by {}",
            updated.number,
            new_assignee.username,
            actor.username
        );
        self.hub.publish(std::slice::from_ref(&notification));
        Ok(updated)
    }

    /// Record the filer's post-resolution feedback, at most once.
    pub fn submit_feedback(
        &self,
        complaint_id: Uuid,
        actor_id: Uuid,
        rating: u8,
        comments: &str,
    ) -> Result<Feedback, OmbudError> {
        let complaint = self.store.complaint(complaint_id)?;
        let actor = self.store.account(actor_id)?;

        if actor.id != complaint.filer {
            return Err(OmbudError::Permission(
                "only the filer may leave feedback".to_string(),
            ));
        }
        if complaint.status != Status::Resolved {
            return Err(OmbudError::Permission(
                "feedback is only accepted on resolved complaints".to_string(),
            ));
        }
        if !(crate::model::feedback::RATING_MIN..=crate::model::feedback::RATING_MAX)
            .contains(&rating)
        {
            return Err(OmbudError::Validation(format!(
                "rating must be between {} and {}",
                crate::model::feedback::RATING_MIN,
                crate::model::feedback::RATING_MAX
            )));
        }
        if self.store.feedback(complaint.id)?.is_some() {
            return Err(OmbudError::Permission(format!(
                "feedback already submitted for complaint {}",
                complaint.number
            )));
        }

        let feedback = Feedback::new(complaint.id, actor.id, rating, comments);
        self.store
            .apply(ChangeSet::new().insert_feedback(feedback.clone()))?;
        log::info!("feedback recorded for complaint {} ({rating}/5)", complaint.number);
        Ok(feedback)
    }

    /// Edit a complaint's own fields: title, description, attachment.
    ///
    /// The filer may edit only while the complaint is still Pending; the
    /// assignee and admin may edit at any time. No audit entry is written,
    /// status and assignment are untouched on this path.
    pub fn update_details(
        &self,
        complaint_id: Uuid,
        actor_id: Uuid,
        edit: DetailEdit,
    ) -> Result<Complaint, OmbudError> {
        let complaint = self.store.complaint(complaint_id)?;
        let actor = self.store.account(actor_id)?;

        let allowed = actor.role == Role::Admin
            || complaint.assignee == Some(actor.id)
            || (actor.id == complaint.filer && complaint.status == Status::Pending);
        if !allowed {
            return Err(OmbudError::Permission(format!(
                "{} may not edit complaint {}",
                actor.username, complaint.number
            )));
        }

        let mut updated = complaint;
        if let Some(title) = edit.title {
            if title.trim().is_empty() {
                return Err(OmbudError::Validation("title is required".to_string()));
            }
            updated.title = title.trim().to_string();
        }
        if let Some(description) = edit.description {
            if description.trim().is_empty() {
                return Err(OmbudError::Validation("description is required".to_string()));
            }
            updated.description = description;
        }
        if let Some(attachment) = edit.attachment {
            updated.attachment = Some(attachment);
        }

        self.store
            .apply(ChangeSet::new().update_complaint(updated.clone()))?;
        Ok(updated)
    }

    /// Manually override a complaint's priority.
    ///
    /// Priority is derived once at creation and only ever changed through
    /// this privileged path: admin, HOD, or the assigned faculty member.
    pub fn set_priority(
        &self,
        complaint_id: Uuid,
        actor_id: Uuid,
        priority: Priority,
    ) -> Result<Complaint, OmbudError> {
        let complaint = self.store.complaint(complaint_id)?;
        let actor = self.store.account(actor_id)?;

        let allowed = matches!(actor.role, Role::Admin | Role::Hod)
            || (actor.role == Role::Faculty && complaint.assignee == Some(actor.id));
        if !allowed {
            return Err(OmbudError::Permission(format!(
                "{} may not change the priority of complaint {}",
                actor.username, complaint.number
            )));
        }

        let mut updated = complaint;
        updated.priority = Some(priority);
        self.store
            .apply(ChangeSet::new().update_complaint(updated.clone()))?;
        log::info!("complaint {} priority set to {priority} by {}", updated.number, actor.username);
        Ok(updated)
    }

    /// Flip one of the account's notifications to read.
    pub fn mark_notification_read(
        &self,
        account_id: Uuid,
        notification_id: Uuid,
    ) -> Result<(), OmbudError> {
        self.store
            .mark_notification_read(account_id, notification_id)?;
        Ok(())
    }

    /// Unread inbox entries for the account's badge counter.
    pub fn unread_notification_count(&self, account_id: Uuid) -> Result<usize, OmbudError> {
        Ok(self
            .store
            .notifications(account_id)?
            .iter()
            .filter(|n| !n.is_read)
            .count())
    }

    /// Audit trail for a complaint, newest first.
    pub fn history(&self, complaint_id: Uuid) -> Result<Vec<StatusTransition>, OmbudError> {
        self.store.transitions(complaint_id)
    }
}

/// The status-change permission matrix.
///
/// Admin is unrestricted. The assignee may work complaints assigned to them.
/// HOD additionally oversees complaints filed by faculty accounts. The filer
/// as such never changes status.
fn may_transition(actor: &Account, complaint: &Complaint, filer: &Account) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Hod => complaint.assignee == Some(actor.id) || filer.role == Role::Faculty,
        Role::Faculty => complaint.assignee == Some(actor.id),
        Role::Student => false,
    }
}
