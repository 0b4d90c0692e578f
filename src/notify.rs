//! Notification fan-out.
//!
//! Message builders for the defined triggers, plus a hub that batches the
//! inbox rows for a changeset and republishes committed rows over an optional
//! channel (the seam a web layer can attach live push to). There is no dedup
//! contract: firing a trigger twice produces two rows.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Mutex;

use crate::model::{Account, Notification, Status};

/// Trigger: complaint created. One row per admin account.
pub fn complaint_created(admins: &[Account], filer: &Account, number: &str) -> Vec<Notification> {
    admins
        .iter()
        .map(|admin| {
            Notification::new(
                admin.id,
                format!(
                    "New complaint {} created by {}",
                    number,
                    filer.display_name()
                ),
            )
        })
        .collect()
}

/// Trigger: complaint created by a faculty filer with a resolved assignee.
pub fn assigned_on_creation(assignee: &Account, filer: &Account, number: &str) -> Notification {
    Notification::new(
        assignee.id,
        format!(
            "New complaint {} created by faculty {} and assigned to you",
            number,
            filer.display_name()
        ),
    )
}

/// Trigger: status changed. Goes to the filer.
pub fn status_changed(filer_id: uuid::Uuid, number: &str, new_status: Status) -> Notification {
    Notification::new(
        filer_id,
        format!("Complaint {number} status changed to {new_status}"),
    )
}

/// Trigger: reassigned. Goes to the new assignee only.
pub fn reassigned(assignee_id: uuid::Uuid, number: &str) -> Notification {
    Notification::new(
        assignee_id,
        format!("You have been assigned complaint {number}"),
    )
}

/// Republishes committed notification rows to an attached listener.
///
/// The store is the durable inbox; the hub is best-effort: with no listener
/// attached, `publish` is a no-op, and a disconnected listener is dropped
/// silently.
#[derive(Debug, Default)]
pub struct NotificationHub {
    tx: Mutex<Option<Sender<Notification>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        NotificationHub::default()
    }

    /// Attach a listener. Replaces any previous one.
    pub fn attach(&self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        if let Ok(mut slot) = self.tx.lock() {
            *slot = Some(tx);
        }
        rx
    }

    /// Publish committed rows. Called only after the changeset is durable.
    pub fn publish(&self, notifications: &[Notification]) {
        let mut slot = match self.tx.lock() {
            Ok(slot) => slot,
            Err(_) => return,
        };
        let mut disconnected = false;
        if let Some(tx) = slot.as_ref() {
            for notification in notifications {
                if tx.send(notification.clone()).is_err() {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            *slot = None;
        }
    }
}
