//! Domain model: closed enumerations and persisted entities.
//!
//! Statuses and priorities are stored in their canonical string forms
//! (`PENDING`, `Low`, ...) so external consumers keyed on the persisted
//! values keep working. `Display` renders the human label used in
//! notification text; `FromStr` is the single place unrecognized values are
//! rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OmbudError;

pub mod account;
pub mod category;
pub mod complaint;
pub mod feedback;
pub mod history;
pub mod notification;

pub use account::Account;
pub use category::{Category, SubCategory};
pub use complaint::Complaint;
pub use feedback::Feedback;
pub use history::StatusTransition;
pub use notification::Notification;

/// Account role, assigned at registration.
///
/// A closed enum: there is no implicit "no profile means admin" state. Role
/// escalation to `Hod` or `Admin` is a privileged operation outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Hod,
    Admin,
}

impl Role {
    /// Persisted form, matching the registration choices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Hod => "hod",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Faculty => write!(f, "Faculty"),
            Role::Hod => write!(f, "HOD"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = OmbudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "hod" => Ok(Role::Hod),
            "admin" => Ok(Role::Admin),
            other => Err(OmbudError::Validation(format!("unknown role: {other}"))),
        }
    }
}

/// Complaint lifecycle status.
///
/// The four states here are authoritative; any other status literal appearing
/// in stored data is a defect and fails parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Processing,
    Resolved,
    Rejected,
}

impl Status {
    /// Persisted form (`PENDING`, `PROCESSING`, `RESOLVED`, `REJECTED`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Processing => "PROCESSING",
            Status::Resolved => "RESOLVED",
            Status::Rejected => "REJECTED",
        }
    }

    /// Resolved and Rejected are absorbing in the normal workflow; leaving
    /// them requires a privileged actor.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved | Status::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "Pending"),
            Status::Processing => write!(f, "Processing"),
            Status::Resolved => write!(f, "Resolved"),
            Status::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for Status {
    type Err = OmbudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Status::Pending),
            "PROCESSING" => Ok(Status::Processing),
            "RESOLVED" => Ok(Status::Resolved),
            "REJECTED" => Ok(Status::Rejected),
            other => Err(OmbudError::Validation(format!("unknown status: {other}"))),
        }
    }
}

/// Priority tier, configured per subcategory and copied onto the complaint at
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = OmbudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            other => Err(OmbudError::Validation(format!("unknown priority: {other}"))),
        }
    }
}
