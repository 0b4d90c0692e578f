//! # Ombud
//!
//! Complaint-tracking core for a campus grievance desk: auto-routing,
//! collision-free daily numbering, the status lifecycle with its audit
//! trail, notification fan-out, post-resolution feedback, and the report
//! projections dashboards are built on.
//!
//! The web views, REST handlers, and PDF generators sit above this crate and
//! call through [`Desk`]; storage sits below it behind the [`store::Store`]
//! trait.

pub mod config;
pub mod desk;
pub mod error;
pub mod model;
pub mod notify;
pub mod numbering;
pub mod report;
pub mod routing;
pub mod store;

pub use config::DeskConfig;
pub use desk::{Desk, DetailEdit, NewComplaint};
pub use error::OmbudError;
pub use model::{
    Account, Category, Complaint, Feedback, Notification, Priority, Role, Status,
    StatusTransition, SubCategory,
};
pub use store::{ChangeSet, MemoryStore, Store};
