//! Read-side projections for dashboards and exports.
//!
//! Everything here is a pure projection over committed complaints: no
//! invariants of its own beyond reflecting store state. Dashboards consume
//! the JSON form; the CSV export feeds the downloadable reports.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::OmbudError;
use crate::model::{Account, Complaint, Role, Status};
use crate::store::Store;

/// Complaint counts by lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub resolved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn of(complaints: &[Complaint]) -> Self {
        let count = |status: Status| complaints.iter().filter(|c| c.status == status).count();
        StatusCounts {
            total: complaints.len(),
            pending: count(Status::Pending),
            processing: count(Status::Processing),
            resolved: count(Status::Resolved),
            rejected: count(Status::Rejected),
        }
    }
}

/// Aggregate dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DeskStats {
    pub counts: StatusCounts,
    /// Mean of `resolved_at - created_at` over resolved complaints in scope,
    /// in whole seconds. Absent when nothing is resolved yet.
    pub avg_resolution_seconds: Option<i64>,
    /// Filing counts keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, usize>,
}

/// The complaints `viewer` is allowed to see on their dashboard.
///
/// Admin sees everything; faculty see what is assigned to them or filed by
/// them; students see their own filings. HOD sees their own assignments and
/// filings plus every faculty-filed complaint — the same set the status
/// permission matrix lets them act on.
pub fn visible_complaints<S: Store>(
    store: &S,
    viewer: &Account,
) -> Result<Vec<Complaint>, OmbudError> {
    let all = store.complaints()?;
    let visible = match viewer.role {
        Role::Admin => all,
        Role::Hod => {
            let mut visible = Vec::new();
            for complaint in all {
                let oversees = complaint.assignee == Some(viewer.id)
                    || complaint.filer == viewer.id
                    || store.account(complaint.filer)?.role == Role::Faculty;
                if oversees {
                    visible.push(complaint);
                }
            }
            visible
        }
        Role::Faculty => all
            .into_iter()
            .filter(|c| c.assignee == Some(viewer.id) || c.filer == viewer.id)
            .collect(),
        Role::Student => all.into_iter().filter(|c| c.filer == viewer.id).collect(),
    };
    Ok(visible)
}

/// Complaints filed within `[from, to)`.
pub fn count_between(complaints: &[Complaint], from: DateTime<Utc>, to: DateTime<Utc>) -> usize {
    complaints
        .iter()
        .filter(|c| c.created_at >= from && c.created_at < to)
        .count()
}

/// Mean resolution time over the resolved complaints in scope.
pub fn average_resolution(complaints: &[Complaint]) -> Option<Duration> {
    let durations: Vec<Duration> = complaints
        .iter()
        .filter(|c| c.status == Status::Resolved)
        .filter_map(Complaint::resolution_time)
        .collect();
    if durations.is_empty() {
        return None;
    }
    let total: i64 = durations.iter().map(|d| d.num_seconds()).sum();
    Some(Duration::seconds(total / durations.len() as i64))
}

/// Filing counts keyed by calendar month (`YYYY-MM`).
pub fn monthly_counts(complaints: &[Complaint]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for complaint in complaints {
        let key = complaint.created_at.format("%Y-%m").to_string();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Build the full dashboard payload for a scope of complaints.
pub fn desk_stats(complaints: &[Complaint]) -> DeskStats {
    DeskStats {
        counts: StatusCounts::of(complaints),
        avg_resolution_seconds: average_resolution(complaints).map(|d| d.num_seconds()),
        by_month: monthly_counts(complaints),
    }
}

/// JSON form of [`desk_stats`], as the API layer serves it.
pub fn desk_stats_json(complaints: &[Complaint]) -> Result<serde_json::Value, OmbudError> {
    serde_json::to_value(desk_stats(complaints))
        .map_err(|e| OmbudError::Validation(format!("stats serialization failed: {e}")))
}

/// Write the scope of complaints as CSV, one row per complaint.
pub fn write_csv<W: Write>(complaints: &[Complaint], writer: W) -> Result<(), OmbudError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "number",
        "title",
        "status",
        "priority",
        "created_at",
        "resolved_at",
    ])?;
    for complaint in complaints {
        let created = complaint.created_at.to_rfc3339();
        let resolved = complaint
            .resolved_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        out.write_record([
            complaint.number.as_str(),
            complaint.title.as_str(),
            complaint.status.as_str(),
            complaint.priority.map(|p| p.as_str()).unwrap_or(""),
            created.as_str(),
            resolved.as_str(),
        ])?;
    }
    out.flush()
        .map_err(|e| OmbudError::Validation(format!("csv flush failed: {e}")))?;
    Ok(())
}
