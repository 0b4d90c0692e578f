//! Role-scoped dashboard projections over live desk state.

mod common;

use ombud::report::{self, StatusCounts};
use ombud::{NewComplaint, Status};

fn filing(campus: &common::Campus) -> NewComplaint {
    NewComplaint {
        title: "Projector dead in LH-3".to_string(),
        description: "The projector has not powered on since Monday".to_string(),
        category_id: campus.category.id,
        subcategory_id: Some(campus.subcategory.id),
        attachment: None,
    }
}

#[test]
fn test_visibility_follows_roles() {
    let campus = common::campus();
    let desk = &campus.desk;

    // Two student filings (assigned to faculty), one faculty filing.
    desk.file_complaint(campus.student.id, filing(&campus)).unwrap();
    desk.file_complaint(campus.student.id, filing(&campus)).unwrap();
    desk.file_complaint(campus.other_faculty.id, filing(&campus)).unwrap();

    let admin_view = report::visible_complaints(desk.store(), &campus.admin).unwrap();
    assert_eq!(admin_view.len(), 3);

    let student_view = report::visible_complaints(desk.store(), &campus.student).unwrap();
    assert_eq!(student_view.len(), 2);
    assert!(student_view.iter().all(|c| c.filer == campus.student.id));

    // The assignee sees everything on their plate.
    let faculty_view = report::visible_complaints(desk.store(), &campus.faculty).unwrap();
    assert_eq!(faculty_view.len(), 3);

    // The faculty filer sees only their own filing (nothing assigned to them).
    let filer_view = report::visible_complaints(desk.store(), &campus.other_faculty).unwrap();
    assert_eq!(filer_view.len(), 1);

    // Nothing is assigned to or filed by the HOD, but they oversee the
    // faculty-filed complaint.
    let hod_view = report::visible_complaints(desk.store(), &campus.hod).unwrap();
    assert_eq!(hod_view.len(), 1);
    assert_eq!(hod_view[0].filer, campus.other_faculty.id);
}

#[test]
fn test_hod_scope_covers_every_complaint_they_may_act_on() {
    let campus = common::campus();
    let desk = &campus.desk;

    let faculty_filed = desk
        .file_complaint(campus.other_faculty.id, filing(&campus))
        .unwrap();
    // The permission matrix lets the HOD work this complaint...
    desk.transition_status(faculty_filed.id, campus.hod.id, Status::Processing, None)
        .unwrap();

    // ...so their dashboard scope must contain it too.
    let hod_view = report::visible_complaints(desk.store(), &campus.hod).unwrap();
    assert!(
        hod_view.iter().any(|c| c.id == faculty_filed.id),
        "complaint {} is actionable by the HOD but missing from their scope",
        faculty_filed.number
    );
}

#[test]
fn test_stats_reflect_the_lifecycle() {
    let campus = common::campus();
    let desk = &campus.desk;

    let a = desk.file_complaint(campus.student.id, filing(&campus)).unwrap();
    let b = desk.file_complaint(campus.student.id, filing(&campus)).unwrap();
    desk.file_complaint(campus.student.id, filing(&campus)).unwrap();

    desk.transition_status(a.id, campus.faculty.id, Status::Processing, None)
        .unwrap();
    desk.transition_status(b.id, campus.faculty.id, Status::Resolved, None)
        .unwrap();

    let scope = report::visible_complaints(desk.store(), &campus.admin).unwrap();
    assert_eq!(
        StatusCounts::of(&scope),
        StatusCounts {
            total: 3,
            pending: 1,
            processing: 1,
            resolved: 1,
            rejected: 0,
        }
    );

    let stats = report::desk_stats(&scope);
    // Resolution was sub-second in this test, so the mean rounds to zero.
    assert_eq!(stats.avg_resolution_seconds, Some(0));
    assert_eq!(stats.by_month.values().sum::<usize>(), 3);

    let mut csv = Vec::new();
    report::write_csv(&scope, &mut csv).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 4);
}
