//! Rebuilds a symmetric [`SchoolGraph`] from a document that may record each
//! edge from one side only, or from both sides with conflicts.
//!
//! # Responsibility
//! - Construct every entity first, then wire edges by ID lookup.
//! - Resolve course-side, student-side and instructor-side edges in that
//!   order.
//! - Shape relational rows into the same document form
//!   ([`store_sync::load_graph`]) and flatten a graph back into rows
//!   ([`store_sync::overwrite_store`]).
//!
//! # Invariants
//! - The returned graph has no [`SymmetryViolation`](crate::model::graph::SymmetryViolation).
//! - A course-side `instructor` wins over an instructor-side assignment
//!   that names the same course.
//! - Dangling references are dropped, never raised.
//! - For duplicate IDs the first record wins.

pub mod store_sync;

use crate::model::course::Course;
use crate::model::graph::SchoolGraph;
use crate::model::instructor::Instructor;
use crate::model::person::ValidationError;
use crate::model::student::Student;
use crate::model::EntityKind;
use crate::snapshot::document::SnapshotDocument;
use log::{debug, info, warn};
use std::collections::HashMap;

/// A reference to an ID that is not present in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub from_kind: EntityKind,
    pub from_id: String,
    pub to_kind: EntityKind,
    pub to_id: String,
}

/// Instructor-side assignment ignored because the course names another
/// instructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentConflict {
    pub course_id: String,
    pub course_instructor: String,
    pub ignored_instructor: String,
}

/// What the reconciler dropped while building the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub dangling_references: Vec<DanglingReference>,
    pub duplicate_records: Vec<(EntityKind, String)>,
    pub assignment_conflicts: Vec<AssignmentConflict>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty()
            && self.duplicate_records.is_empty()
            && self.assignment_conflicts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub graph: SchoolGraph,
    pub report: ReconcileReport,
}

/// Builds the graph and discards the report.
///
/// # Errors
/// - Returns [`ValidationError`] when an entity record has invalid scalar
///   fields.
pub fn reconcile(doc: &SnapshotDocument) -> Result<SchoolGraph, ValidationError> {
    reconcile_with_report(doc).map(|reconciliation| reconciliation.graph)
}

/// Builds the graph and reports every skipped reference.
pub fn reconcile_with_report(doc: &SnapshotDocument) -> Result<Reconciliation, ValidationError> {
    let mut report = ReconcileReport::default();

    let mut instructors = Vec::with_capacity(doc.instructors.len());
    let mut instructor_index: HashMap<&str, usize> = HashMap::new();
    let mut instructor_docs = Vec::with_capacity(doc.instructors.len());
    for record in &doc.instructors {
        let id = record.instructor_id.as_str();
        if instructor_index.contains_key(id) {
            report
                .duplicate_records
                .push((EntityKind::Instructor, id.to_string()));
            continue;
        }
        instructor_index.insert(id, instructors.len());
        instructors.push(Instructor::from_document(record)?);
        instructor_docs.push(record);
    }

    let mut students = Vec::with_capacity(doc.students.len());
    let mut student_index: HashMap<&str, usize> = HashMap::new();
    let mut student_docs = Vec::with_capacity(doc.students.len());
    for record in &doc.students {
        let id = record.student_id.as_str();
        if student_index.contains_key(id) {
            report
                .duplicate_records
                .push((EntityKind::Student, id.to_string()));
            continue;
        }
        student_index.insert(id, students.len());
        students.push(Student::from_document(record)?);
        student_docs.push(record);
    }

    let mut courses = Vec::with_capacity(doc.courses.len());
    let mut course_index: HashMap<&str, usize> = HashMap::new();
    let mut course_docs = Vec::with_capacity(doc.courses.len());
    for record in &doc.courses {
        let id = record.course_id.as_str();
        if course_index.contains_key(id) {
            report
                .duplicate_records
                .push((EntityKind::Course, id.to_string()));
            continue;
        }
        course_index.insert(id, courses.len());
        courses.push(Course::from_document(record)?);
        course_docs.push(record);
    }

    // Course side: declared instructor, then roster.
    for (ci, record) in course_docs.iter().enumerate() {
        if let Some(iid) = record.instructor.as_deref() {
            match instructor_index.get(iid) {
                Some(&ii) => {
                    instructors[ii].assign_course(&mut courses[ci]);
                }
                None => report.dangling_references.push(dangling(
                    EntityKind::Course,
                    &record.course_id,
                    EntityKind::Instructor,
                    iid,
                )),
            }
        }
        for sid in &record.enrolled_students {
            match student_index.get(sid.as_str()) {
                Some(&si) => link_enrollment(&mut students[si], &mut courses[ci]),
                None => report.dangling_references.push(dangling(
                    EntityKind::Course,
                    &record.course_id,
                    EntityKind::Student,
                    sid,
                )),
            }
        }
    }

    for (si, record) in student_docs.iter().enumerate() {
        for cid in &record.registered_courses {
            match course_index.get(cid.as_str()) {
                Some(&ci) => link_enrollment(&mut students[si], &mut courses[ci]),
                None => report.dangling_references.push(dangling(
                    EntityKind::Student,
                    &record.student_id,
                    EntityKind::Course,
                    cid,
                )),
            }
        }
    }

    for (ii, record) in instructor_docs.iter().enumerate() {
        for cid in &record.assigned_courses {
            let Some(&ci) = course_index.get(cid.as_str()) else {
                report.dangling_references.push(dangling(
                    EntityKind::Instructor,
                    &record.instructor_id,
                    EntityKind::Course,
                    cid,
                ));
                continue;
            };
            match courses[ci].instructor().map(str::to_string) {
                Some(current) if current != record.instructor_id => {
                    report.assignment_conflicts.push(AssignmentConflict {
                        course_id: cid.clone(),
                        course_instructor: current,
                        ignored_instructor: record.instructor_id.clone(),
                    });
                }
                _ => {
                    instructors[ii].assign_course(&mut courses[ci]);
                }
            }
        }
    }

    log_report(&report);
    let graph = SchoolGraph::from_parts(students, instructors, courses);
    debug_assert!(graph.symmetry_violations().is_empty());
    info!(
        "event=reconcile module=reconcile status=ok students={} instructors={} courses={} dangling={} duplicates={} conflicts={}",
        graph.students().len(),
        graph.instructors().len(),
        graph.courses().len(),
        report.dangling_references.len(),
        report.duplicate_records.len(),
        report.assignment_conflicts.len()
    );

    Ok(Reconciliation { graph, report })
}

fn link_enrollment(student: &mut Student, course: &mut Course) {
    student.register_course(course);
    course.add_student(student);
}

fn dangling(
    from_kind: EntityKind,
    from_id: &str,
    to_kind: EntityKind,
    to_id: &str,
) -> DanglingReference {
    DanglingReference {
        from_kind,
        from_id: from_id.to_string(),
        to_kind,
        to_id: to_id.to_string(),
    }
}

fn log_report(report: &ReconcileReport) {
    for (kind, id) in &report.duplicate_records {
        warn!("event=reconcile module=reconcile status=skip reason=duplicate_id kind={kind} id={id}");
    }
    for reference in &report.dangling_references {
        debug!(
            "event=reconcile module=reconcile status=skip reason=dangling from={}:{} to={}:{}",
            reference.from_kind, reference.from_id, reference.to_kind, reference.to_id
        );
    }
    for conflict in &report.assignment_conflicts {
        debug!(
            "event=reconcile module=reconcile status=skip reason=instructor_conflict course={} kept={} ignored={}",
            conflict.course_id, conflict.course_instructor, conflict.ignored_instructor
        );
    }
}
