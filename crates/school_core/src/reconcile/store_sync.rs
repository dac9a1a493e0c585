//! Moves whole graphs between the relational store and memory.
//!
//! # Invariants
//! - `load_graph` runs store rows through the same reconciler as snapshot
//!   documents.
//! - `overwrite_store` clears and refills every table in one transaction:
//!   enrollments, courses, students, instructors are deleted in that order,
//!   then instructors, courses, students, enrollments are inserted.

use crate::model::graph::SchoolGraph;
use crate::model::person::PersonLike;
use crate::reconcile::reconcile;
use crate::repo::course_repo::{CourseRepository, CourseRow, SqliteCourseRepository};
use crate::repo::instructor_repo::{
    InstructorRepository, InstructorRow, SqliteInstructorRepository,
};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentRow};
use crate::repo::{RepoError, RepoResult};
use crate::snapshot::document::{
    CourseDocument, InstructorDocument, SnapshotDocument, StudentDocument,
};
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::time::Instant;

/// Shapes every table into a [`SnapshotDocument`] in canonical list order.
///
/// Courses carry `iid` and their roster; students carry their registered
/// course IDs. Instructor assignment lists stay empty since the course side
/// already records the edge.
pub fn store_document(conn: &Connection) -> RepoResult<SnapshotDocument> {
    let students = SqliteStudentRepository::new(conn);
    let instructors = SqliteInstructorRepository::new(conn);
    let courses = SqliteCourseRepository::new(conn);

    let mut rosters: HashMap<String, Vec<String>> = HashMap::new();
    let mut registrations: HashMap<String, Vec<String>> = HashMap::new();
    for enrollment in courses.list_enrollments()? {
        rosters
            .entry(enrollment.cid.clone())
            .or_default()
            .push(enrollment.sid.clone());
        registrations
            .entry(enrollment.sid)
            .or_default()
            .push(enrollment.cid);
    }

    let instructors = instructors
        .list_instructors()?
        .into_iter()
        .map(|row| InstructorDocument {
            name: row.name,
            age: row.age,
            email: row.email,
            instructor_id: row.iid,
            assigned_courses: Vec::new(),
        })
        .collect();

    let courses = courses
        .list_courses()?
        .into_iter()
        .map(|row| CourseDocument {
            enrolled_students: rosters.remove(&row.cid).unwrap_or_default(),
            course_id: row.cid,
            course_name: row.name,
            instructor: row.iid,
        })
        .collect();

    let students = students
        .list_students()?
        .into_iter()
        .map(|row| StudentDocument {
            registered_courses: registrations.remove(&row.sid).unwrap_or_default(),
            name: row.name,
            age: row.age,
            email: row.email,
            student_id: row.sid,
        })
        .collect();

    Ok(SnapshotDocument {
        students,
        instructors,
        courses,
    })
}

/// Loads the full graph from the store.
///
/// # Errors
/// - Returns [`RepoError::InvalidData`] when a stored row no longer passes
///   entity validation.
pub fn load_graph(conn: &Connection) -> RepoResult<SchoolGraph> {
    let doc = store_document(conn)?;
    reconcile(&doc).map_err(|err| RepoError::InvalidData(err.to_string()))
}

/// Replaces every row in the store with the contents of `graph`.
///
/// Runs in one transaction; on error the previous contents stay.
pub fn overwrite_store(conn: &Connection, graph: &SchoolGraph) -> RepoResult<()> {
    let started_at = Instant::now();
    let result = overwrite_in_transaction(conn, graph);

    match &result {
        Ok(()) => info!(
            "event=store_overwrite module=reconcile status=ok students={} instructors={} courses={} duration_ms={}",
            graph.students().len(),
            graph.instructors().len(),
            graph.courses().len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_overwrite module=reconcile status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn overwrite_in_transaction(conn: &Connection, graph: &SchoolGraph) -> RepoResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(
        "DELETE FROM enrollments;
         DELETE FROM courses;
         DELETE FROM students;
         DELETE FROM instructors;",
    )?;

    let instructors = SqliteInstructorRepository::new(&tx);
    for instructor in graph.instructors() {
        instructors.add_instructor(&InstructorRow::new(
            instructor.instructor_id(),
            instructor.name(),
            instructor.age(),
            instructor.email(),
        ))?;
    }

    let courses = SqliteCourseRepository::new(&tx);
    for course in graph.courses() {
        courses.add_course(&CourseRow::new(
            course.course_id(),
            course.course_name(),
            course.instructor().map(str::to_string),
        ))?;
    }

    let students = SqliteStudentRepository::new(&tx);
    for student in graph.students() {
        students.add_student(&StudentRow::new(
            student.student_id(),
            student.name(),
            student.age(),
            student.email(),
        ))?;
    }

    for course in graph.courses() {
        for sid in course.enrolled_students() {
            courses.register_student(sid, course.course_id())?;
        }
    }

    tx.commit()?;
    Ok(())
}
