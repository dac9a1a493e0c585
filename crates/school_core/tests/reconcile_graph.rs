use rusqlite::Connection;
use school_core::db::open_db_in_memory;
use school_core::reconcile::store_sync::{load_graph, overwrite_store, store_document};
use school_core::reconcile::{reconcile, reconcile_with_report};
use school_core::repo::course_repo::{CourseRepository, CourseRow, SqliteCourseRepository};
use school_core::repo::instructor_repo::{
    InstructorRepository, InstructorRow, SqliteInstructorRepository,
};
use school_core::repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentRow};
use school_core::snapshot::document::{
    CourseDocument, InstructorDocument, SnapshotDocument, StudentDocument,
};
use school_core::EntityKind;

fn scenario_store() -> Connection {
    let conn = open_db_in_memory().unwrap();
    SqliteInstructorRepository::new(&conn)
        .add_instructor(&InstructorRow::new("I1", "Dr. X", 50, "x@uni.edu"))
        .unwrap();
    let courses = SqliteCourseRepository::new(&conn);
    courses
        .add_course(&CourseRow::new("C1", "Algorithms", Some("I1".to_string())))
        .unwrap();
    SqliteStudentRepository::new(&conn)
        .add_student(&StudentRow::new("S1", "Alice", 20, "alice@uni.edu"))
        .unwrap();
    courses.register_student("S1", "C1").unwrap();
    conn
}

#[test]
fn loading_store_wires_both_directions() {
    let conn = scenario_store();
    let graph = load_graph(&conn).unwrap();

    assert_eq!(graph.student("S1").unwrap().registered_courses(), ["C1"]);
    assert_eq!(graph.course("C1").unwrap().enrolled_students(), ["S1"]);
    assert_eq!(graph.course("C1").unwrap().instructor(), Some("I1"));
    assert_eq!(graph.instructor("I1").unwrap().assigned_courses(), ["C1"]);
    assert!(graph.symmetry_violations().is_empty());
}

#[test]
fn deleting_instructor_then_reloading_keeps_course_and_roster() {
    let conn = scenario_store();
    SqliteInstructorRepository::new(&conn)
        .delete_instructor("I1")
        .unwrap();

    let graph = load_graph(&conn).unwrap();
    assert!(graph.instructor("I1").is_none());
    let course = graph.course("C1").unwrap();
    assert_eq!(course.instructor(), None);
    assert_eq!(course.enrolled_students(), ["S1"]);
}

#[test]
fn store_rows_are_shaped_like_a_snapshot() {
    let conn = scenario_store();
    let doc = store_document(&conn).unwrap();

    assert_eq!(doc.courses[0].instructor.as_deref(), Some("I1"));
    assert_eq!(doc.courses[0].enrolled_students, ["S1"]);
    assert_eq!(doc.students[0].registered_courses, ["C1"]);
    assert!(doc.instructors[0].assigned_courses.is_empty());
}

#[test]
fn one_sided_document_edges_become_symmetric() {
    let doc = SnapshotDocument {
        students: vec![StudentDocument {
            name: "Alice".to_string(),
            age: 20,
            email: "alice@uni.edu".to_string(),
            student_id: "S1".to_string(),
            registered_courses: vec!["C1".to_string()],
        }],
        instructors: vec![InstructorDocument {
            name: "Dr. X".to_string(),
            age: 50,
            email: "x@uni.edu".to_string(),
            instructor_id: "I1".to_string(),
            assigned_courses: vec!["C1".to_string()],
        }],
        courses: vec![CourseDocument {
            course_id: "C1".to_string(),
            course_name: "Algorithms".to_string(),
            instructor: None,
            enrolled_students: vec![],
        }],
    };

    let graph = reconcile(&doc).unwrap();
    assert_eq!(graph.course("C1").unwrap().enrolled_students(), ["S1"]);
    assert_eq!(graph.course("C1").unwrap().instructor(), Some("I1"));
    assert!(graph.symmetry_violations().is_empty());
}

#[test]
fn dangling_references_are_dropped() {
    let doc = SnapshotDocument {
        students: vec![StudentDocument {
            name: "Alice".to_string(),
            age: 20,
            email: "alice@uni.edu".to_string(),
            student_id: "S1".to_string(),
            registered_courses: vec!["C404".to_string()],
        }],
        instructors: vec![],
        courses: vec![CourseDocument {
            course_id: "C1".to_string(),
            course_name: "Algorithms".to_string(),
            instructor: Some("I404".to_string()),
            enrolled_students: vec!["S1".to_string(), "S404".to_string()],
        }],
    };

    let out = reconcile_with_report(&doc).unwrap();
    assert_eq!(out.graph.student("S1").unwrap().registered_courses(), ["C1"]);
    assert_eq!(out.graph.course("C1").unwrap().instructor(), None);
    assert_eq!(out.report.dangling_references.len(), 3);
    assert!(out
        .report
        .dangling_references
        .iter()
        .any(|r| r.to_kind == EntityKind::Course && r.to_id == "C404"));
    assert!(out.graph.symmetry_violations().is_empty());
}

#[test]
fn overwrite_then_load_reproduces_graph() {
    let source = load_graph(&scenario_store()).unwrap();

    let conn = open_db_in_memory().unwrap();
    SqliteStudentRepository::new(&conn)
        .add_student(&StudentRow::new("S9", "Stale", 30, "stale@uni.edu"))
        .unwrap();
    overwrite_store(&conn, &source).unwrap();

    let loaded = load_graph(&conn).unwrap();
    assert!(loaded.student("S9").is_none());
    assert_eq!(loaded, source);
}
