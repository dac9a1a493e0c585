use rusqlite::Connection;
use school_core::db::open_db_in_memory;
use school_core::model::person::ValidationError;
use school_core::model::EntityKind;
use school_core::repo::course_repo::{CourseRepository, CourseRow, SqliteCourseRepository};
use school_core::repo::instructor_repo::{
    InstructorRepository, InstructorRow, SqliteInstructorRepository,
};
use school_core::repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentRow};
use school_core::repo::RepoError;

fn seeded() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let students = SqliteStudentRepository::new(&conn);
    students
        .add_student(&StudentRow::new("S2", "Bob", 22, "bob@uni.edu"))
        .unwrap();
    students
        .add_student(&StudentRow::new("S1", "Alice", 20, "alice@uni.edu"))
        .unwrap();
    SqliteInstructorRepository::new(&conn)
        .add_instructor(&InstructorRow::new("I1", "Dr. X", 50, "x@uni.edu"))
        .unwrap();
    let courses = SqliteCourseRepository::new(&conn);
    courses
        .add_course(&CourseRow::new("C2", "Databases", Some("I1".to_string())))
        .unwrap();
    courses
        .add_course(&CourseRow::new("C1", "Algorithms", Some("I1".to_string())))
        .unwrap();
    conn
}

#[test]
fn lists_have_canonical_order() {
    let conn = seeded();
    let names: Vec<_> = SqliteStudentRepository::new(&conn)
        .list_students()
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);

    let courses = SqliteCourseRepository::new(&conn);
    let ids: Vec<_> = courses
        .list_courses()
        .unwrap()
        .into_iter()
        .map(|row| row.cid)
        .collect();
    assert_eq!(ids, ["C1", "C2"]);

    courses.register_student("S2", "C1").unwrap();
    courses.register_student("S1", "C1").unwrap();
    let roster: Vec<_> = courses
        .list_course_roster("C1")
        .unwrap()
        .into_iter()
        .map(|entry| entry.sid)
        .collect();
    assert_eq!(roster, ["S1", "S2"]);
}

#[test]
fn register_twice_keeps_one_enrollment() {
    let conn = seeded();
    let courses = SqliteCourseRepository::new(&conn);

    assert!(courses.register_student("S1", "C1").unwrap());
    assert!(!courses.register_student("S1", "C1").unwrap());

    let enrollments = courses.list_enrollments().unwrap();
    assert_eq!(enrollments.len(), 1);
    assert_eq!(courses.list_courses().unwrap()[0].enrolled_count, 1);

    assert!(courses.unregister_student("S1", "C1").unwrap());
    assert!(!courses.unregister_student("S1", "C1").unwrap());
}

#[test]
fn deleting_instructor_unassigns_courses_but_keeps_them() {
    let conn = seeded();
    SqliteInstructorRepository::new(&conn)
        .delete_instructor("I1")
        .unwrap();

    let courses = SqliteCourseRepository::new(&conn).list_courses().unwrap();
    assert_eq!(courses.len(), 2);
    assert!(courses.iter().all(|course| course.iid.is_none()));
}

#[test]
fn deleting_student_or_course_removes_enrollments() {
    let conn = seeded();
    let courses = SqliteCourseRepository::new(&conn);
    courses.register_student("S1", "C1").unwrap();
    courses.register_student("S2", "C1").unwrap();
    courses.register_student("S1", "C2").unwrap();

    SqliteStudentRepository::new(&conn)
        .delete_student("S1")
        .unwrap();
    assert_eq!(courses.list_enrollments().unwrap().len(), 1);

    courses.delete_course("C1").unwrap();
    assert!(courses.list_enrollments().unwrap().is_empty());
    assert!(courses.get_course("C1").unwrap().is_none());
}

#[test]
fn invalid_fields_are_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let students = SqliteStudentRepository::new(&conn);

    let err = students
        .add_student(&StudentRow::new("S1", "Alice", -1, "alice@uni.edu"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidAge(-1))
    ));

    let err = students
        .add_student(&StudentRow::new("S1", "Alice", 20, "not-an-email"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail(_))
    ));

    let err = students
        .add_student(&StudentRow::new("  ", "Alice", 20, "alice@uni.edu"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingField(_))
    ));

    assert!(students.list_students().unwrap().is_empty());
}

#[test]
fn duplicate_id_is_a_validation_error() {
    let conn = seeded();
    let err = SqliteStudentRepository::new(&conn)
        .add_student(&StudentRow::new("S1", "Other", 30, "o@uni.edu"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DuplicateId {
            kind: EntityKind::Student,
            ..
        })
    ));
}

#[test]
fn missing_rows_are_not_found() {
    let conn = seeded();
    let courses = SqliteCourseRepository::new(&conn);

    assert!(matches!(
        courses.register_student("S9", "C1"),
        Err(RepoError::NotFound {
            kind: EntityKind::Student,
            ..
        })
    ));
    assert!(matches!(
        courses.set_course_instructor("C1", "I9"),
        Err(RepoError::NotFound {
            kind: EntityKind::Instructor,
            ..
        })
    ));
    assert!(matches!(
        courses.update_course_name("C9", "Nothing"),
        Err(RepoError::NotFound {
            kind: EntityKind::Course,
            ..
        })
    ));
    assert!(matches!(
        SqliteStudentRepository::new(&conn).delete_student("S9"),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn instructor_edge_can_be_set_and_cleared() {
    let conn = seeded();
    let instructors = SqliteInstructorRepository::new(&conn);
    instructors
        .add_instructor(&InstructorRow::new("I2", "Dr. Y", 45, "y@uni.edu"))
        .unwrap();

    let courses = SqliteCourseRepository::new(&conn);
    courses.set_course_instructor("C1", "I2").unwrap();
    assert_eq!(
        courses.get_course("C1").unwrap().unwrap().iid.as_deref(),
        Some("I2")
    );

    courses.clear_course_instructor("C1").unwrap();
    assert_eq!(courses.get_course("C1").unwrap().unwrap().iid, None);
}

#[test]
fn student_course_list_is_ordered_by_course_name() {
    let conn = seeded();
    let courses = SqliteCourseRepository::new(&conn);
    courses.register_student("S1", "C2").unwrap();
    courses.register_student("S1", "C1").unwrap();

    let names: Vec<_> = SqliteStudentRepository::new(&conn)
        .list_student_courses("S1")
        .unwrap()
        .into_iter()
        .map(|course| course.name)
        .collect();
    assert_eq!(names, ["Algorithms", "Databases"]);
}

#[test]
fn update_replaces_scalar_fields() {
    let conn = seeded();
    let students = SqliteStudentRepository::new(&conn);
    students
        .update_student(&StudentRow::new("S1", "Alice B", 21, "alice.b@uni.edu"))
        .unwrap();

    let row = students.get_student("S1").unwrap().unwrap();
    assert_eq!(row.name, "Alice B");
    assert_eq!(row.age, 21);
}
