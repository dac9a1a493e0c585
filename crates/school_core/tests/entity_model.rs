use school_core::model::graph::SchoolGraph;
use school_core::{Course, Instructor, PersonLike, Student, ValidationError};

#[test]
fn primitives_are_idempotent_and_one_sided() {
    let mut student = Student::new("Alice", 20, "alice@uni.edu", "S1").unwrap();
    let mut course = Course::new("C1", "Algorithms").unwrap();

    assert!(student.register_course(&course));
    assert!(!student.register_course(&course));
    assert!(course.enrolled_students().is_empty());

    assert!(course.add_student(&student));
    assert!(!course.add_student(&student));
    assert_eq!(course.enrolled_students(), ["S1"]);
    assert_eq!(student.registered_courses(), ["C1"]);
}

#[test]
fn assign_course_always_links_back() {
    let mut instructor = Instructor::new("Dr. X", 50, "x@uni.edu", "I1").unwrap();
    let mut course = Course::new("C1", "Algorithms").unwrap();

    assert!(instructor.assign_course(&mut course));
    assert!(!instructor.assign_course(&mut course));
    assert_eq!(instructor.assigned_courses(), ["C1"]);
    assert_eq!(course.instructor(), Some("I1"));

    assert!(instructor.release_course(&mut course));
    assert_eq!(course.instructor(), None);
}

#[test]
fn to_document_carries_ids_only() {
    let mut graph = SchoolGraph::new();
    graph
        .insert_student(Student::new("Alice", 20, "alice@uni.edu", "S1").unwrap())
        .unwrap();
    graph
        .insert_instructor(Instructor::new("Dr. X", 50, "x@uni.edu", "I1").unwrap())
        .unwrap();
    graph
        .insert_course(Course::new("C1", "Algorithms").unwrap())
        .unwrap();
    graph.enroll("S1", "C1").unwrap();
    graph.assign_instructor("C1", "I1").unwrap();

    let json = serde_json::to_value(graph.course("C1").unwrap().to_document()).unwrap();
    assert_eq!(json["course_id"], "C1");
    assert_eq!(json["course_name"], "Algorithms");
    assert_eq!(json["instructor"], "I1");
    assert_eq!(json["enrolled_students"], serde_json::json!(["S1"]));

    let json = serde_json::to_value(graph.student("S1").unwrap().to_document()).unwrap();
    assert_eq!(json["registered_courses"], serde_json::json!(["C1"]));
}

#[test]
fn from_document_restores_scalars_without_links() {
    let mut student = Student::new("Alice", 20, "alice@uni.edu", "S1").unwrap();
    let course = Course::new("C1", "Algorithms").unwrap();
    student.register_course(&course);

    let rebuilt = Student::from_document(&student.to_document()).unwrap();
    assert_eq!(rebuilt.student_id(), "S1");
    assert_eq!(rebuilt.name(), "Alice");
    assert!(rebuilt.registered_courses().is_empty());
}

#[test]
fn constructors_validate_fields() {
    assert_eq!(
        Student::new("Alice", -1, "alice@uni.edu", "S1").unwrap_err(),
        ValidationError::InvalidAge(-1)
    );
    assert!(matches!(
        Instructor::new("Dr. X", 50, "x-at-uni", "I1").unwrap_err(),
        ValidationError::InvalidEmail(_)
    ));
    assert!(matches!(
        Course::new("C1", " ").unwrap_err(),
        ValidationError::MissingField(_)
    ));
}

#[test]
fn introduce_mentions_role_id() {
    let student = Student::new("Alice", 20, "alice@uni.edu", "S1").unwrap();
    let instructor = Instructor::new("Dr. X", 50, "x@uni.edu", "I1").unwrap();

    assert!(student.introduce().contains("S1"));
    assert!(instructor.introduce().contains("I1"));
    assert_eq!(instructor.id(), "I1");
}

#[test]
fn removing_instructor_keeps_its_courses() {
    let mut graph = SchoolGraph::new();
    graph
        .insert_instructor(Instructor::new("Dr. X", 50, "x@uni.edu", "I1").unwrap())
        .unwrap();
    graph
        .insert_course(Course::new("C1", "Algorithms").unwrap())
        .unwrap();
    graph
        .insert_course(Course::new("C2", "Databases").unwrap())
        .unwrap();
    graph.assign_instructor("C1", "I1").unwrap();
    graph.assign_instructor("C2", "I1").unwrap();

    graph.remove_instructor("I1").unwrap();
    assert_eq!(graph.courses().len(), 2);
    assert!(graph.courses().iter().all(|c| c.instructor().is_none()));
    assert!(graph.symmetry_violations().is_empty());
}
