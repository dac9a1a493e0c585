use school_core::model::graph::SchoolGraph;
use school_core::snapshot::{
    decode, encode, from_json_str, read_snapshot, to_json_string, write_snapshot, SnapshotError,
};
use school_core::{Course, Instructor, Student, ValidationError};
use std::collections::BTreeSet;

fn sample_graph() -> SchoolGraph {
    let mut graph = SchoolGraph::new();
    for (id, name) in [("S1", "Alice"), ("S2", "Bob")] {
        graph
            .insert_student(
                Student::new(name, 20, format!("{}@uni.edu", name.to_lowercase()), id).unwrap(),
            )
            .unwrap();
    }
    graph
        .insert_instructor(Instructor::new("Dr. X", 50, "x@uni.edu", "I1").unwrap())
        .unwrap();
    graph
        .insert_course(Course::new("C1", "Algorithms").unwrap())
        .unwrap();
    graph
        .insert_course(Course::new("C2", "Databases").unwrap())
        .unwrap();
    graph.enroll("S1", "C1").unwrap();
    graph.enroll("S2", "C1").unwrap();
    graph.enroll("S1", "C2").unwrap();
    graph.assign_instructor("C1", "I1").unwrap();
    graph
}

fn edge_set(graph: &SchoolGraph) -> BTreeSet<(String, String, String)> {
    let mut edges = BTreeSet::new();
    for course in graph.courses() {
        if let Some(iid) = course.instructor() {
            edges.insert(("teaches".into(), iid.to_string(), course.course_id().to_string()));
        }
        for sid in course.enrolled_students() {
            edges.insert(("enrolled".into(), sid.clone(), course.course_id().to_string()));
        }
    }
    edges
}

#[test]
fn decode_of_encode_preserves_ids_fields_and_edges() {
    let graph = sample_graph();
    let decoded = decode(&encode(&graph)).unwrap();

    assert_eq!(edge_set(&decoded), edge_set(&graph));
    assert_eq!(encode(&decoded), encode(&graph));
    assert!(decoded.symmetry_violations().is_empty());
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exports").join("school.json");
    let graph = sample_graph();

    write_snapshot(&path, &graph).unwrap();
    let loaded = read_snapshot(&path).unwrap();
    assert_eq!(loaded, graph);
}

#[test]
fn json_uses_documented_field_names() {
    let text = to_json_string(&encode(&sample_graph())).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["students"][0]["student_id"], "S1");
    assert_eq!(json["students"][0]["registered_courses"], serde_json::json!(["C1", "C2"]));
    assert_eq!(json["instructors"][0]["instructor_id"], "I1");
    assert_eq!(json["instructors"][0]["assigned_courses"], serde_json::json!(["C1"]));
    assert_eq!(json["courses"][0]["instructor"], "I1");
    assert!(json["courses"][1]["instructor"].is_null());
}

#[test]
fn hand_written_document_with_one_sided_edges_decodes() {
    let doc = from_json_str(
        r#"{
            "students": [
                {"name": "Alice", "age": 20, "email": "alice@uni.edu", "student_id": "S1",
                 "registered_courses": ["C1", "C404"]}
            ],
            "instructors": [
                {"name": "Dr. X", "age": 50, "email": "x@uni.edu", "instructor_id": "I1",
                 "assigned_courses": ["C1"]}
            ],
            "courses": [
                {"course_id": "C1", "course_name": "Algorithms"}
            ]
        }"#,
    )
    .unwrap();

    let graph = decode(&doc).unwrap();
    let course = graph.course("C1").unwrap();
    assert_eq!(course.enrolled_students(), ["S1"]);
    assert_eq!(course.instructor(), Some("I1"));
    assert_eq!(graph.student("S1").unwrap().registered_courses(), ["C1"]);
}

#[test]
fn invalid_record_is_a_validation_error() {
    let doc = from_json_str(
        r#"{"students": [{"name": "Alice", "age": 20, "email": "nope", "student_id": "S1"}]}"#,
    )
    .unwrap();

    assert!(matches!(
        decode(&doc),
        Err(SnapshotError::Validation(ValidationError::InvalidEmail(_)))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_snapshot(dir.path().join("absent.json")),
        Err(SnapshotError::Io(_))
    ));
}
