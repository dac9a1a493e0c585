//! Wire shapes of the JSON snapshot.
//!
//! Relationships are carried as ID lists so a cyclic graph flattens into a
//! tree. Field names are part of the file format and must not change.

use serde::{Deserialize, Serialize};

/// Whole snapshot file: `{students, instructors, courses}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub students: Vec<StudentDocument>,
    #[serde(default)]
    pub instructors: Vec<InstructorDocument>,
    #[serde(default)]
    pub courses: Vec<CourseDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDocument {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub student_id: String,
    #[serde(default)]
    pub registered_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorDocument {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub instructor_id: String,
    #[serde(default)]
    pub assigned_courses: Vec<String>,
}

/// `instructor` is an instructor ID, `null` when unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDocument {
    pub course_id: String,
    pub course_name: String,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub enrolled_students: Vec<String>,
}
