//! In-memory domain model for students, instructors and courses.
//!
//! # Responsibility
//! - Define the entity types and their validated scalar fields.
//! - Hold the live object graph and the symmetric link primitives.
//!
//! # Invariants
//! - Relationship collections store IDs, never embedded entities.
//! - `course.instructor == Some(i)` iff the course is in `i.assigned_courses`.
//! - A student is on a course roster iff the course is in the student's
//!   `registered_courses`.

use std::fmt::{Display, Formatter};

pub mod course;
pub mod graph;
pub mod instructor;
pub mod person;
pub mod student;

/// Stable student identifier (`students.sid`).
pub type StudentId = String;
/// Stable instructor identifier (`instructors.iid`).
pub type InstructorId = String;
/// Stable course identifier (`courses.cid`).
pub type CourseId = String;

/// Entity family an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Instructor,
    Course,
}

impl EntityKind {
    /// Lowercase label used in log lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Course => "course",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends `id` unless already present. Returns whether the list changed.
pub(crate) fn push_unique(ids: &mut Vec<String>, id: &str) -> bool {
    if ids.iter().any(|existing| existing == id) {
        return false;
    }
    ids.push(id.to_string());
    true
}

/// Removes `id` if present. Returns whether the list changed.
pub(crate) fn remove_id(ids: &mut Vec<String>, id: &str) -> bool {
    let before = ids.len();
    ids.retain(|existing| existing != id);
    ids.len() != before
}
