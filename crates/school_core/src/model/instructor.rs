//! Instructor entity.

use crate::model::course::Course;
use crate::model::person::{require_non_blank, Person, PersonLike, ValidationError};
use crate::model::{push_unique, remove_id, CourseId, InstructorId};
use crate::snapshot::document::InstructorDocument;

/// A person teaching zero or more courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
    person: Person,
    instructor_id: InstructorId,
    assigned_courses: Vec<CourseId>,
}

impl Instructor {
    /// Creates an instructor with no assignments.
    pub fn new(
        name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
        instructor_id: impl Into<InstructorId>,
    ) -> Result<Self, ValidationError> {
        let instructor_id = instructor_id.into();
        require_non_blank(&instructor_id, "instructor_id")?;
        Ok(Self {
            person: Person::new(name, age, email)?,
            instructor_id,
            assigned_courses: Vec::new(),
        })
    }

    pub fn instructor_id(&self) -> &str {
        &self.instructor_id
    }

    /// Assigned course IDs in assignment order.
    pub fn assigned_courses(&self) -> &[CourseId] {
        &self.assigned_courses
    }

    pub fn teaches(&self, course_id: &str) -> bool {
        self.assigned_courses.iter().any(|id| id == course_id)
    }

    /// Assigns `course` to this instructor and links the course back.
    ///
    /// The append is idempotent. The link-back always runs, so the course
    /// ends up pointing at `self`. If the course previously pointed at
    /// another instructor, that instructor's list is not touched here; use
    /// [`SchoolGraph::assign_instructor`](crate::model::graph::SchoolGraph::assign_instructor)
    /// for the full workflow.
    pub fn assign_course(&mut self, course: &mut Course) -> bool {
        let appended = push_unique(&mut self.assigned_courses, course.course_id());
        course.set_instructor(Some(self.instructor_id.clone()));
        appended
    }

    /// Drops `course` from this instructor and clears the course side when
    /// it still points here.
    pub fn release_course(&mut self, course: &mut Course) -> bool {
        let removed = remove_id(&mut self.assigned_courses, course.course_id());
        if course.instructor() == Some(self.instructor_id.as_str()) {
            course.set_instructor(None);
        }
        removed
    }

    pub(crate) fn forget_course(&mut self, course_id: &str) -> bool {
        remove_id(&mut self.assigned_courses, course_id)
    }

    pub(crate) fn clear_links(&mut self) {
        self.assigned_courses.clear();
    }

    /// Scalar fields plus assigned course IDs.
    pub fn to_document(&self) -> InstructorDocument {
        InstructorDocument {
            name: self.person.name().to_string(),
            age: self.person.age(),
            email: self.person.email().to_string(),
            instructor_id: self.instructor_id.clone(),
            assigned_courses: self.assigned_courses.clone(),
        }
    }

    /// Rebuilds scalar fields only. Assignments are wired by the reconciler.
    pub fn from_document(doc: &InstructorDocument) -> Result<Self, ValidationError> {
        Self::new(
            doc.name.as_str(),
            doc.age,
            doc.email.as_str(),
            doc.instructor_id.as_str(),
        )
    }
}

impl PersonLike for Instructor {
    fn person(&self) -> &Person {
        &self.person
    }

    fn id(&self) -> &str {
        &self.instructor_id
    }

    fn introduce(&self) -> String {
        format!(
            "Hey, I am {}, an instructor, {} years old. My email is {} and my ID is {}.",
            self.person.name(),
            self.person.age(),
            self.person.email(),
            self.instructor_id
        )
    }
}
