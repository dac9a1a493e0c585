//! Course entity.

use crate::model::person::{require_non_blank, ValidationError};
use crate::model::student::Student;
use crate::model::{push_unique, remove_id, CourseId, InstructorId, StudentId};
use crate::snapshot::document::CourseDocument;

/// A course with an optional instructor and a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    course_id: CourseId,
    course_name: String,
    instructor: Option<InstructorId>,
    enrolled_students: Vec<StudentId>,
}

impl Course {
    /// Creates an unassigned course with an empty roster.
    pub fn new(
        course_id: impl Into<CourseId>,
        course_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let course_id = course_id.into();
        let course_name = course_name.into();
        require_non_blank(&course_id, "course_id")?;
        require_non_blank(&course_name, "course_name")?;
        Ok(Self {
            course_id,
            course_name,
            instructor: None,
            enrolled_students: Vec::new(),
        })
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    /// Assigned instructor ID, if any.
    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }

    /// Roster student IDs in enrollment order.
    pub fn enrolled_students(&self) -> &[StudentId] {
        &self.enrolled_students
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.enrolled_students.iter().any(|id| id == student_id)
    }

    /// Adds `student` to the roster, once.
    ///
    /// Only this side is touched; pair with [`Student::register_course`].
    pub fn add_student(&mut self, student: &Student) -> bool {
        push_unique(&mut self.enrolled_students, student.student_id())
    }

    /// Removes a roster entry by student ID. Only this side is touched.
    pub fn remove_student(&mut self, student_id: &str) -> bool {
        remove_id(&mut self.enrolled_students, student_id)
    }

    pub(crate) fn set_instructor(&mut self, instructor_id: Option<InstructorId>) {
        self.instructor = instructor_id;
    }

    pub(crate) fn clear_links(&mut self) {
        self.instructor = None;
        self.enrolled_students.clear();
    }

    /// Scalar fields plus instructor ID and roster IDs.
    pub fn to_document(&self) -> CourseDocument {
        CourseDocument {
            course_id: self.course_id.clone(),
            course_name: self.course_name.clone(),
            instructor: self.instructor.clone(),
            enrolled_students: self.enrolled_students.clone(),
        }
    }

    /// Rebuilds scalar fields only. Instructor and roster are wired by the
    /// reconciler.
    pub fn from_document(doc: &CourseDocument) -> Result<Self, ValidationError> {
        Self::new(doc.course_id.as_str(), doc.course_name.as_str())
    }
}
