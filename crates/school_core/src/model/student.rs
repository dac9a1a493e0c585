//! Student entity.

use crate::model::course::Course;
use crate::model::person::{require_non_blank, Person, PersonLike, ValidationError};
use crate::model::{push_unique, remove_id, CourseId, StudentId};
use crate::snapshot::document::StudentDocument;

/// A person registered in zero or more courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    person: Person,
    student_id: StudentId,
    registered_courses: Vec<CourseId>,
}

impl Student {
    /// Creates a student with no registrations.
    pub fn new(
        name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
        student_id: impl Into<StudentId>,
    ) -> Result<Self, ValidationError> {
        let student_id = student_id.into();
        require_non_blank(&student_id, "student_id")?;
        Ok(Self {
            person: Person::new(name, age, email)?,
            student_id,
            registered_courses: Vec::new(),
        })
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Registered course IDs in registration order.
    pub fn registered_courses(&self) -> &[CourseId] {
        &self.registered_courses
    }

    pub fn is_registered(&self, course_id: &str) -> bool {
        self.registered_courses.iter().any(|id| id == course_id)
    }

    /// Adds `course` to this student's registrations, once.
    ///
    /// Only this side is touched; pair with [`Course::add_student`].
    pub fn register_course(&mut self, course: &Course) -> bool {
        push_unique(&mut self.registered_courses, course.course_id())
    }

    /// Removes a registration by course ID. Only this side is touched.
    pub fn drop_course(&mut self, course_id: &str) -> bool {
        remove_id(&mut self.registered_courses, course_id)
    }

    pub(crate) fn clear_links(&mut self) {
        self.registered_courses.clear();
    }

    /// Scalar fields plus registered course IDs.
    pub fn to_document(&self) -> StudentDocument {
        StudentDocument {
            name: self.person.name().to_string(),
            age: self.person.age(),
            email: self.person.email().to_string(),
            student_id: self.student_id.clone(),
            registered_courses: self.registered_courses.clone(),
        }
    }

    /// Rebuilds scalar fields only. Registrations are wired by the reconciler.
    pub fn from_document(doc: &StudentDocument) -> Result<Self, ValidationError> {
        Self::new(
            doc.name.as_str(),
            doc.age,
            doc.email.as_str(),
            doc.student_id.as_str(),
        )
    }
}

impl PersonLike for Student {
    fn person(&self) -> &Person {
        &self.person
    }

    fn id(&self) -> &str {
        &self.student_id
    }

    fn introduce(&self) -> String {
        format!(
            "Hey, this is {}, I am {} years old. You can reach out to me on my email: {}. My student ID is {}.",
            self.person.name(),
            self.person.age(),
            self.person.email(),
            self.student_id
        )
    }
}
