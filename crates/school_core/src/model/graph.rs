//! Live object graph of students, instructors and courses.
//!
//! # Responsibility
//! - Own the three entity collections for one process.
//! - Expose symmetric edit workflows that touch both sides of an edge.
//! - Report broken edges for diagnostics and tests.
//!
//! # Invariants
//! - IDs are unique within each collection.
//! - Every workflow here leaves both sides of every edge in agreement.
//! - Deleting an entity severs all of its edges; it never cascades to other
//!   entities.

use crate::model::course::Course;
use crate::model::instructor::Instructor;
use crate::model::person::ValidationError;
use crate::model::student::Student;
use crate::model::{EntityKind, InstructorId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a graph edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Referenced entity is not in the graph.
    UnknownId { kind: EntityKind, id: String },
    Validation(ValidationError),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownId { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownId { .. } => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for GraphError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One edge that is recorded on only one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymmetryViolation {
    /// `course.instructor` names an instructor that does not list the course.
    CourseInstructorNotMirrored { course_id: String, instructor_id: String },
    /// An instructor lists a course whose `instructor` is someone else.
    AssignmentNotMirrored { instructor_id: String, course_id: String },
    /// A roster entry without the matching student registration.
    RosterNotMirrored { course_id: String, student_id: String },
    /// A student registration without the matching roster entry.
    RegistrationNotMirrored { student_id: String, course_id: String },
}

/// The in-memory entity collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolGraph {
    pub(crate) students: Vec<Student>,
    pub(crate) instructors: Vec<Instructor>,
    pub(crate) courses: Vec<Course>,
}

impl SchoolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        students: Vec<Student>,
        instructors: Vec<Instructor>,
        courses: Vec<Course>,
    ) -> Self {
        Self {
            students,
            instructors,
            courses,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.instructors.is_empty() && self.courses.is_empty()
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id() == student_id)
    }

    pub fn instructor(&self, instructor_id: &str) -> Option<&Instructor> {
        self.instructors
            .iter()
            .find(|i| i.instructor_id() == instructor_id)
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id() == course_id)
    }

    /// Adds a student. Any links carried by `student` are dropped; wire them
    /// with [`Self::enroll`].
    pub fn insert_student(&mut self, mut student: Student) -> Result<(), GraphError> {
        if self.student(student.student_id()).is_some() {
            return Err(duplicate(EntityKind::Student, student.student_id()));
        }
        student.clear_links();
        self.students.push(student);
        Ok(())
    }

    /// Adds an instructor. Any links carried by `instructor` are dropped.
    pub fn insert_instructor(&mut self, mut instructor: Instructor) -> Result<(), GraphError> {
        if self.instructor(instructor.instructor_id()).is_some() {
            return Err(duplicate(EntityKind::Instructor, instructor.instructor_id()));
        }
        instructor.clear_links();
        self.instructors.push(instructor);
        Ok(())
    }

    /// Adds a course. Any links carried by `course` are dropped.
    pub fn insert_course(&mut self, mut course: Course) -> Result<(), GraphError> {
        if self.course(course.course_id()).is_some() {
            return Err(duplicate(EntityKind::Course, course.course_id()));
        }
        course.clear_links();
        self.courses.push(course);
        Ok(())
    }

    /// Registers a student in a course on both sides. Idempotent.
    ///
    /// Returns `true` when either side changed.
    pub fn enroll(&mut self, student_id: &str, course_id: &str) -> Result<bool, GraphError> {
        let si = self.student_index(student_id)?;
        let ci = self.course_index(course_id)?;
        let student = &mut self.students[si];
        let course = &mut self.courses[ci];
        let registered = student.register_course(course);
        let added = course.add_student(student);
        Ok(registered || added)
    }

    /// Removes a registration on both sides. Returns `true` when anything
    /// changed.
    pub fn unenroll(&mut self, student_id: &str, course_id: &str) -> Result<bool, GraphError> {
        let si = self.student_index(student_id)?;
        let ci = self.course_index(course_id)?;
        let dropped = self.students[si].drop_course(course_id);
        let removed = self.courses[ci].remove_student(student_id);
        Ok(dropped || removed)
    }

    /// Makes `instructor_id` the course instructor on both sides.
    ///
    /// A previous instructor loses the course from its list. Returns the
    /// previous instructor ID.
    pub fn assign_instructor(
        &mut self,
        course_id: &str,
        instructor_id: &str,
    ) -> Result<Option<InstructorId>, GraphError> {
        let ci = self.course_index(course_id)?;
        let ii = self.instructor_index(instructor_id)?;
        let previous = self.courses[ci].instructor().map(str::to_string);

        if let Some(previous_id) = previous.as_deref() {
            if previous_id != instructor_id {
                if let Some(instructor) = self
                    .instructors
                    .iter_mut()
                    .find(|i| i.instructor_id() == previous_id)
                {
                    instructor.forget_course(course_id);
                }
            }
        }

        self.instructors[ii].assign_course(&mut self.courses[ci]);
        Ok(previous)
    }

    /// Clears the course instructor on both sides. Returns the removed
    /// instructor ID.
    pub fn unassign_instructor(
        &mut self,
        course_id: &str,
    ) -> Result<Option<InstructorId>, GraphError> {
        let ci = self.course_index(course_id)?;
        let Some(previous) = self.courses[ci].instructor().map(str::to_string) else {
            return Ok(None);
        };

        let course = &mut self.courses[ci];
        match self
            .instructors
            .iter_mut()
            .find(|i| i.instructor_id() == previous)
        {
            Some(instructor) => {
                instructor.release_course(course);
            }
            None => course.set_instructor(None),
        }
        Ok(Some(previous))
    }

    /// Deletes a student and every roster entry naming it.
    pub fn remove_student(&mut self, student_id: &str) -> Option<Student> {
        let index = self.student_index(student_id).ok()?;
        for course in &mut self.courses {
            course.remove_student(student_id);
        }
        let mut removed = self.students.remove(index);
        removed.clear_links();
        Some(removed)
    }

    /// Deletes an instructor. Its courses stay, with no instructor.
    pub fn remove_instructor(&mut self, instructor_id: &str) -> Option<Instructor> {
        let index = self.instructor_index(instructor_id).ok()?;
        for course in &mut self.courses {
            if course.instructor() == Some(instructor_id) {
                course.set_instructor(None);
            }
        }
        let mut removed = self.instructors.remove(index);
        removed.clear_links();
        Some(removed)
    }

    /// Deletes a course, its roster edges and its instructor edge.
    pub fn remove_course(&mut self, course_id: &str) -> Option<Course> {
        let index = self.course_index(course_id).ok()?;
        for student in &mut self.students {
            student.drop_course(course_id);
        }
        for instructor in &mut self.instructors {
            instructor.forget_course(course_id);
        }
        let mut removed = self.courses.remove(index);
        removed.clear_links();
        Some(removed)
    }

    /// Lists every edge that is recorded on only one side. Empty for a
    /// consistent graph.
    pub fn symmetry_violations(&self) -> Vec<SymmetryViolation> {
        let mut violations = Vec::new();

        for course in &self.courses {
            if let Some(iid) = course.instructor() {
                let mirrored = self
                    .instructor(iid)
                    .is_some_and(|i| i.teaches(course.course_id()));
                if !mirrored {
                    violations.push(SymmetryViolation::CourseInstructorNotMirrored {
                        course_id: course.course_id().to_string(),
                        instructor_id: iid.to_string(),
                    });
                }
            }
            for sid in course.enrolled_students() {
                let mirrored = self
                    .student(sid)
                    .is_some_and(|s| s.is_registered(course.course_id()));
                if !mirrored {
                    violations.push(SymmetryViolation::RosterNotMirrored {
                        course_id: course.course_id().to_string(),
                        student_id: sid.clone(),
                    });
                }
            }
        }

        for instructor in &self.instructors {
            for cid in instructor.assigned_courses() {
                let mirrored = self
                    .course(cid)
                    .is_some_and(|c| c.instructor() == Some(instructor.instructor_id()));
                if !mirrored {
                    violations.push(SymmetryViolation::AssignmentNotMirrored {
                        instructor_id: instructor.instructor_id().to_string(),
                        course_id: cid.clone(),
                    });
                }
            }
        }

        for student in &self.students {
            for cid in student.registered_courses() {
                let mirrored = self
                    .course(cid)
                    .is_some_and(|c| c.has_student(student.student_id()));
                if !mirrored {
                    violations.push(SymmetryViolation::RegistrationNotMirrored {
                        student_id: student.student_id().to_string(),
                        course_id: cid.clone(),
                    });
                }
            }
        }

        violations
    }

    fn student_index(&self, student_id: &str) -> Result<usize, GraphError> {
        self.students
            .iter()
            .position(|s| s.student_id() == student_id)
            .ok_or_else(|| unknown(EntityKind::Student, student_id))
    }

    fn instructor_index(&self, instructor_id: &str) -> Result<usize, GraphError> {
        self.instructors
            .iter()
            .position(|i| i.instructor_id() == instructor_id)
            .ok_or_else(|| unknown(EntityKind::Instructor, instructor_id))
    }

    fn course_index(&self, course_id: &str) -> Result<usize, GraphError> {
        self.courses
            .iter()
            .position(|c| c.course_id() == course_id)
            .ok_or_else(|| unknown(EntityKind::Course, course_id))
    }
}

fn unknown(kind: EntityKind, id: &str) -> GraphError {
    GraphError::UnknownId {
        kind,
        id: id.to_string(),
    }
}

fn duplicate(kind: EntityKind, id: &str) -> GraphError {
    GraphError::Validation(ValidationError::DuplicateId {
        kind,
        id: id.to_string(),
    })
}
