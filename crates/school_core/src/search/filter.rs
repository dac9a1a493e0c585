//! Case-insensitive row filter over the live graph.
//!
//! # Invariants
//! - A blank query matches every row.
//! - Hits keep the graph's collection order.

use crate::model::course::Course;
use crate::model::graph::SchoolGraph;
use crate::model::instructor::Instructor;
use crate::model::person::PersonLike;
use crate::model::student::Student;

/// Rows that matched one query, per collection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchHits<'g> {
    pub students: Vec<&'g Student>,
    pub instructors: Vec<&'g Instructor>,
    pub courses: Vec<&'g Course>,
}

impl SearchHits<'_> {
    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.instructors.is_empty() && self.courses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.students.len() + self.instructors.len() + self.courses.len()
    }
}

/// Filters each collection by substring over the row's display values.
pub fn search<'g>(graph: &'g SchoolGraph, text: &str) -> SearchHits<'g> {
    let needle = text.trim().to_lowercase();
    let matches = |haystack: String| needle.is_empty() || haystack.to_lowercase().contains(&needle);

    SearchHits {
        students: graph
            .students()
            .iter()
            .filter(|s| matches(person_row(*s, s.registered_courses())))
            .collect(),
        instructors: graph
            .instructors()
            .iter()
            .filter(|i| matches(person_row(*i, i.assigned_courses())))
            .collect(),
        courses: graph
            .courses()
            .iter()
            .filter(|c| matches(course_row(c)))
            .collect(),
    }
}

fn person_row(person: &impl PersonLike, related: &[String]) -> String {
    format!(
        "{} {} {} {} {}",
        person.id(),
        person.name(),
        person.age(),
        person.email(),
        related.join(" ")
    )
}

fn course_row(course: &Course) -> String {
    format!(
        "{} {} {} {}",
        course.course_id(),
        course.course_name(),
        course.instructor().unwrap_or_default(),
        course.enrolled_students().join(" ")
    )
}
