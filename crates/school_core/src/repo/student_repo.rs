//! Student table contracts and SQLite implementation.
//!
//! # Invariants
//! - `list_students` orders by `name ASC, sid ASC`.
//! - Deleting a student removes its enrollments in the same transaction.

use crate::model::person::{require_non_blank, validate_person_fields, ValidationError};
use crate::model::EntityKind;
use crate::repo::course_repo::CourseRef;
use crate::repo::{ensure_absent, ensure_exists, not_found, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// One `students` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub sid: String,
    pub name: String,
    pub age: i64,
    pub email: String,
}

impl StudentRow {
    pub fn new(
        sid: impl Into<String>,
        name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
    ) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    /// Field rules applied before every write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.sid, "sid")?;
        validate_person_fields(&self.name, self.age, &self.email)
    }
}

/// Repository interface for the `students` table.
pub trait StudentRepository {
    fn add_student(&self, row: &StudentRow) -> RepoResult<()>;
    fn update_student(&self, row: &StudentRow) -> RepoResult<()>;
    fn delete_student(&self, sid: &str) -> RepoResult<()>;
    fn get_student(&self, sid: &str) -> RepoResult<Option<StudentRow>>;
    fn list_students(&self) -> RepoResult<Vec<StudentRow>>;
    /// Courses one student is enrolled in, ordered by course name then id.
    fn list_student_courses(&self, sid: &str) -> RepoResult<Vec<CourseRef>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn add_student(&self, row: &StudentRow) -> RepoResult<()> {
        row.validate()?;
        ensure_absent(self.conn, EntityKind::Student, &row.sid)?;

        self.conn.execute(
            "INSERT INTO students (sid, name, age, email) VALUES (?1, ?2, ?3, ?4);",
            params![row.sid, row.name, row.age, row.email],
        )?;
        Ok(())
    }

    fn update_student(&self, row: &StudentRow) -> RepoResult<()> {
        row.validate()?;

        let changed = self.conn.execute(
            "UPDATE students SET name = ?2, age = ?3, email = ?4 WHERE sid = ?1;",
            params![row.sid, row.name, row.age, row.email],
        )?;
        if changed == 0 {
            return Err(not_found(EntityKind::Student, &row.sid));
        }
        Ok(())
    }

    fn delete_student(&self, sid: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM enrollments WHERE sid = ?1;", [sid])?;
        let deleted = tx.execute("DELETE FROM students WHERE sid = ?1;", [sid])?;
        if deleted == 0 {
            return Err(not_found(EntityKind::Student, sid));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_student(&self, sid: &str) -> RepoResult<Option<StudentRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT sid, name, age, email FROM students WHERE sid = ?1;",
                [sid],
                parse_student_row,
            )
            .optional()?;
        Ok(row)
    }

    fn list_students(&self) -> RepoResult<Vec<StudentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT sid, name, age, email
             FROM students
             ORDER BY name ASC, sid ASC;",
        )?;
        let rows = stmt
            .query_map([], parse_student_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_student_courses(&self, sid: &str) -> RepoResult<Vec<CourseRef>> {
        ensure_exists(self.conn, EntityKind::Student, sid)?;

        let mut stmt = self.conn.prepare(
            "SELECT c.cid, c.name
             FROM enrollments e
             INNER JOIN courses c ON c.cid = e.cid
             WHERE e.sid = ?1
             ORDER BY c.name ASC, c.cid ASC;",
        )?;
        let rows = stmt
            .query_map([sid], |row| {
                Ok(CourseRef {
                    cid: row.get("cid")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        sid: row.get("sid")?,
        name: row.get("name")?,
        age: row.get("age")?,
        email: row.get("email")?,
    })
}
