//! Instructor table contracts and SQLite implementation.
//!
//! # Invariants
//! - `list_instructors` orders by `name ASC, iid ASC`.
//! - Deleting an instructor keeps its courses and clears `courses.iid`.

use crate::model::person::{require_non_blank, validate_person_fields, ValidationError};
use crate::model::EntityKind;
use crate::repo::{ensure_absent, not_found, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// One `instructors` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorRow {
    pub iid: String,
    pub name: String,
    pub age: i64,
    pub email: String,
}

impl InstructorRow {
    pub fn new(
        iid: impl Into<String>,
        name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
    ) -> Self {
        Self {
            iid: iid.into(),
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.iid, "iid")?;
        validate_person_fields(&self.name, self.age, &self.email)
    }
}

/// Repository interface for the `instructors` table.
pub trait InstructorRepository {
    fn add_instructor(&self, row: &InstructorRow) -> RepoResult<()>;
    fn update_instructor(&self, row: &InstructorRow) -> RepoResult<()>;
    /// Removes the instructor; every course it taught becomes unassigned.
    fn delete_instructor(&self, iid: &str) -> RepoResult<()>;
    fn get_instructor(&self, iid: &str) -> RepoResult<Option<InstructorRow>>;
    fn list_instructors(&self) -> RepoResult<Vec<InstructorRow>>;
}

/// SQLite-backed instructor repository.
pub struct SqliteInstructorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstructorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InstructorRepository for SqliteInstructorRepository<'_> {
    fn add_instructor(&self, row: &InstructorRow) -> RepoResult<()> {
        row.validate()?;
        ensure_absent(self.conn, EntityKind::Instructor, &row.iid)?;

        self.conn.execute(
            "INSERT INTO instructors (iid, name, age, email) VALUES (?1, ?2, ?3, ?4);",
            params![row.iid, row.name, row.age, row.email],
        )?;
        Ok(())
    }

    fn update_instructor(&self, row: &InstructorRow) -> RepoResult<()> {
        row.validate()?;

        let changed = self.conn.execute(
            "UPDATE instructors SET name = ?2, age = ?3, email = ?4 WHERE iid = ?1;",
            params![row.iid, row.name, row.age, row.email],
        )?;
        if changed == 0 {
            return Err(not_found(EntityKind::Instructor, &row.iid));
        }
        Ok(())
    }

    fn delete_instructor(&self, iid: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("UPDATE courses SET iid = NULL WHERE iid = ?1;", [iid])?;
        let deleted = tx.execute("DELETE FROM instructors WHERE iid = ?1;", [iid])?;
        if deleted == 0 {
            return Err(not_found(EntityKind::Instructor, iid));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_instructor(&self, iid: &str) -> RepoResult<Option<InstructorRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT iid, name, age, email FROM instructors WHERE iid = ?1;",
                [iid],
                parse_instructor_row,
            )
            .optional()?;
        Ok(row)
    }

    fn list_instructors(&self) -> RepoResult<Vec<InstructorRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT iid, name, age, email
             FROM instructors
             ORDER BY name ASC, iid ASC;",
        )?;
        let rows = stmt
            .query_map([], parse_instructor_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_instructor_row(row: &Row<'_>) -> rusqlite::Result<InstructorRow> {
    Ok(InstructorRow {
        iid: row.get("iid")?,
        name: row.get("name")?,
        age: row.get("age")?,
        email: row.get("email")?,
    })
}
