//! Course and enrollment contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `courses`.
//! - Set/clear the course instructor edge.
//! - Register/unregister the student enrollment edge.
//!
//! # Invariants
//! - `list_courses` orders by `cid ASC`.
//! - Rosters order by student `name ASC, sid ASC`.
//! - `list_enrollments` orders by `cid ASC, sid ASC`.
//! - Registering twice leaves exactly one enrollment row.

use crate::model::person::{require_non_blank, ValidationError};
use crate::model::EntityKind;
use crate::repo::{ensure_absent, ensure_exists, not_found, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// One `courses` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    pub cid: String,
    pub name: String,
    pub iid: Option<String>,
}

impl CourseRow {
    pub fn new(cid: impl Into<String>, name: impl Into<String>, iid: Option<String>) -> Self {
        Self {
            cid: cid.into(),
            name: name.into(),
            iid,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.cid, "cid")?;
        require_non_blank(&self.name, "name")
    }
}

/// Course listing row with its roster size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub cid: String,
    pub name: String,
    pub iid: Option<String>,
    pub enrolled_count: i64,
}

/// `(cid, name)` pair used in per-student course lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub cid: String,
    pub name: String,
}

/// `(sid, name)` pair used in course rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub sid: String,
    pub name: String,
}

/// One `enrollments` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRow {
    pub cid: String,
    pub sid: String,
}

/// Repository interface for `courses` and `enrollments`.
pub trait CourseRepository {
    /// Inserts a course. `row.iid`, when set, must name an existing
    /// instructor.
    fn add_course(&self, row: &CourseRow) -> RepoResult<()>;
    fn update_course_name(&self, cid: &str, name: &str) -> RepoResult<()>;
    /// Removes the course and its enrollments.
    fn delete_course(&self, cid: &str) -> RepoResult<()>;
    fn get_course(&self, cid: &str) -> RepoResult<Option<CourseRow>>;
    fn list_courses(&self) -> RepoResult<Vec<CourseSummary>>;
    fn list_course_roster(&self, cid: &str) -> RepoResult<Vec<RosterEntry>>;
    fn list_enrollments(&self) -> RepoResult<Vec<EnrollmentRow>>;
    fn set_course_instructor(&self, cid: &str, iid: &str) -> RepoResult<()>;
    fn clear_course_instructor(&self, cid: &str) -> RepoResult<()>;
    /// Returns `true` when a new enrollment row was written.
    fn register_student(&self, sid: &str, cid: &str) -> RepoResult<bool>;
    /// Returns `true` when an enrollment row was removed.
    fn unregister_student(&self, sid: &str, cid: &str) -> RepoResult<bool>;
}

/// SQLite-backed course/enrollment repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn add_course(&self, row: &CourseRow) -> RepoResult<()> {
        row.validate()?;
        ensure_absent(self.conn, EntityKind::Course, &row.cid)?;
        if let Some(iid) = row.iid.as_deref() {
            ensure_exists(self.conn, EntityKind::Instructor, iid)?;
        }

        self.conn.execute(
            "INSERT INTO courses (cid, name, iid) VALUES (?1, ?2, ?3);",
            params![row.cid, row.name, row.iid],
        )?;
        Ok(())
    }

    fn update_course_name(&self, cid: &str, name: &str) -> RepoResult<()> {
        require_non_blank(name, "name")?;

        let changed = self.conn.execute(
            "UPDATE courses SET name = ?2 WHERE cid = ?1;",
            params![cid, name],
        )?;
        if changed == 0 {
            return Err(not_found(EntityKind::Course, cid));
        }
        Ok(())
    }

    fn delete_course(&self, cid: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM enrollments WHERE cid = ?1;", [cid])?;
        let deleted = tx.execute("DELETE FROM courses WHERE cid = ?1;", [cid])?;
        if deleted == 0 {
            return Err(not_found(EntityKind::Course, cid));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_course(&self, cid: &str) -> RepoResult<Option<CourseRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT cid, name, iid FROM courses WHERE cid = ?1;",
                [cid],
                |row| {
                    Ok(CourseRow {
                        cid: row.get("cid")?,
                        name: row.get("name")?,
                        iid: row.get("iid")?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn list_courses(&self) -> RepoResult<Vec<CourseSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.cid AS cid,
                c.name AS name,
                c.iid AS iid,
                (SELECT COUNT(*) FROM enrollments e WHERE e.cid = c.cid) AS enrolled_count
             FROM courses c
             ORDER BY c.cid ASC;",
        )?;
        let rows = stmt
            .query_map([], parse_course_summary_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_course_roster(&self, cid: &str) -> RepoResult<Vec<RosterEntry>> {
        ensure_exists(self.conn, EntityKind::Course, cid)?;

        let mut stmt = self.conn.prepare(
            "SELECT s.sid, s.name
             FROM enrollments e
             INNER JOIN students s ON s.sid = e.sid
             WHERE e.cid = ?1
             ORDER BY s.name ASC, s.sid ASC;",
        )?;
        let rows = stmt
            .query_map([cid], |row| {
                Ok(RosterEntry {
                    sid: row.get("sid")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_enrollments(&self) -> RepoResult<Vec<EnrollmentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT cid, sid
             FROM enrollments
             ORDER BY cid ASC, sid ASC;",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(EnrollmentRow {
                    cid: row.get("cid")?,
                    sid: row.get("sid")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn set_course_instructor(&self, cid: &str, iid: &str) -> RepoResult<()> {
        ensure_exists(self.conn, EntityKind::Instructor, iid)?;

        let changed = self.conn.execute(
            "UPDATE courses SET iid = ?2 WHERE cid = ?1;",
            params![cid, iid],
        )?;
        if changed == 0 {
            return Err(not_found(EntityKind::Course, cid));
        }
        Ok(())
    }

    fn clear_course_instructor(&self, cid: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE courses SET iid = NULL WHERE cid = ?1;", [cid])?;
        if changed == 0 {
            return Err(not_found(EntityKind::Course, cid));
        }
        Ok(())
    }

    fn register_student(&self, sid: &str, cid: &str) -> RepoResult<bool> {
        ensure_exists(self.conn, EntityKind::Student, sid)?;
        ensure_exists(self.conn, EntityKind::Course, cid)?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO enrollments (cid, sid) VALUES (?1, ?2);",
            params![cid, sid],
        )?;
        Ok(inserted > 0)
    }

    fn unregister_student(&self, sid: &str, cid: &str) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM enrollments WHERE cid = ?1 AND sid = ?2;",
            params![cid, sid],
        )?;
        Ok(removed > 0)
    }
}

fn parse_course_summary_row(row: &Row<'_>) -> rusqlite::Result<CourseSummary> {
    Ok(CourseSummary {
        cid: row.get("cid")?,
        name: row.get("name")?,
        iid: row.get("iid")?,
        enrolled_count: row.get("enrolled_count")?,
    })
}
