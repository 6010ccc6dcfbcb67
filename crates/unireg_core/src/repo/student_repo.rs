//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/update APIs over the `students` table.
//! - Own the counted mutations: creation and deletion adjust the
//!   denormalized `count_students` on the referenced major and institute
//!   within the same transaction as the row change.
//!
//! # Invariants
//! - `add_student` resolves major/institute names to ids before insert;
//!   a missing parent aborts the whole transaction.
//! - Counter decrements floor at zero; the counter never goes negative.

use crate::model::major::MajorId;
use crate::model::student::{Student, StudentDraft};
use crate::repo::records::{Records, Table};
use crate::repo::{Filters, RepoError, RepoResult, ValueSet};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

impl Table for Student {
    const TABLE: &'static str = "students";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "date_of_birth",
        "phone_number",
        "email",
        "address",
        "enrollment_year",
        "course",
        "special_notes",
        "major_id",
        "institute_id",
    ];

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("date_of_birth")?,
            phone_number: row.get("phone_number")?,
            email: row.get("email")?,
            address: row.get("address")?,
            enrollment_year: row.get("enrollment_year")?,
            course: row.get("course")?,
            special_notes: row.get("special_notes")?,
            major_id: row.get("major_id")?,
            institute_id: row.get("institute_id")?,
        })
    }
}

/// Whether student creation verifies the institute belongs to the
/// declared major. The registry's schema variants disagree on this check;
/// both behaviors are kept selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentValidation {
    /// Reject a draft whose institute belongs to a different major.
    #[default]
    Strict,
    /// Accept any existing institute regardless of its major.
    Relaxed,
}

/// Repository interface for student rows.
pub trait StudentRepository {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Student>>;
    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Student>>;
    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Student>>;
    /// Creates one student and increments both parent counters atomically.
    fn add_student(&mut self, draft: &StudentDraft) -> RepoResult<Student>;
    /// Deletes the single student matching the filters and decrements both
    /// parent counters atomically, floored at zero.
    fn delete_student(&mut self, filters: &Filters) -> RepoResult<Student>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
    validation: StudentValidation,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn mut Connection, validation: StudentValidation) -> Self {
        Self { conn, validation }
    }

    fn records(&self) -> Records<'_, Student> {
        Records::new(self.conn)
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Student>> {
        self.records().find_all(filters)
    }

    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Student>> {
        self.records().find_one_or_none(filters)
    }

    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Student>> {
        self.records().update(filters, values)
    }

    fn add_student(&mut self, draft: &StudentDraft) -> RepoResult<Student> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let major_id: MajorId = tx
            .query_row(
                "SELECT id FROM majors WHERE major_name = ?1;",
                [draft.major_name.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepoError::NotFound(format!("major named `{}`", draft.major_name)))?;

        let (institute_id, institute_major_id): (i64, MajorId) = tx
            .query_row(
                "SELECT id, major_id FROM institutes WHERE institute_name = ?1;",
                [draft.institute_name.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| {
                RepoError::NotFound(format!("institute named `{}`", draft.institute_name))
            })?;

        if self.validation == StudentValidation::Strict && institute_major_id != major_id {
            return Err(RepoError::BadRequest(format!(
                "institute `{}` does not belong to major `{}`",
                draft.institute_name, draft.major_name
            )));
        }

        if let Some(explicit_id) = draft.id {
            let taken: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
                [explicit_id],
                |row| row.get(0),
            )?;
            if taken {
                return Err(RepoError::BadRequest(format!(
                    "student id {explicit_id} already exists"
                )));
            }
        }

        let student = insert_student(&tx, draft, major_id, institute_id)?;

        tx.execute(
            "UPDATE majors SET count_students = count_students + 1 WHERE id = ?1;",
            [major_id],
        )?;
        tx.execute(
            "UPDATE institutes SET count_students = count_students + 1 WHERE id = ?1;",
            [institute_id],
        )?;
        tx.commit()?;

        info!(
            "event=student_add module=repo status=ok student_id={} major_id={major_id} institute_id={institute_id}",
            student.id
        );
        Ok(student)
    }

    fn delete_student(&mut self, filters: &Filters) -> RepoResult<Student> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut matches = Records::<Student>::new(&tx).find_all(filters)?;
        let student = match matches.len() {
            0 => {
                return Err(RepoError::NotFound(
                    "student matching the given filters".to_string(),
                ))
            }
            1 => matches.remove(0),
            matched => {
                return Err(RepoError::BadRequest(format!(
                    "filters matched {matched} students, expected exactly one"
                )))
            }
        };

        tx.execute("DELETE FROM students WHERE id = ?1;", [student.id])?;
        tx.execute(
            "UPDATE majors SET count_students = MAX(count_students - 1, 0) WHERE id = ?1;",
            [student.major_id],
        )?;
        tx.execute(
            "UPDATE institutes SET count_students = MAX(count_students - 1, 0) WHERE id = ?1;",
            [student.institute_id],
        )?;
        tx.commit()?;

        info!(
            "event=student_delete module=repo status=ok student_id={} major_id={} institute_id={}",
            student.id, student.major_id, student.institute_id
        );
        Ok(student)
    }
}

fn insert_student(
    tx: &Transaction<'_>,
    draft: &StudentDraft,
    major_id: MajorId,
    institute_id: i64,
) -> RepoResult<Student> {
    let mut stmt = tx.prepare(
        "INSERT INTO students (
            id,
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
            address,
            enrollment_year,
            course,
            special_notes,
            major_id,
            institute_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        RETURNING
            id, first_name, last_name, date_of_birth, phone_number, email,
            address, enrollment_year, course, special_notes, major_id, institute_id;",
    )?;

    let mut rows = stmt.query(params![
        draft.id,
        draft.first_name,
        draft.last_name,
        draft.date_of_birth,
        draft.phone_number,
        draft.email,
        draft.address,
        draft.enrollment_year,
        draft.course,
        draft.special_notes,
        major_id,
        institute_id,
    ])?;

    match rows.next()? {
        Some(row) => Student::from_row(row),
        None => Err(RepoError::InvalidData(
            "student insert returned no row".to_string(),
        )),
    }
}
