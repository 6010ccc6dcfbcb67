//! Major repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `majors` table.
//! - Own the range-delete admin operation and the catalog reconcile
//!   entry point.
//!
//! # Invariants
//! - `count_students` read back from storage is never negative; a
//!   negative value is rejected as invalid persisted state.

use crate::catalog::Catalog;
use crate::model::major::{Major, MajorId, NewMajor};
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::repo::records::{Deletion, Records, Table};
use crate::repo::{Filters, RepoError, RepoResult, ValueSet};
use rusqlite::{Connection, Row};

impl Table for Major {
    const TABLE: &'static str = "majors";
    const COLUMNS: &'static [&'static str] =
        &["id", "major_name", "major_description", "count_students"];

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let major = Self {
            id: row.get("id")?,
            major_name: row.get("major_name")?,
            major_description: row.get("major_description")?,
            count_students: row.get("count_students")?,
        };
        if major.count_students < 0 {
            return Err(RepoError::InvalidData(format!(
                "major {} has negative count_students {}",
                major.id, major.count_students
            )));
        }
        Ok(major)
    }
}

/// Repository interface for major rows.
pub trait MajorRepository {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Major>>;
    fn find_one(&self, filters: &Filters) -> RepoResult<Major>;
    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Major>>;
    fn add(&self, new: &NewMajor) -> RepoResult<Major>;
    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Major>>;
    fn delete(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<Major>>;
    /// Deletes majors whose id falls in the inclusive range. A missing
    /// bound leaves that side open; no bounds at all deletes every row.
    fn delete_range(
        &self,
        start_id: Option<MajorId>,
        end_id: Option<MajorId>,
    ) -> RepoResult<Vec<Major>>;
    /// Converges stored majors/institutes toward the catalog; see
    /// `reconcile::Reconciler` for phase semantics.
    fn reconcile(&mut self, catalog: &Catalog) -> RepoResult<ReconcileReport>;
}

/// SQLite-backed major repository.
pub struct SqliteMajorRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMajorRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn records(&self) -> Records<'_, Major> {
        Records::new(self.conn)
    }
}

impl MajorRepository for SqliteMajorRepository<'_> {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Major>> {
        self.records().find_all(filters)
    }

    fn find_one(&self, filters: &Filters) -> RepoResult<Major> {
        self.records().find_one(filters)
    }

    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Major>> {
        self.records().find_one_or_none(filters)
    }

    fn add(&self, new: &NewMajor) -> RepoResult<Major> {
        let values = ValueSet::new()
            .set("major_name", new.major_name.clone())
            .set("major_description", new.major_description.clone());
        self.records().add(&values)
    }

    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Major>> {
        self.records().update(filters, values)
    }

    fn delete(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<Major>> {
        self.records().delete(filters, delete_all)
    }

    fn delete_range(
        &self,
        start_id: Option<MajorId>,
        end_id: Option<MajorId>,
    ) -> RepoResult<Vec<Major>> {
        let (condition, bounds) = match (start_id, end_id) {
            (Some(start), Some(end)) => (" WHERE id BETWEEN ?1 AND ?2", vec![start, end]),
            (Some(start), None) => (" WHERE id >= ?1", vec![start]),
            (None, Some(end)) => (" WHERE id <= ?1", vec![end]),
            (None, None) => ("", Vec::new()),
        };
        let sql = format!(
            "DELETE FROM majors{condition} RETURNING {};",
            Major::COLUMNS.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(bounds))?;
        let mut deleted = Vec::new();
        while let Some(row) = rows.next()? {
            deleted.push(Major::from_row(row)?);
        }
        Ok(deleted)
    }

    fn reconcile(&mut self, catalog: &Catalog) -> RepoResult<ReconcileReport> {
        Reconciler::new(self.conn).run(catalog)
    }
}
