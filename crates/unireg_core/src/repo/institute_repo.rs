//! Institute repository contract and SQLite implementation.

use crate::model::institute::{Institute, NewInstitute};
use crate::model::major::MajorId;
use crate::repo::records::{Deletion, Records, Table};
use crate::repo::{Filters, RepoError, RepoResult, ValueSet};
use rusqlite::{Connection, Row};

impl Table for Institute {
    const TABLE: &'static str = "institutes";
    const COLUMNS: &'static [&'static str] =
        &["id", "institute_name", "major_id", "count_students"];

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let institute = Self {
            id: row.get("id")?,
            institute_name: row.get("institute_name")?,
            major_id: row.get("major_id")?,
            count_students: row.get("count_students")?,
        };
        if institute.count_students < 0 {
            return Err(RepoError::InvalidData(format!(
                "institute {} has negative count_students {}",
                institute.id, institute.count_students
            )));
        }
        Ok(institute)
    }
}

/// Repository interface for institute rows.
pub trait InstituteRepository {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Institute>>;
    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Institute>>;
    fn find_by_major(&self, major_id: MajorId) -> RepoResult<Vec<Institute>>;
    fn add(&self, new: &NewInstitute) -> RepoResult<Institute>;
    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Institute>>;
    fn delete(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<Institute>>;
}

/// SQLite-backed institute repository.
pub struct SqliteInstituteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstituteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn records(&self) -> Records<'_, Institute> {
        Records::new(self.conn)
    }
}

impl InstituteRepository for SqliteInstituteRepository<'_> {
    fn find_all(&self, filters: &Filters) -> RepoResult<Vec<Institute>> {
        self.records().find_all(filters)
    }

    fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<Institute>> {
        self.records().find_one_or_none(filters)
    }

    fn find_by_major(&self, major_id: MajorId) -> RepoResult<Vec<Institute>> {
        self.records().find_all(&Filters::new().eq("major_id", major_id))
    }

    fn add(&self, new: &NewInstitute) -> RepoResult<Institute> {
        let values = ValueSet::new()
            .set("institute_name", new.institute_name.clone())
            .set("major_id", new.major_id);
        self.records().add(&values)
    }

    fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<Institute>> {
        self.records().update(filters, values)
    }

    fn delete(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<Institute>> {
        self.records().delete(filters, delete_all)
    }
}
