//! Generic record repository over one entity table.
//!
//! # Responsibility
//! - Provide uniform find/add/update/delete operations parameterized by
//!   an entity type and an exact-equality filter conjunction.
//! - Keep dynamic SQL assembly inside the persistence boundary.
//!
//! # Invariants
//! - Every column name is checked against `Table::COLUMNS` before SQL is
//!   built; unknown names fail instead of reaching the database.
//! - Each operation is a single statement on the scoped connection and is
//!   therefore atomic on its own.

use crate::repo::{Filters, RepoError, RepoResult, ValueSet};
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;

/// Row mapping contract implemented by every stored entity.
pub trait Table: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Decodes one row; persisted state that fails decoding must surface
    /// as `RepoError::InvalidData`, never as an empty result.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Outcome of a bulk delete: the removed records and their count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion<T> {
    pub records: Vec<T>,
    pub count: usize,
}

/// Uniform CRUD operations over one entity table.
pub struct Records<'conn, T: Table> {
    conn: &'conn Connection,
    table: PhantomData<T>,
}

impl<'conn, T: Table> Records<'conn, T> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            table: PhantomData,
        }
    }

    fn ensure_known<'a>(&self, columns: impl Iterator<Item = &'a str>) -> RepoResult<()> {
        for column in columns {
            if !T::COLUMNS.contains(&column) {
                return Err(RepoError::UnknownColumn {
                    table: T::TABLE,
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns all records matching the filter conjunction, ordered by id.
    ///
    /// An empty filter set returns every row.
    pub fn find_all(&self, filters: &Filters) -> RepoResult<Vec<T>> {
        self.ensure_known(filters.columns())?;

        let mut sql = format!("SELECT {} FROM {}", select_list::<T>(), T::TABLE);
        sql.push_str(&where_clause(filters, 1));
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(filters.values()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }

    /// Returns the single record matching the filters.
    ///
    /// # Errors
    /// - `NotFound` when nothing matched.
    /// - `BadRequest` when more than one row matched.
    pub fn find_one(&self, filters: &Filters) -> RepoResult<T> {
        let mut records = self.find_all(filters)?;
        match records.len() {
            0 => Err(RepoError::NotFound(format!(
                "{} row matching the given filters",
                T::TABLE
            ))),
            1 => Ok(records.remove(0)),
            matched => Err(RepoError::BadRequest(format!(
                "filters matched {matched} {} rows, expected exactly one",
                T::TABLE
            ))),
        }
    }

    /// Like `find_one`, but zero matches yield `None` instead of failing.
    pub fn find_one_or_none(&self, filters: &Filters) -> RepoResult<Option<T>> {
        let mut records = self.find_all(filters)?;
        match records.len() {
            0 => Ok(None),
            1 => Ok(Some(records.remove(0))),
            matched => Err(RepoError::BadRequest(format!(
                "filters matched {matched} {} rows, expected at most one",
                T::TABLE
            ))),
        }
    }

    /// Inserts one record and returns it as persisted.
    ///
    /// # Errors
    /// - `Conflict` on a constraint violation (duplicate unique key).
    pub fn add(&self, values: &ValueSet) -> RepoResult<T> {
        self.ensure_known(values.columns())?;
        if values.is_empty() {
            return Err(RepoError::BadRequest(format!(
                "no values provided for new {} row",
                T::TABLE
            )));
        }

        let columns = values.columns().collect::<Vec<_>>().join(", ");
        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING {};",
            T::TABLE,
            select_list::<T>()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values.values()))?;
        match rows.next()? {
            Some(row) => T::from_row(row),
            None => Err(RepoError::InvalidData(format!(
                "insert into {} returned no row",
                T::TABLE
            ))),
        }
    }

    /// Applies the assignments to every record matching the filters.
    ///
    /// Returns the updated records; an empty vec means nothing matched.
    pub fn update(&self, filters: &Filters, values: &ValueSet) -> RepoResult<Vec<T>> {
        self.ensure_known(values.columns())?;
        self.ensure_known(filters.columns())?;
        if values.is_empty() {
            return Err(RepoError::BadRequest(format!(
                "no values provided for {} update",
                T::TABLE
            )));
        }

        let assignments = values
            .columns()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {assignments}", T::TABLE);
        sql.push_str(&where_clause(filters, values.len() + 1));
        sql.push_str(&format!(" RETURNING {};", select_list::<T>()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values.values().chain(filters.values())))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }

    /// Deletes every record matching the filters.
    ///
    /// # Errors
    /// - `BadRequest` when `filters` is empty and `delete_all` is false;
    ///   emptying a table must be asked for explicitly.
    pub fn delete(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<T>> {
        self.ensure_known(filters.columns())?;
        if filters.is_empty() && !delete_all {
            return Err(RepoError::BadRequest(format!(
                "refusing to delete every {} row without delete_all",
                T::TABLE
            )));
        }

        let mut sql = format!("DELETE FROM {}", T::TABLE);
        sql.push_str(&where_clause(filters, 1));
        sql.push_str(&format!(" RETURNING {};", select_list::<T>()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(filters.values()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(Deletion {
            count: records.len(),
            records,
        })
    }
}

fn select_list<T: Table>() -> String {
    T::COLUMNS.join(", ")
}

fn where_clause(filters: &Filters, first_placeholder: usize) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let predicates = filters
        .columns()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", first_placeholder + index))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!(" WHERE {predicates}")
}
