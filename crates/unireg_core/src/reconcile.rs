//! Catalog reconciliation engine.
//!
//! # Responsibility
//! - Diff stored majors/institutes against an injected catalog and apply
//!   the minimal add/delete mutations to converge.
//!
//! # Invariants
//! - Two phases, majors before institutes, never interleaved: a pass that
//!   changes the major set reports and stops before touching institutes.
//! - A doomed major's institute rows are deleted before the major row.
//! - One `IMMEDIATE` transaction per invocation; any failure rolls back
//!   the whole pass.
//! - Re-invocation after convergence reports `synced` with empty deltas.

use crate::catalog::Catalog;
use crate::model::major::MajorId;
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Which table a reconciliation pass acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Majors,
    Institutes,
}

impl Display for ReconcilePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Majors => write!(f, "majors"),
            Self::Institutes => write!(f, "institutes"),
        }
    }
}

/// Delta applied by one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub phase: ReconcilePhase,
    /// True only when the institutes phase ran and found nothing to change.
    pub synced: bool,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

/// One-shot reconciliation over a migrated connection.
pub struct Reconciler<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> Reconciler<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Runs one reconciliation pass and commits its mutations.
    ///
    /// # Contract
    /// - Majors are converged first; institute reconciliation is deferred
    ///   to a subsequent invocation once the major set is stable.
    /// - Returns the delta applied by this pass.
    pub fn run(&mut self, catalog: &Catalog) -> RepoResult<ReconcileReport> {
        catalog
            .validate()
            .map_err(|err| RepoError::BadRequest(err.to_string()))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let report = reconcile_in_tx(&tx, catalog)?;
        tx.commit()?;

        info!(
            "event=catalog_sync module=reconcile status=ok phase={} synced={} added={} deleted={}",
            report.phase,
            report.synced,
            report.added.len(),
            report.deleted.len()
        );
        Ok(report)
    }
}

fn reconcile_in_tx(tx: &Transaction<'_>, catalog: &Catalog) -> RepoResult<ReconcileReport> {
    let db_majors = load_majors(tx)?;
    let listed: BTreeSet<&str> = catalog.major_names().collect();

    let to_add: Vec<&str> = catalog
        .major_names()
        .filter(|name| !db_majors.contains_key(*name))
        .collect();
    let to_delete: Vec<(&String, MajorId)> = db_majors
        .iter()
        .filter(|(name, _)| !listed.contains(name.as_str()))
        .map(|(name, id)| (name, *id))
        .collect();

    if !to_add.is_empty() || !to_delete.is_empty() {
        for (_, major_id) in &to_delete {
            tx.execute("DELETE FROM institutes WHERE major_id = ?1;", [major_id])?;
            tx.execute("DELETE FROM majors WHERE id = ?1;", [major_id])?;
        }
        for name in &to_add {
            tx.execute("INSERT INTO majors (major_name) VALUES (?1);", [name])?;
        }

        return Ok(ReconcileReport {
            phase: ReconcilePhase::Majors,
            synced: false,
            added: to_add.iter().map(|name| name.to_string()).collect(),
            deleted: to_delete.iter().map(|(name, _)| name.to_string()).collect(),
        });
    }

    // Major set is stable; converge institutes per major, in catalog order.
    let mut added = Vec::new();
    let mut deleted = Vec::new();

    for (major_name, institutes) in catalog.entries() {
        let major_id = *db_majors.get(major_name).ok_or_else(|| {
            RepoError::InvalidData(format!("major `{major_name}` vanished mid-pass"))
        })?;

        let db_institutes = load_institutes_of(tx, major_id)?;
        let listed: BTreeSet<&str> = institutes.iter().map(String::as_str).collect();

        for (institute_name, institute_id) in &db_institutes {
            if !listed.contains(institute_name.as_str()) {
                tx.execute("DELETE FROM institutes WHERE id = ?1;", [institute_id])?;
                deleted.push(institute_name.clone());
            }
        }
        for institute_name in institutes {
            if !db_institutes.contains_key(institute_name) {
                tx.execute(
                    "INSERT INTO institutes (institute_name, major_id) VALUES (?1, ?2);",
                    rusqlite::params![institute_name, major_id],
                )?;
                added.push(institute_name.clone());
            }
        }
    }

    Ok(ReconcileReport {
        phase: ReconcilePhase::Institutes,
        synced: added.is_empty() && deleted.is_empty(),
        added,
        deleted,
    })
}

fn load_majors(tx: &Transaction<'_>) -> RepoResult<BTreeMap<String, MajorId>> {
    let mut stmt = tx.prepare("SELECT major_name, id FROM majors;")?;
    let mut rows = stmt.query([])?;
    let mut majors = BTreeMap::new();
    while let Some(row) = rows.next()? {
        majors.insert(row.get::<_, String>(0)?, row.get::<_, MajorId>(1)?);
    }
    Ok(majors)
}

fn load_institutes_of(
    tx: &Transaction<'_>,
    major_id: MajorId,
) -> RepoResult<BTreeMap<String, i64>> {
    let mut stmt = tx.prepare("SELECT institute_name, id FROM institutes WHERE major_id = ?1;")?;
    let mut rows = stmt.query([major_id])?;
    let mut institutes = BTreeMap::new();
    while let Some(row) = rows.next()? {
        institutes.insert(row.get::<_, String>(0)?, row.get::<_, i64>(1)?);
    }
    Ok(institutes)
}
