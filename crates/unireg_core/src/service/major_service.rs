//! Major use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for major administration.
//! - Reject no-op writes before they reach the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - An empty update patch is a caller mistake, not a silent no-op.

use crate::catalog::Catalog;
use crate::model::major::{Major, MajorId, MajorUpdate, NewMajor};
use crate::reconcile::ReconcileReport;
use crate::repo::major_repo::MajorRepository;
use crate::repo::records::Deletion;
use crate::repo::{Filters, RepoError, RepoResult, ValueSet};

/// Use-case facade for major administration.
pub struct MajorService<R: MajorRepository> {
    repo: R,
}

impl<R: MajorRepository> MajorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists majors matching the filters; empty filters list everything.
    pub fn list_majors(&self, filters: &Filters) -> RepoResult<Vec<Major>> {
        self.repo.find_all(filters)
    }

    /// Returns the single major matching the filters.
    pub fn get_major(&self, filters: &Filters) -> RepoResult<Major> {
        self.repo.find_one(filters)
    }

    /// Creates one major.
    ///
    /// # Errors
    /// - `BadRequest` on a blank name.
    /// - `Conflict` when the name is already taken.
    pub fn create_major(&self, new: &NewMajor) -> RepoResult<Major> {
        if new.major_name.trim().is_empty() {
            return Err(RepoError::BadRequest(
                "major_name must not be blank".to_string(),
            ));
        }
        self.repo.add(new)
    }

    /// Applies a partial update to one major by id.
    pub fn update_major(&self, major_id: MajorId, update: &MajorUpdate) -> RepoResult<Major> {
        let mut values = ValueSet::new();
        if let Some(name) = &update.major_name {
            if name.trim().is_empty() {
                return Err(RepoError::BadRequest(
                    "major_name must not be blank".to_string(),
                ));
            }
            values = values.set("major_name", name.clone());
        }
        if let Some(description) = &update.major_description {
            values = values.set("major_description", description.clone());
        }
        if values.is_empty() {
            return Err(RepoError::BadRequest("no fields to update".to_string()));
        }

        let mut updated = self
            .repo
            .update(&Filters::new().eq("id", major_id), &values)?;
        updated
            .pop()
            .ok_or_else(|| RepoError::NotFound(format!("major with id {major_id}")))
    }

    /// Deletes one major by id.
    pub fn delete_major(&self, major_id: MajorId) -> RepoResult<Major> {
        let mut deletion = self
            .repo
            .delete(&Filters::new().eq("id", major_id), false)?;
        deletion
            .records
            .pop()
            .ok_or_else(|| RepoError::NotFound(format!("major with id {major_id}")))
    }

    /// Bulk delete by filters; emptying the table requires `delete_all`.
    pub fn delete_majors(&self, filters: &Filters, delete_all: bool) -> RepoResult<Deletion<Major>> {
        self.repo.delete(filters, delete_all)
    }

    /// Deletes majors in an inclusive id range ("range or all" contract).
    pub fn delete_range(
        &self,
        start_id: Option<MajorId>,
        end_id: Option<MajorId>,
    ) -> RepoResult<Vec<Major>> {
        self.repo.delete_range(start_id, end_id)
    }

    /// Runs one reconciliation pass against the injected catalog.
    pub fn sync_catalog(&mut self, catalog: &Catalog) -> RepoResult<ReconcileReport> {
        self.repo.reconcile(catalog)
    }
}
