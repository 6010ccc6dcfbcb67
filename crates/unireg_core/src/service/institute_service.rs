//! Institute use-case service.

use crate::model::institute::{Institute, InstituteId, NewInstitute};
use crate::model::major::MajorId;
use crate::repo::institute_repo::InstituteRepository;
use crate::repo::{Filters, RepoError, RepoResult};

/// Use-case facade for institute administration.
///
/// Institutes are normally seeded by catalog reconciliation; the ad-hoc
/// create/delete entry points exist for administrative corrections.
pub struct InstituteService<R: InstituteRepository> {
    repo: R,
}

impl<R: InstituteRepository> InstituteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_institutes(&self, filters: &Filters) -> RepoResult<Vec<Institute>> {
        self.repo.find_all(filters)
    }

    pub fn list_by_major(&self, major_id: MajorId) -> RepoResult<Vec<Institute>> {
        self.repo.find_by_major(major_id)
    }

    pub fn get_institute(&self, institute_id: InstituteId) -> RepoResult<Institute> {
        self.repo
            .find_one_or_none(&Filters::new().eq("id", institute_id))?
            .ok_or_else(|| RepoError::NotFound(format!("institute with id {institute_id}")))
    }

    /// Creates one institute under an existing major.
    ///
    /// # Errors
    /// - `BadRequest` on a blank name.
    /// - `Conflict` when the name is taken or the major id is dangling.
    pub fn create_institute(&self, new: &NewInstitute) -> RepoResult<Institute> {
        if new.institute_name.trim().is_empty() {
            return Err(RepoError::BadRequest(
                "institute_name must not be blank".to_string(),
            ));
        }
        self.repo.add(new)
    }

    pub fn delete_institute(&self, institute_id: InstituteId) -> RepoResult<Institute> {
        let mut deletion = self
            .repo
            .delete(&Filters::new().eq("id", institute_id), false)?;
        deletion
            .records
            .pop()
            .ok_or_else(|| RepoError::NotFound(format!("institute with id {institute_id}")))
    }
}
