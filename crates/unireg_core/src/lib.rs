//! Core domain logic for the unireg university registry.
//! This crate is the single source of truth for registry invariants:
//! counter maintenance, catalog reconciliation and student validation.

pub mod catalog;
pub mod db;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod repo;
pub mod service;

pub use catalog::{Catalog, CatalogError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::institute::{Institute, InstituteId, NewInstitute};
pub use model::major::{Major, MajorId, MajorUpdate, NewMajor};
pub use model::student::{
    Student, StudentDraft, StudentId, StudentUpdate, StudentValidationError,
};
pub use reconcile::{ReconcilePhase, ReconcileReport, Reconciler};
pub use repo::institute_repo::{InstituteRepository, SqliteInstituteRepository};
pub use repo::major_repo::{MajorRepository, SqliteMajorRepository};
pub use repo::records::{Deletion, Records, Table};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentValidation};
pub use repo::{Filters, RepoError, RepoResult, ValueSet};
pub use service::institute_service::InstituteService;
pub use service::major_service::MajorService;
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
