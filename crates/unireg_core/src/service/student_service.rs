//! Student use-case service.
//!
//! # Responsibility
//! - Provide registration, lookup, partial update and expulsion entry
//!   points over the student repository.
//!
//! # Invariants
//! - Registration and expulsion delegate counter maintenance to the
//!   repository; the service never touches counters itself.

use crate::model::student::{validate_course, Student, StudentDraft, StudentId, StudentUpdate};
use crate::repo::student_repo::StudentRepository;
use crate::repo::{Filters, RepoError, RepoResult, ValueSet};

/// Use-case facade for student administration.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists students matching the filters; empty filters list everything.
    pub fn list_students(&self, filters: &Filters) -> RepoResult<Vec<Student>> {
        self.repo.find_all(filters)
    }

    /// Returns one student by id.
    pub fn get_student(&self, student_id: StudentId) -> RepoResult<Student> {
        self.repo
            .find_one_or_none(&Filters::new().eq("id", student_id))?
            .ok_or_else(|| RepoError::NotFound(format!("student with id {student_id}")))
    }

    /// Registers one student; counters on the referenced major and
    /// institute move with the insert, atomically.
    pub fn register_student(&mut self, draft: &StudentDraft) -> RepoResult<Student> {
        self.repo.add_student(draft)
    }

    /// Applies a partial update to one student by id.
    ///
    /// Relational fields are not updatable here; see `StudentUpdate`.
    pub fn update_student(
        &self,
        student_id: StudentId,
        update: &StudentUpdate,
    ) -> RepoResult<Student> {
        let mut values = ValueSet::new();
        if let Some(course) = update.course {
            validate_course(course)?;
            values = values.set("course", course);
        }
        if let Some(phone_number) = &update.phone_number {
            values = values.set("phone_number", phone_number.clone());
        }
        if let Some(email) = &update.email {
            values = values.set("email", email.clone());
        }
        if let Some(address) = &update.address {
            values = values.set("address", address.clone());
        }
        if let Some(special_notes) = &update.special_notes {
            values = values.set("special_notes", special_notes.clone());
        }
        if values.is_empty() {
            return Err(RepoError::BadRequest("no fields to update".to_string()));
        }

        let mut updated = self
            .repo
            .update(&Filters::new().eq("id", student_id), &values)?;
        updated
            .pop()
            .ok_or_else(|| RepoError::NotFound(format!("student with id {student_id}")))
    }

    /// Expels (deletes) the single student matching the filters.
    pub fn expel_student(&mut self, filters: &Filters) -> RepoResult<Student> {
        self.repo.delete_student(filters)
    }
}
