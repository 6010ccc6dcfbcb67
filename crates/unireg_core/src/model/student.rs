//! Student domain model and write-path validation.
//!
//! # Responsibility
//! - Define the canonical student record and the creation draft.
//! - Validate draft field bounds before any SQL runs.
//!
//! # Invariants
//! - `major_id`/`institute_id` are resolved from names at creation time and
//!   stored by id.
//! - A draft that fails `validate()` never reaches the repository layer.

use crate::model::institute::InstituteId;
use crate::model::major::MajorId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate key for student rows.
pub type StudentId = i64;

pub const NAME_MAX_CHARS: usize = 50;
pub const ADDRESS_MIN_CHARS: usize = 10;
pub const ADDRESS_MAX_CHARS: usize = 200;
pub const NOTES_MAX_CHARS: usize = 500;
pub const ENROLLMENT_YEAR_MIN: i64 = 2002;
pub const ENROLLMENT_YEAR_MAX: i64 = 2023;
pub const COURSE_MIN: i64 = 1;
pub const COURSE_MAX: i64 = 5;

static BIRTH_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("birth date pattern is valid"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{1,15}$").expect("phone pattern is valid"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Canonical record for one enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    /// ISO `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub enrollment_year: i64,
    pub course: i64,
    pub special_notes: Option<String>,
    pub major_id: MajorId,
    pub institute_id: InstituteId,
}

/// Creation payload for one student.
///
/// Major and institute are referenced by name; the repository resolves both
/// to ids inside the insert transaction. An explicit `id` is honored only
/// when no row with that id exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub id: Option<StudentId>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub enrollment_year: i64,
    pub course: i64,
    pub special_notes: Option<String>,
    pub major_name: String,
    pub institute_name: String,
}

impl StudentDraft {
    /// Checks every field bound of this draft.
    ///
    /// # Errors
    /// - Returns the first violated bound; the repository maps this into
    ///   its own error type and refuses the insert.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;

        if !BIRTH_DATE_PATTERN.is_match(&self.date_of_birth) {
            return Err(StudentValidationError::BirthDateFormat);
        }
        if !PHONE_PATTERN.is_match(&self.phone_number) {
            return Err(StudentValidationError::PhoneFormat);
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(StudentValidationError::EmailFormat);
        }

        let address_chars = self.address.chars().count();
        if !(ADDRESS_MIN_CHARS..=ADDRESS_MAX_CHARS).contains(&address_chars) {
            return Err(StudentValidationError::AddressLength);
        }
        if !(ENROLLMENT_YEAR_MIN..=ENROLLMENT_YEAR_MAX).contains(&self.enrollment_year) {
            return Err(StudentValidationError::EnrollmentYearRange);
        }
        validate_course(self.course)?;
        if let Some(notes) = &self.special_notes {
            if notes.chars().count() > NOTES_MAX_CHARS {
                return Err(StudentValidationError::NotesTooLong);
            }
        }

        if self.major_name.trim().is_empty() {
            return Err(StudentValidationError::BlankMajorName);
        }
        if self.institute_name.trim().is_empty() {
            return Err(StudentValidationError::BlankInstituteName);
        }

        Ok(())
    }
}

/// Partial update for one student; `None` fields are left untouched.
///
/// Relational fields (major/institute) are deliberately absent: moving a
/// student between majors would desynchronize the denormalized counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub course: Option<i64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub special_notes: Option<String>,
}

/// Field-level violation found while validating a student draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    NameLength { field: &'static str },
    BirthDateFormat,
    PhoneFormat,
    EmailFormat,
    AddressLength,
    EnrollmentYearRange,
    CourseRange,
    NotesTooLong,
    BlankMajorName,
    BlankInstituteName,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameLength { field } => {
                write!(f, "{field} must be 1 to {NAME_MAX_CHARS} characters")
            }
            Self::BirthDateFormat => write!(f, "date_of_birth must be ISO `YYYY-MM-DD`"),
            Self::PhoneFormat => {
                write!(f, "phone_number must start with `+` followed by 1 to 15 digits")
            }
            Self::EmailFormat => write!(f, "email is not a plausible address"),
            Self::AddressLength => write!(
                f,
                "address must be {ADDRESS_MIN_CHARS} to {ADDRESS_MAX_CHARS} characters"
            ),
            Self::EnrollmentYearRange => write!(
                f,
                "enrollment_year must be between {ENROLLMENT_YEAR_MIN} and {ENROLLMENT_YEAR_MAX}"
            ),
            Self::CourseRange => {
                write!(f, "course must be between {COURSE_MIN} and {COURSE_MAX}")
            }
            Self::NotesTooLong => {
                write!(f, "special_notes must be at most {NOTES_MAX_CHARS} characters")
            }
            Self::BlankMajorName => write!(f, "major_name must not be blank"),
            Self::BlankInstituteName => write!(f, "institute_name must not be blank"),
        }
    }
}

impl Error for StudentValidationError {}

/// Checks the course bound shared by drafts and partial updates.
pub fn validate_course(course: i64) -> Result<(), StudentValidationError> {
    if (COURSE_MIN..=COURSE_MAX).contains(&course) {
        Ok(())
    } else {
        Err(StudentValidationError::CourseRange)
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<(), StudentValidationError> {
    let chars = value.chars().count();
    if chars == 0 || chars > NAME_MAX_CHARS {
        return Err(StudentValidationError::NameLength { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{StudentDraft, StudentValidationError};

    fn valid_draft() -> StudentDraft {
        StudentDraft {
            id: None,
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            date_of_birth: "2003-04-17".to_string(),
            phone_number: "+79991234567".to_string(),
            email: "anna.petrova@example.edu".to_string(),
            address: "12 University Embankment, Riverton".to_string(),
            enrollment_year: 2021,
            course: 3,
            special_notes: None,
            major_name: "Engineering".to_string(),
            institute_name: "Institute of Robotics".to_string(),
        }
    }

    #[test]
    fn valid_draft_passes() {
        valid_draft().validate().unwrap();
    }

    #[test]
    fn name_bounds_are_enforced() {
        let mut draft = valid_draft();
        draft.first_name = String::new();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::NameLength {
                field: "first_name"
            }
        );

        let mut draft = valid_draft();
        draft.last_name = "x".repeat(51);
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::NameLength { field: "last_name" }
        );
    }

    #[test]
    fn contact_fields_must_match_expected_shapes() {
        let mut draft = valid_draft();
        draft.date_of_birth = "17.04.2003".to_string();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::BirthDateFormat
        );

        let mut draft = valid_draft();
        draft.phone_number = "79991234567".to_string();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::PhoneFormat
        );

        let mut draft = valid_draft();
        draft.email = "not-an-email".to_string();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::EmailFormat
        );
    }

    #[test]
    fn enrollment_metadata_ranges_are_enforced() {
        let mut draft = valid_draft();
        draft.enrollment_year = 1999;
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::EnrollmentYearRange
        );

        let mut draft = valid_draft();
        draft.course = 6;
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::CourseRange
        );
    }

    #[test]
    fn blank_parent_names_are_rejected() {
        let mut draft = valid_draft();
        draft.major_name = "   ".to_string();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::BlankMajorName
        );

        let mut draft = valid_draft();
        draft.institute_name = String::new();
        assert_eq!(
            draft.validate().unwrap_err(),
            StudentValidationError::BlankInstituteName
        );
    }
}
