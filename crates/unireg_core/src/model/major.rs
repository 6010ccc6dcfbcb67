//! Major (specialty) domain model.
//!
//! # Invariants
//! - `major_name` is unique across the table.
//! - `count_students` mirrors the number of referencing student rows.

use serde::{Deserialize, Serialize};

/// Surrogate key for major rows.
pub type MajorId = i64;

/// Canonical record for one field of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
    pub id: MajorId,
    pub major_name: String,
    pub major_description: Option<String>,
    /// Denormalized count of students enrolled in this major.
    pub count_students: i64,
}

/// Input payload for creating one major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMajor {
    pub major_name: String,
    pub major_description: Option<String>,
}

impl NewMajor {
    pub fn named(major_name: impl Into<String>) -> Self {
        Self {
            major_name: major_name.into(),
            major_description: None,
        }
    }
}

/// Partial update for one major; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorUpdate {
    pub major_name: Option<String>,
    pub major_description: Option<String>,
}
