//! Institute domain model.
//!
//! # Invariants
//! - `institute_name` is unique across the table, not just within a major.
//! - Every institute belongs to exactly one major.

use crate::model::major::MajorId;
use serde::{Deserialize, Serialize};

/// Surrogate key for institute rows.
pub type InstituteId = i64;

/// Canonical record for one organizational sub-unit of a major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    pub id: InstituteId,
    pub institute_name: String,
    pub major_id: MajorId,
    /// Denormalized count of students enrolled through this institute.
    pub count_students: i64,
}

/// Input payload for creating one institute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstitute {
    pub institute_name: String,
    pub major_id: MajorId,
}
