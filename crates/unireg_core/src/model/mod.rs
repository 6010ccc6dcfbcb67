//! Domain model for the university registry.
//!
//! # Responsibility
//! - Define the canonical records stored per entity table.
//! - Provide draft/input types and field validation for write paths.
//!
//! # Invariants
//! - Entity identity is the SQLite integer surrogate key.
//! - Denormalized `count_students` values are never negative.

pub mod institute;
pub mod major;
pub mod student;
