//! Reference enumeration of majors and their institutes.
//!
//! # Responsibility
//! - Carry the ordered major -> institute-names mapping that the
//!   reconciliation engine converges the database toward.
//!
//! # Invariants
//! - Major names are unique by construction (map keys) and non-blank.
//! - Institute names are non-blank and unique across the whole catalog,
//!   matching the table-level unique constraint.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered mapping from major name to its institute names.
///
/// Injected into the reconciliation engine rather than compiled in, so
/// tests and deployments can supply arbitrary fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    majors: IndexMap<String, Vec<String>>,
}

/// Structural violation found while validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    BlankMajorName,
    BlankInstituteName { major: String },
    DuplicateInstituteName { institute: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankMajorName => write!(f, "catalog contains a blank major name"),
            Self::BlankInstituteName { major } => {
                write!(f, "major `{major}` lists a blank institute name")
            }
            Self::DuplicateInstituteName { institute } => {
                write!(f, "institute `{institute}` is listed under more than one major")
            }
        }
    }
}

impl Error for CatalogError {}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one major and its institutes, keeping insertion order.
    ///
    /// Re-adding an existing major replaces its institute list.
    pub fn with_major<I, S>(mut self, major: impl Into<String>, institutes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.majors.insert(
            major.into(),
            institutes.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.majors.len()
    }

    pub fn contains_major(&self, name: &str) -> bool {
        self.majors.contains_key(name)
    }

    pub fn major_names(&self) -> impl Iterator<Item = &str> {
        self.majors.keys().map(String::as_str)
    }

    pub fn institutes_of(&self, major: &str) -> Option<&[String]> {
        self.majors.get(major).map(Vec::as_slice)
    }

    /// Iterates entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.majors
            .iter()
            .map(|(major, institutes)| (major.as_str(), institutes.as_slice()))
    }

    /// Checks the structural invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen_institutes = BTreeSet::new();
        for (major, institutes) in &self.majors {
            if major.trim().is_empty() {
                return Err(CatalogError::BlankMajorName);
            }
            for institute in institutes {
                if institute.trim().is_empty() {
                    return Err(CatalogError::BlankInstituteName {
                        major: major.clone(),
                    });
                }
                if !seen_institutes.insert(institute.as_str()) {
                    return Err(CatalogError::DuplicateInstituteName {
                        institute: institute.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The university's default enumeration.
    pub fn builtin() -> Self {
        Self::new()
            .with_major(
                "Economics",
                ["Institute of Finance", "Institute of World Economy"],
            )
            .with_major("Law", ["Institute of Public Law"])
            .with_major(
                "Engineering",
                ["Institute of Robotics", "Institute of Civil Engineering"],
            )
            .with_major("Languages", ["Institute of Linguistics"])
            .with_major("Psychology", Vec::<String>::new())
            .with_major(
                "Informatics",
                ["Institute of Computer Science", "Institute of Applied Mathematics"],
            )
            .with_major("Medicine", ["Institute of Clinical Medicine"])
    }
}
