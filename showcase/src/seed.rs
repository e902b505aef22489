//! Seed fixture: the initial tours and reviews.
//!
//! The stores never hardcode their contents. The bundled fixture ships with
//! the crate; an alternative file can be supplied at start-up.

use crate::error::SeedError;
use crate::types::{Review, Tour};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_SEED: &str = include_str!("../data/seed.json");

/// Initial contents of the catalog and feedback stores
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// Tours in display order
    pub tours: Vec<Tour>,
    /// Reviews, most recent first
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl SeedData {
    /// The fixture bundled with the crate
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the bundled fixture is malformed.
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_SEED)
    }

    /// Parses and validates a fixture
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Parse`] for malformed JSON and
    /// [`SeedError::Invalid`] for records that break a validation rule.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reads, parses and validates a fixture file
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, otherwise as
    /// [`SeedData::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading seed fixture");
        Self::from_json(&json)
    }

    /// Checks every record
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Invalid`] naming the first bad record.
    pub fn validate(&self) -> Result<(), SeedError> {
        for tour in &self.tours {
            tour.validate().map_err(|source| SeedError::Invalid {
                record: format!("tour {}", tour.id),
                source,
            })?;
        }
        for review in &self.reviews {
            review.validate().map_err(|source| SeedError::Invalid {
                record: format!("review {}", review.id),
                source,
            })?;
        }
        Ok(())
    }
}
