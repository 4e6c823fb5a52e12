//! Narrow read/write seams over external storage.
//!
//! The scoring core never talks to a database directly; callers hand it an
//! implementation of these traits (in-memory for the API binary and tests).

use chrono::{DateTime, Utc};

use crate::consumption::ConsumptionReading;
use crate::estimator::{FeatureRecord, IndustryId};

/// Append-only history of consumption readings, ordered by timestamp.
pub trait ReadingRepository: Send + Sync {
    fn append(&self, reading: ConsumptionReading) -> Result<(), RepositoryError>;

    /// Readings with `since <= timestamp <= until`, ascending by timestamp.
    /// Either bound may be omitted.
    fn list(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ConsumptionReading>, RepositoryError>;

    fn latest(&self) -> Result<Option<ConsumptionReading>, RepositoryError>;
}

/// Keyed lookup of the raw per-industry feature records.
pub trait FeatureStore: Send + Sync {
    fn feature_record(&self, industry: &IndustryId)
        -> Result<Option<FeatureRecord>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
