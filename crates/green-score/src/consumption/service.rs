use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{ConsumptionReading, ReadingSubmission, ScoreBreakdown, TrendPoint};
use super::export::write_readings_csv;
use super::forecast::{self, NO_DATA};
use super::recommendations::recommend;
use super::trend::{self, DEFAULT_TREND_WINDOW_DAYS};
use crate::error::ScoringError;
use crate::storage::{ReadingRepository, RepositoryError};

/// Service composing the reading repository with the scoring core.
pub struct ConsumptionService<R> {
    repository: Arc<R>,
    trend_window_days: u32,
}

/// Latest reading together with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub timestamp: DateTime<Utc>,
    pub data: ReadingValues,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingValues {
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
}

impl<R> ConsumptionService<R>
where
    R: ReadingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_trend_window(repository, DEFAULT_TREND_WINDOW_DAYS)
    }

    pub fn with_trend_window(repository: Arc<R>, trend_window_days: u32) -> Self {
        Self {
            repository,
            trend_window_days,
        }
    }

    pub fn trend_window_days(&self) -> u32 {
        self.trend_window_days
    }

    /// Validate and record a reading.
    pub fn submit(
        &self,
        submission: ReadingSubmission,
    ) -> Result<ConsumptionReading, ConsumptionServiceError> {
        let reading = submission.into_reading()?;
        self.repository.append(reading)?;
        info!(timestamp = %reading.timestamp(), "consumption reading recorded");
        Ok(reading)
    }

    /// Breakdown of the most recent reading.
    pub fn latest_score(&self) -> Result<ScoreReport, ConsumptionServiceError> {
        let latest = self.latest()?;
        Ok(ScoreReport {
            timestamp: latest.timestamp(),
            data: ReadingValues {
                energy: latest.energy(),
                water: latest.water(),
                waste: latest.waste(),
            },
            score: latest.breakdown(),
        })
    }

    /// Daily trend over the configured window ending at `now`.
    pub fn trend(&self, now: DateTime<Utc>) -> Result<Vec<TrendPoint>, ConsumptionServiceError> {
        let since = now - Duration::days(i64::from(self.trend_window_days));
        let readings = self.repository.list(Some(since), Some(now))?;
        let points = trend::trend(&readings, now, self.trend_window_days)?;
        info!(
            readings = readings.len(),
            days = points.len(),
            "trend aggregated"
        );
        Ok(points)
    }

    /// Advisory messages for the most recent reading.
    pub fn recommendations(&self) -> Result<Vec<&'static str>, ConsumptionServiceError> {
        let latest = self.latest()?;
        Ok(recommend(&latest.breakdown()))
    }

    /// Next-day score extrapolated from the full history.
    pub fn predict(&self) -> Result<f64, ConsumptionServiceError> {
        let readings = self.repository.list(None, None)?;
        let predicted = forecast::predict(&readings)?;
        info!(readings = readings.len(), predicted, "score predicted");
        Ok(predicted)
    }

    /// Full history rendered as CSV.
    pub fn export_csv(&self) -> Result<Vec<u8>, ConsumptionServiceError> {
        let readings = self.repository.list(None, None)?;
        if readings.is_empty() {
            return Err(ScoringError::NoData(NO_DATA).into());
        }

        let mut buffer = Vec::new();
        write_readings_csv(&readings, &mut buffer)?;
        Ok(buffer)
    }

    fn latest(&self) -> Result<ConsumptionReading, ConsumptionServiceError> {
        let latest = self
            .repository
            .latest()?
            .ok_or(ScoringError::NoData(NO_DATA))?;
        Ok(latest)
    }
}

/// Error raised by the consumption service.
#[derive(Debug, thiserror::Error)]
pub enum ConsumptionServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to render CSV export: {0}")]
    Export(#[from] csv::Error),
}
