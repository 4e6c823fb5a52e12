use chrono::{DateTime, Utc};

use super::domain::ConsumptionReading;
use super::regression::LinearRegression;
use crate::error::ScoringError;

/// Extrapolation distance past the most recent reading.
pub const PREDICTION_HORIZON_SECS: f64 = 86_400.0;

pub(crate) const NO_DATA: &str = "No consumption data available";

/// Predict the overall score one horizon after the most recent reading.
///
/// `readings` must be ascending by timestamp. With a single reading its own
/// overall score is returned. Otherwise an OLS model over
/// `(timestamp_secs, energy, water, waste) -> overall_score` is fitted on the
/// whole history and evaluated at the last reading's metrics, one horizon
/// later. The result is not clamped and may fall outside
/// `[0, 100]`.
pub fn predict(readings: &[ConsumptionReading]) -> Result<f64, ScoringError> {
    let latest = readings.last().ok_or(ScoringError::NoData(NO_DATA))?;
    if readings.len() < 2 {
        return Ok(latest.breakdown().overall_score);
    }

    let rows: Vec<[f64; 4]> = readings.iter().map(feature_row).collect();
    let targets: Vec<f64> = readings
        .iter()
        .map(|reading| reading.breakdown().overall_score)
        .collect();

    let model = LinearRegression::fit(&rows, &targets).ok_or_else(|| {
        ScoringError::Transform("unable to fit consumption history".to_string())
    })?;

    let mut future = feature_row(latest);
    future[0] += PREDICTION_HORIZON_SECS;

    Ok(model.predict(&future))
}

fn feature_row(reading: &ConsumptionReading) -> [f64; 4] {
    [
        epoch_seconds(reading.timestamp()),
        reading.energy(),
        reading.water(),
        reading.waste(),
    ]
}

fn epoch_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) / 1e9
}
