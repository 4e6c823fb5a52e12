use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::scoring::score;
use crate::error::ScoringError;

/// One recorded set of resource-consumption metrics.
///
/// Readings are validated on construction and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionReading {
    timestamp: DateTime<Utc>,
    energy: f64,
    water: f64,
    waste: f64,
}

impl ConsumptionReading {
    pub fn new(
        timestamp: DateTime<Utc>,
        energy: f64,
        water: f64,
        waste: f64,
    ) -> Result<Self, ScoringError> {
        for (metric, value) in [("energy", energy), ("water", water), ("waste", waste)] {
            if !value.is_finite() {
                return Err(ScoringError::Validation(format!(
                    "{metric} must be a finite number, got {value}"
                )));
            }
            if value < 0.0 {
                return Err(ScoringError::Validation(format!(
                    "{metric} must not be negative, got {value}"
                )));
            }
        }

        Ok(Self {
            timestamp,
            energy,
            water,
            waste,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn water(&self) -> f64 {
        self.water
    }

    pub fn waste(&self) -> f64 {
        self.waste
    }

    /// Calendar date (UTC) the reading falls on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        score(self.energy, self.water, self.waste)
    }
}

/// Inbound payload for recording a reading.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingSubmission {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
}

impl ReadingSubmission {
    pub fn into_reading(self) -> Result<ConsumptionReading, ScoringError> {
        ConsumptionReading::new(self.timestamp, self.energy, self.water, self.waste)
    }
}

/// Per-metric decay scores and their mean. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub energy_score: f64,
    pub water_score: f64,
    pub waste_score: f64,
    pub overall_score: f64,
}

/// One calendar day's averaged metrics and average per-reading score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    #[serde(rename = "energy")]
    pub mean_energy: f64,
    #[serde(rename = "water")]
    pub mean_water: f64,
    #[serde(rename = "waste")]
    pub mean_waste: f64,
    #[serde(rename = "score")]
    pub mean_score: f64,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 instant, a naive ISO-8601 date-time (taken as UTC), or a
/// bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as an ISO-8601 timestamp"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
