use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::domain::{ConsumptionReading, TrendPoint};
use crate::error::ScoringError;

pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;

pub(crate) const NO_TREND_DATA: &str = "No consumption data available for trend analysis";

#[derive(Default)]
struct DailyTotals {
    energy: f64,
    water: f64,
    waste: f64,
    score: f64,
    count: usize,
}

impl DailyTotals {
    fn add(&mut self, reading: &ConsumptionReading) {
        self.energy += reading.energy();
        self.water += reading.water();
        self.waste += reading.waste();
        // Score each reading before averaging; scoring the averaged metrics
        // gives a different answer once any metric floors at zero.
        self.score += reading.breakdown().overall_score;
        self.count += 1;
    }

    fn into_point(self, date: NaiveDate) -> TrendPoint {
        let count = self.count as f64;
        TrendPoint {
            date,
            mean_energy: self.energy / count,
            mean_water: self.water / count,
            mean_waste: self.waste / count,
            mean_score: self.score / count,
        }
    }
}

/// Per-day averages over readings inside `[now - window_days, now]`,
/// ascending by date.
pub fn trend(
    readings: &[ConsumptionReading],
    now: DateTime<Utc>,
    window_days: u32,
) -> Result<Vec<TrendPoint>, ScoringError> {
    let start = now - Duration::days(i64::from(window_days));
    let mut days: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();

    for reading in readings
        .iter()
        .filter(|reading| reading.timestamp() >= start && reading.timestamp() <= now)
    {
        days.entry(reading.date()).or_default().add(reading);
    }

    if days.is_empty() {
        return Err(ScoringError::NoData(NO_TREND_DATA));
    }

    Ok(days
        .into_iter()
        .map(|(date, totals)| totals.into_point(date))
        .collect())
}
