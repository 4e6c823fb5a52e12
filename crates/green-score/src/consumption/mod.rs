//! Rule-based consumption scoring and the analytics derived from it.

pub mod domain;
pub mod export;
pub mod forecast;
pub mod recommendations;
mod regression;
pub mod router;
pub mod scoring;
pub mod service;
pub mod trend;

#[cfg(test)]
mod tests;

pub use domain::{parse_timestamp, ConsumptionReading, ReadingSubmission, ScoreBreakdown, TrendPoint};
pub use export::{read_readings_csv, write_readings_csv, ReadingImportError};
pub use forecast::{predict, PREDICTION_HORIZON_SECS};
pub use recommendations::recommend;
pub use router::consumption_router;
pub use scoring::{metric_score, score};
pub use service::{ConsumptionService, ConsumptionServiceError, ScoreReport};
pub use trend::{trend, DEFAULT_TREND_WINDOW_DAYS};
