use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::consumption::{
    consumption_router, ConsumptionReading, ConsumptionService, ReadingSubmission,
};
use crate::storage::{ReadingRepository, RepositoryError};

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) readings: Arc<Mutex<Vec<ConsumptionReading>>>,
}

impl ReadingRepository for MemoryRepository {
    fn append(&self, reading: ConsumptionReading) -> Result<(), RepositoryError> {
        let mut guard = self.readings.lock().expect("repository mutex poisoned");
        guard.push(reading);
        guard.sort_by_key(ConsumptionReading::timestamp);
        Ok(())
    }

    fn list(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ConsumptionReading>, RepositoryError> {
        let guard = self.readings.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|reading| since.map_or(true, |since| reading.timestamp() >= since))
            .filter(|reading| until.map_or(true, |until| reading.timestamp() <= until))
            .copied()
            .collect())
    }

    fn latest(&self) -> Result<Option<ConsumptionReading>, RepositoryError> {
        let guard = self.readings.lock().expect("repository mutex poisoned");
        Ok(guard.last().copied())
    }
}

pub(super) struct UnavailableRepository;

impl ReadingRepository for UnavailableRepository {
    fn append(&self, _reading: ConsumptionReading) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn list(
        &self,
        _since: Option<DateTime<Utc>>,
        _until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ConsumptionReading>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn latest(&self) -> Result<Option<ConsumptionReading>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn at(days_ago: i64, hour: u32) -> DateTime<Utc> {
    let today = Utc::now().date_naive();
    let day = today - Duration::days(days_ago);
    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).expect("valid hour"))
}

pub(super) fn fixed(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
}

pub(super) fn submission(
    timestamp: DateTime<Utc>,
    energy: f64,
    water: f64,
    waste: f64,
) -> ReadingSubmission {
    ReadingSubmission {
        timestamp,
        energy,
        water,
        waste,
    }
}

pub(super) fn build_service() -> (ConsumptionService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = ConsumptionService::new(Arc::new(repository.clone()));
    (service, repository)
}

pub(super) fn router_with_service(service: ConsumptionService<MemoryRepository>) -> axum::Router {
    consumption_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json body")
}
