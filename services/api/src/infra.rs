use chrono::{DateTime, Utc};
use green_score::consumption::ConsumptionReading;
use green_score::storage::{ReadingRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local reading history kept in timestamp order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReadingRepository {
    readings: Arc<Mutex<Vec<ConsumptionReading>>>,
}

impl InMemoryReadingRepository {
    pub(crate) fn with_readings(readings: Vec<ConsumptionReading>) -> Self {
        let repository = Self::default();
        for reading in readings {
            repository.insert_sorted(reading);
        }
        repository
    }

    fn insert_sorted(&self, reading: ConsumptionReading) {
        let mut guard = self.readings.lock().expect("repository mutex poisoned");
        // Equal timestamps keep arrival order so the newest arrival is "latest".
        let index = guard.partition_point(|existing| existing.timestamp() <= reading.timestamp());
        guard.insert(index, reading);
    }
}

impl ReadingRepository for InMemoryReadingRepository {
    fn append(&self, reading: ConsumptionReading) -> Result<(), RepositoryError> {
        self.insert_sorted(reading);
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
