use std::io::{Read, Write};

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::domain::{parse_timestamp, ConsumptionReading};
use crate::error::ScoringError;

pub const EXPORT_FILE_NAME: &str = "consumption_data.csv";

#[derive(Debug, Serialize, Deserialize)]
struct ReadingRow {
    timestamp: String,
    energy: f64,
    water: f64,
    waste: f64,
}

/// Write readings as `timestamp,energy,water,waste` with a header row.
pub fn write_readings_csv<W: Write>(
    readings: &[ConsumptionReading],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for reading in readings {
        csv_writer.serialize(ReadingRow {
            timestamp: reading
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            energy: reading.energy(),
            water: reading.water(),
            waste: reading.waste(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read readings in the export format, sorted ascending by timestamp.
pub fn read_readings_csv<R: Read>(reader: R) -> Result<Vec<ConsumptionReading>, ReadingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut readings = Vec::new();

    for (index, row) in csv_reader.deserialize::<ReadingRow>().enumerate() {
        let row = row?;
        let line = index + 2;
        let timestamp = parse_timestamp(&row.timestamp)
            .map_err(|message| ReadingImportError::Timestamp { line, message })?;
        let reading = ConsumptionReading::new(timestamp, row.energy, row.water, row.waste)
            .map_err(|source| ReadingImportError::Reading { line, source })?;
        readings.push(reading);
    }

    readings.sort_by_key(ConsumptionReading::timestamp);
    Ok(readings)
}

#[derive(Debug, thiserror::Error)]
pub enum ReadingImportError {
    #[error("invalid consumption CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {message}")]
    Timestamp { line: usize, message: String },
    #[error("line {line}: {source}")]
    Reading { line: usize, source: ScoringError },
}
