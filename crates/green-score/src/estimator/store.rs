use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::features::{FeatureRecord, IndustryId, FEATURE_NAMES};
use crate::storage::{FeatureStore, RepositoryError};

const INDUSTRY_COLUMN: &str = "industry";

/// Read-only feature store backed by a CSV export with one row per industry.
///
/// The `industry` column is required. Only feature-schema columns are parsed
/// as numbers; any other column (region, notes, codes) is ignored. Empty
/// cells load as missing values.
#[derive(Debug, Clone, Default)]
pub struct CsvFeatureStore {
    records: HashMap<IndustryId, FeatureRecord>,
}

impl CsvFeatureStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FeatureStoreError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FeatureStoreError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let industry_index = headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(INDUSTRY_COLUMN))
            .ok_or(FeatureStoreError::MissingIndustryColumn)?;

        let mut records = HashMap::new();
        for (row_index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let line = row_index + 2;
            let industry = IndustryId::normalize(row.get(industry_index).unwrap_or_default());
            let mut fields = BTreeMap::new();

            for (column, (header, cell)) in headers.iter().zip(row.iter()).enumerate() {
                if column == industry_index || !FEATURE_NAMES.contains(&header) {
                    continue;
                }
                let value = if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<f64>().map_err(|_| FeatureStoreError::InvalidValue {
                        line,
                        column: header.to_string(),
                        value: cell.to_string(),
                    })?)
                };
                fields.insert(header.to_string(), value);
            }

            records.insert(industry.clone(), FeatureRecord { industry, fields });
        }

        Ok(Self { records })
    }

    pub fn insert(&mut self, record: FeatureRecord) {
        self.records.insert(record.industry.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FeatureStore for CsvFeatureStore {
    fn feature_record(
        &self,
        industry: &IndustryId,
    ) -> Result<Option<FeatureRecord>, RepositoryError> {
        Ok(self.records.get(industry).cloned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureStoreError {
    #[error("failed to read feature export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feature CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("feature CSV has no 'industry' column")]
    MissingIndustryColumn,
    #[error("line {line}: column '{column}' holds non-numeric value '{value}'")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
}
