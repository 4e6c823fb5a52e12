use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ScoringError;

pub const FEATURE_COUNT: usize = 10;

/// Column order the imputer, scaler, and model were fitted with. Reordering
/// this list silently corrupts predictions.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "co2_emissions",
    "energy_consumption_kwh",
    "waste_tonnes",
    "safety_score",
    "employee_satisfaction",
    "compliance_score",
    "violations",
    "operational_spend",
    "season_factor",
    "energy_efficiency_trend",
];

pub type FeatureValues = [f64; FEATURE_COUNT];

/// Normalized industry key: trimmed, lowercased, whitespace replaced by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IndustryId(String);

impl IndustryId {
    pub fn normalize(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|ch| if ch.is_whitespace() { '_' } else { ch })
            .collect();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndustryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw record as held by the feature store; may carry extra or missing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub industry: IndustryId,
    pub fields: BTreeMap<String, Option<f64>>,
}

/// Record projected onto the fixed feature schema. `None` marks a value the
/// imputer must fill.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryFeatureVector {
    pub industry: IndustryId,
    pub values: [Option<f64>; FEATURE_COUNT],
}

impl IndustryFeatureVector {
    /// Every schema column must be present; empty cells are allowed.
    pub fn project(record: &FeatureRecord) -> Result<Self, ScoringError> {
        let mut values = [None; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            *slot = *record.fields.get(name).ok_or_else(|| {
                ScoringError::Transform(format!(
                    "feature '{name}' missing for industry '{}'",
                    record.industry
                ))
            })?;
        }

        Ok(Self {
            industry: record.industry.clone(),
            values,
        })
    }
}
