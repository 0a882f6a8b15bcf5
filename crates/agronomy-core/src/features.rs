use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub const FEATURE_COUNT: usize = 7;

/// One of the seven soil and climate measurements, in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Field name used by the HTML form. `Phosporus` is misspelled on
    /// purpose; existing forms post it that way.
    pub fn form_name(&self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen",
            Feature::Phosphorus => "Phosporus",
            Feature::Potassium => "Potassium",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::Ph => "Ph",
            Feature::Rainfall => "Rainfall",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Seven finite measurements in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self> {
        for feature in Feature::ALL {
            let value = values[feature.index()];
            if !value.is_finite() {
                return Err(PipelineError::InvalidValue {
                    field: feature.form_name(),
                    value: value.to_string(),
                });
            }
        }
        Ok(Self(values))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }
}

/// Unparsed form values as they arrived, keyed by feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    fields: [Option<String>; FEATURE_COUNT],
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the seven feature fields out of a decoded form body. Unrelated
    /// fields are ignored.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let mut submission = Self::default();
        for feature in Feature::ALL {
            if let Some(value) = form.get(feature.form_name()) {
                submission.set(feature, value.clone());
            }
        }
        submission
    }

    pub fn with(mut self, feature: Feature, value: impl Into<String>) -> Self {
        self.set(feature, value);
        self
    }

    pub fn set(&mut self, feature: Feature, value: impl Into<String>) {
        self.fields[feature.index()] = Some(value.into());
    }

    pub fn remove(&mut self, feature: Feature) {
        self.fields[feature.index()] = None;
    }

    pub fn get(&self, feature: Feature) -> Option<&str> {
        self.fields[feature.index()].as_deref()
    }

    /// Form names of every absent field, in input order.
    pub fn missing(&self) -> Vec<&'static str> {
        Feature::ALL
            .iter()
            .filter(|feature| self.get(**feature).is_none())
            .map(Feature::form_name)
            .collect()
    }

    /// Checks presence of every field before parsing any of them.
    pub fn parse(&self) -> Result<FeatureVector> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(PipelineError::MissingField { fields: missing });
        }

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            let raw = self.get(feature).unwrap_or_default();
            values[feature.index()] =
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| PipelineError::InvalidValue {
                        field: feature.form_name(),
                        value: raw.to_string(),
                    })?;
        }
        FeatureVector::new(values)
    }
}
