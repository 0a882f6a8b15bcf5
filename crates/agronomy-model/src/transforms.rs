//! Fitted feature transforms applied ahead of the classifier.

use serde::{Deserialize, Serialize};

use crate::errors::{check_dimensions, check_finite, ModelError};

/// A fitted, read-only feature transform.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;
    fn n_features(&self) -> usize;
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Rescales every feature into `feature_range` using the training-time
/// minimum and maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

impl MinMaxScaler {
    const NAME: &'static str = "min_max";

    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self {
            data_min,
            data_max,
            feature_range: default_feature_range(),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.data_min.is_empty() {
            return Err(ModelError::invalid(Self::NAME, "no features"));
        }
        if self.data_min.len() != self.data_max.len() {
            return Err(ModelError::invalid(
                Self::NAME,
                format!(
                    "data_min has {} entries but data_max has {}",
                    self.data_min.len(),
                    self.data_max.len()
                ),
            ));
        }
        check_finite(Self::NAME, &self.data_min)?;
        check_finite(Self::NAME, &self.data_max)?;

        let (lo, hi) = self.feature_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ModelError::invalid(
                Self::NAME,
                format!("feature_range ({lo}, {hi}) must be increasing"),
            ));
        }
        if let Some(index) = self
            .data_min
            .iter()
            .zip(&self.data_max)
            .position(|(min, max)| min > max)
        {
            return Err(ModelError::invalid(
                Self::NAME,
                format!("data_min exceeds data_max for feature {index}"),
            ));
        }
        Ok(())
    }

    fn scale(&self, index: usize) -> f64 {
        let (lo, hi) = self.feature_range;
        let mut width = self.data_max[index] - self.data_min[index];
        if width == 0.0 {
            width = 1.0;
        }
        (hi - lo) / width
    }
}

impl Transform for MinMaxScaler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimensions(Self::NAME, self.n_features(), input)?;
        let lo = self.feature_range.0;
        let output: Vec<f64> = input
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let scale = self.scale(index);
                value * scale + (lo - self.data_min[index] * scale)
            })
            .collect();
        check_finite(Self::NAME, &output)?;
        Ok(output)
    }
}

/// Centres every feature on the training mean and divides by the training
/// standard deviation. A zero scale leaves the centred value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    const NAME: &'static str = "standard";

    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.mean.is_empty() {
            return Err(ModelError::invalid(Self::NAME, "no features"));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::invalid(
                Self::NAME,
                format!(
                    "mean has {} entries but scale has {}",
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        check_finite(Self::NAME, &self.mean)?;
        check_finite(Self::NAME, &self.scale)?;
        if let Some(index) = self.scale.iter().position(|scale| *scale < 0.0) {
            return Err(ModelError::invalid(
                Self::NAME,
                format!("negative scale for feature {index}"),
            ));
        }
        Ok(())
    }
}

impl Transform for StandardScaler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimensions(Self::NAME, self.n_features(), input)?;
        let output: Vec<f64> = input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                let divisor = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / divisor
            })
            .collect();
        check_finite(Self::NAME, &output)?;
        Ok(output)
    }
}

/// On-disk form of a transform, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformArtifact {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl TransformArtifact {
    pub fn from_json(document: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(document).map_err(|source| {
            ModelError::Decode {
                artifact: "transform",
                source,
            }
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            TransformArtifact::MinMax(scaler) => scaler.validate(),
            TransformArtifact::Standard(scaler) => scaler.validate(),
        }
    }

    fn inner(&self) -> &dyn Transform {
        match self {
            TransformArtifact::MinMax(scaler) => scaler,
            TransformArtifact::Standard(scaler) => scaler,
        }
    }
}

impl Transform for TransformArtifact {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.inner().transform(input)
    }
}
