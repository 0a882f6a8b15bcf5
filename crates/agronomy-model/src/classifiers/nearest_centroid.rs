use serde::{Deserialize, Serialize};

use super::common::{validate_classes, validate_matrix};
use crate::errors::{check_dimensions, ModelError};
use crate::registry::Classifier;

/// Assigns the class whose centroid is closest in Euclidean distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    pub classes: Vec<i64>,
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    const NAME: &'static str = "nearest_centroid";

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_classes(Self::NAME, &self.classes)?;
        validate_matrix(Self::NAME, "centroid", &self.centroids, self.classes.len())?;
        Ok(())
    }
}

impl Classifier for NearestCentroid {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.centroids.first().map(Vec::len).unwrap_or_default()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        check_dimensions(Self::NAME, self.n_features(), input)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, centroid) in self.centroids.iter().enumerate() {
            let distance: f64 = centroid
                .iter()
                .zip(input)
                .map(|(c, x)| (x - c) * (x - c))
                .sum();
            if !distance.is_finite() {
                return Err(ModelError::NonFinite {
                    artifact: Self::NAME,
                    index,
                });
            }
            match best {
                Some((_, current)) if distance >= current => {}
                _ => best = Some((index, distance)),
            }
        }

        best.map(|(index, _)| self.classes[index])
            .ok_or_else(|| ModelError::invalid(Self::NAME, "no centroids"))
    }
}
