use serde::{Deserialize, Serialize};

use super::common::{argmax, validate_classes, validate_matrix};
use crate::errors::{check_dimensions, check_finite, ModelError};
use crate::registry::Classifier;

/// Linear decision functions, one row of weights per class.
///
/// A two-class model may carry a single row; a positive score then selects
/// the second class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    const NAME: &'static str = "linear";

    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_classes(Self::NAME, &self.classes)?;
        let rows = if self.is_binary() { 1 } else { self.classes.len() };
        validate_matrix(Self::NAME, "coef", &self.coef, rows)?;
        if self.intercept.len() != rows {
            return Err(ModelError::invalid(
                Self::NAME,
                format!("expected {rows} intercepts, found {}", self.intercept.len()),
            ));
        }
        check_finite(Self::NAME, &self.intercept)
    }

    pub fn decision_function(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimensions(Self::NAME, self.n_features(), input)?;
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect();
        check_finite(Self::NAME, &scores)?;
        Ok(scores)
    }
}

impl Classifier for LinearClassifier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or_default()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let scores = self.decision_function(input)?;
        if self.is_binary() {
            let index = usize::from(scores[0] > 0.0);
            return Ok(self.classes[index]);
        }
        argmax(&scores)
            .map(|index| self.classes[index])
            .ok_or_else(|| ModelError::invalid(Self::NAME, "no decision rows"))
    }
}
