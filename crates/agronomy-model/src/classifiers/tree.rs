use serde::{Deserialize, Serialize};

use super::common::{argmax, validate_classes};
use crate::errors::{check_dimensions, ModelError};
use crate::registry::Classifier;

/// Child index marking a leaf node.
pub const TREE_LEAF: i64 = -1;

/// A fitted decision tree in flat array form.
///
/// Node `i` is a leaf when `children_left[i] == TREE_LEAF`; otherwise samples
/// with `x[feature[i]] <= threshold[i]` descend left. `value[i]` holds the
/// per-class sample counts (or weights) reaching node `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    const NAME: &'static str = "decision_tree";

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_classes(Self::NAME, &self.classes)?;
        if self.n_features == 0 {
            return Err(ModelError::invalid(Self::NAME, "n_features must be positive"));
        }

        let nodes = self.node_count();
        if nodes == 0 {
            return Err(ModelError::invalid(Self::NAME, "tree has no nodes"));
        }
        for (label, len) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if len != nodes {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!("{label} has {len} entries, expected {nodes}"),
                ));
            }
        }

        for node in 0..nodes {
            if self.value[node].len() != self.classes.len() {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!(
                        "node {node} has {} class weights, expected {}",
                        self.value[node].len(),
                        self.classes.len()
                    ),
                ));
            }

            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(ModelError::invalid(
                        Self::NAME,
                        format!("node {node} has a right child but no left child"),
                    ));
                }
                continue;
            }

            // Children always follow their parent; this rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(ModelError::invalid(
                        Self::NAME,
                        format!("node {node} points at invalid child {child}"),
                    ));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= self.n_features {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!("node {node} splits on unknown feature {feature}"),
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!("node {node} has a NaN threshold"),
                ));
            }
        }
        Ok(())
    }

    /// Inputs are rounded to f32 before the split test, matching how fitted
    /// trees evaluate their float32 feature matrix.
    fn leaf_for(&self, input: &[f64]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            let value = f64::from(input[feature] as f32);
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class distribution at the leaf reached by `input`, normalised to sum to one.
    pub fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimensions(Self::NAME, self.n_features, input)?;
        let weights = &self.value[self.leaf_for(input)];
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(ModelError::NonFinite {
                artifact: Self::NAME,
                index: 0,
            });
        }
        Ok(weights.iter().map(|weight| weight / total).collect())
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(input)?;
        argmax(&proba)
            .map(|index| self.classes[index])
            .ok_or_else(|| ModelError::invalid(Self::NAME, "leaf has no class weights"))
    }
}

/// An ensemble of trees sharing one class list; the class with the highest
/// mean leaf probability wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    const NAME: &'static str = "random_forest";

    pub fn validate(&self) -> Result<(), ModelError> {
        let first = self
            .trees
            .first()
            .ok_or_else(|| ModelError::invalid(Self::NAME, "forest has no trees"))?;

        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate()?;
            if tree.classes != first.classes {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!("tree {index} disagrees with tree 0 on the class list"),
                ));
            }
            if tree.n_features != first.n_features {
                return Err(ModelError::invalid(
                    Self::NAME,
                    format!("tree {index} disagrees with tree 0 on n_features"),
                ));
            }
        }
        Ok(())
    }

    pub fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        let mut totals = vec![0.0; self.classes().len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.predict_proba(input)?) {
                *total += p;
            }
        }
        let count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / count).collect())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn n_features(&self) -> usize {
        self.trees.first().map(|tree| tree.n_features).unwrap_or_default()
    }

    fn classes(&self) -> &[i64] {
        self.trees
            .first()
            .map(|tree| tree.classes.as_slice())
            .unwrap_or_default()
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(input)?;
        argmax(&proba)
            .map(|index| self.classes()[index])
            .ok_or_else(|| ModelError::invalid(Self::NAME, "forest has no classes"))
    }
}
