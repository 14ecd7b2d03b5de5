use super::{ModelError, Regressor, check_row_widths};
use rayon::prelude::*;
use serde::Deserialize;

const LEAF: i64 = -1;

/// A single regression tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] == -1`; its prediction is `value[i]`.
/// Otherwise a sample descends to `children_left[i]` when
/// `x[feature[i]] <= threshold[i]` and to `children_right[i]` otherwise.
///
/// A tree can only be evaluated as part of a [`RandomForest`], which checks it against
/// the forest's feature count when it is built.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

/// An averaging ensemble of [`RegressionTree`]s.
///
/// Every forest in existence has passed [`RandomForest::new`], including those read
/// through serde.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(try_from = "RawForest")]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

#[derive(Deserialize)]
struct RawForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl TryFrom<RawForest> for RandomForest {
    type Error = String;

    fn try_from(raw: RawForest) -> Result<Self, Self::Error> {
        Self::new(raw.n_features, raw.trees)
    }
}

impl RegressionTree {
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
    ) -> Self {
        Self {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        }
    }

    /// Checks the structural invariants that make [`RegressionTree::evaluate`] total:
    /// consistent array lengths, in-range feature indices, and children that always
    /// come after their parent (which rules out cycles).
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays have inconsistent lengths".to_string());
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has a right child but no left child", node));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child index {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} but the model has {} features",
                    node, feature, n_features
                ));
            }
        }
        Ok(())
    }

    /// Walks the tree for one row. Only sound for a tree that passed
    /// [`RegressionTree::validate`] and a row of at least `n_features` values.
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return self.value[node];
            }
            let x = row[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

impl RandomForest {
    /// Builds a forest after checking every tree against `n_features`.
    pub fn new(n_features: usize, trees: Vec<RegressionTree>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest contains no trees".to_string());
        }
        for (idx, tree) in trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| format!("tree {}: {}", idx, e))?;
        }
        Ok(Self { n_features, trees })
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        sum / self.trees.len() as f64
    }
}

impl Regressor for RandomForest {
    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        check_row_widths(rows, self.n_features)?;
        Ok(rows.par_iter().map(|row| self.predict_row(row)).collect())
    }
}
