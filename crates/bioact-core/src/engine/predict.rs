use crate::core::models::features::FeatureSubset;
use crate::core::models::molecule::MoleculeBatch;
use crate::core::models::prediction::{Prediction, PredictionResult};
use crate::core::scoring::{ModelError, ModelLoader, Regressor};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Scores feature subsets with a loaded model.
///
/// The model is held behind an `Arc` and never mutated, so one engine can be cloned
/// into any number of runs.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    model: Arc<dyn Regressor>,
}

impl PredictionEngine {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model }
    }

    pub fn load(loader: &dyn ModelLoader, path: &Path) -> Result<Self, ModelError> {
        let model = loader.load(path)?;
        debug!(path = %path.display(), features = ?model.n_features(), "Prediction engine ready");
        Ok(Self::new(model))
    }

    pub fn model(&self) -> &Arc<dyn Regressor> {
        &self.model
    }

    /// Scores every row of `subset` and pairs the scores with the batch names.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InferenceFailed`] when the subset does not have one row per
    /// molecule, when its width differs from the model's feature count, when any
    /// feature is not finite, or when the model returns the wrong number of scores.
    pub fn predict(
        &self,
        batch: &MoleculeBatch,
        subset: &FeatureSubset,
    ) -> Result<PredictionResult, ModelError> {
        if subset.n_rows() != batch.len() {
            return Err(ModelError::InferenceFailed(format!(
                "feature subset has {} row(s) for {} molecule(s)",
                subset.n_rows(),
                batch.len()
            )));
        }
        if let Some(expected) = self.model.n_features() {
            if subset.n_columns() != expected {
                return Err(ModelError::InferenceFailed(format!(
                    "feature subset has {} column(s) but the model expects {}",
                    subset.n_columns(),
                    expected
                )));
            }
        }
        check_finite(batch, subset)?;

        let scores = self.model.predict(&subset.rows)?;
        if scores.len() != batch.len() {
            return Err(ModelError::InferenceFailed(format!(
                "model returned {} score(s) for {} molecule(s)",
                scores.len(),
                batch.len()
            )));
        }
        debug!(count = scores.len(), "Scored feature rows");

        Ok(PredictionResult::new(
            batch
                .iter()
                .zip(scores)
                .map(|(record, score)| Prediction {
                    name: record.name.clone(),
                    score,
                })
                .collect(),
        ))
    }
}

fn check_finite(batch: &MoleculeBatch, subset: &FeatureSubset) -> Result<(), ModelError> {
    for (record, row) in batch.iter().zip(&subset.rows) {
        if let Some(col) = row.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::InferenceFailed(format!(
                "descriptor '{}' of molecule '{}' is not a finite number ({})",
                subset.columns[col], record.name, row[col]
            )));
        }
    }
    Ok(())
}
