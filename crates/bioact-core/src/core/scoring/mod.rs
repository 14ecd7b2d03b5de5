//! # Scoring Module
//!
//! The boundary between the pipeline and a pretrained potency model.
//!
//! ## Overview
//!
//! The pipeline treats a model as an opaque artifact exposing a single operation,
//! `predict(rows) -> scores`, captured by the [`Regressor`] trait. How the artifact is
//! stored and deserialized is the job of a [`ModelLoader`], so a deployment can plug in
//! its own format and test suites can substitute a deterministic stub.
//!
//! ## Bundled Models
//!
//! - [`forest::RandomForest`] - A regression tree ensemble in the flat node-array
//!   layout used by common tree learners; the prediction is the mean over trees
//! - [`linear::LinearModel`] - Coefficients and an intercept
//!
//! Both are read from JSON by [`loader::JsonModelLoader`].

pub mod forest;
pub mod linear;
pub mod loader;

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to load model artifact '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

/// A pretrained model mapping rows of numeric features to potency scores.
///
/// Implementations must be immutable once loaded so a single instance can be shared
/// between concurrent pipeline runs.
pub trait Regressor: Send + Sync + std::fmt::Debug {
    /// The number of features each row must carry, if the model knows it.
    fn n_features(&self) -> Option<usize>;

    /// Scores every row, returning exactly one value per row in row order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InferenceFailed`] if a row does not match the model's
    /// expected shape.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError>;
}

/// Deserializes a [`Regressor`] from a stored artifact.
pub trait ModelLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Regressor>, ModelError>;
}

pub(crate) fn check_row_widths(rows: &[Vec<f64>], expected: usize) -> Result<(), ModelError> {
    match rows.iter().position(|row| row.len() != expected) {
        Some(idx) => Err(ModelError::InferenceFailed(format!(
            "row {} has {} features but the model expects {}",
            idx,
            rows[idx].len(),
            expected
        ))),
        None => Ok(()),
    }
}
