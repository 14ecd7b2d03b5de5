//! # Core Models Module
//!
//! The data that flows through the pipeline, one type per stage boundary:
//!
//! - [`molecule`] - `MoleculeRecord` and the order-significant `MoleculeBatch`
//! - [`descriptors`] - `DescriptorMatrix`, the raw output of the descriptor tool
//! - [`features`] - `FeatureSchema` and the projected `FeatureSubset`
//! - [`prediction`] - `Prediction` and `PredictionResult`
//!
//! Each value is produced by exactly one stage and only read by the stages after it.

pub mod descriptors;
pub mod features;
pub mod molecule;
pub mod prediction;
