//! # bioact Core Library
//!
//! A library for predicting the bioactivity (pIC50) of small molecules against a
//! biological target from their SMILES strings alone.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MoleculeBatch`,
//!   `DescriptorMatrix`, `FeatureSchema`), file formats, and the scoring models that
//!   turn descriptor rows into potency values.
//!
//! - **[`engine`]: The Stages.** Validation, the external descriptor-tool
//!   orchestration, feature selection and prediction, together with configuration,
//!   error classification, progress reporting and cooperative cancellation.
//!
//! - **[`workflows`]: The Public API.** Ties the stages together into the linear
//!   prediction pipeline, from raw input text to a downloadable CSV payload.

pub mod core;
pub mod engine;
pub mod workflows;
