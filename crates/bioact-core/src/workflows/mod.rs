//! # Workflows Module
//!
//! End-to-end entry points that drive the engine stages in order.
//!
//! ## Overview
//!
//! A workflow takes raw user input and returns either a complete report or a single
//! classified [`crate::engine::error::PipelineError`]. Resources that are expensive to
//! load (the model and the feature schema) are prepared once in a
//! [`predict::Pipeline`] and reused across runs.
//!
//! ## Architecture
//!
//! - **Prediction Workflow** ([`predict`]) - Parse, validate, compute descriptors,
//!   select the model's features, score and export, with progress events, run-state
//!   tracking and cancellation checks between stages.

pub mod predict;
