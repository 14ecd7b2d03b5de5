//! # Engine Module
//!
//! The stages of the prediction pipeline and the machinery that drives them.
//!
//! ## Overview
//!
//! Each stage is a small, independently testable unit that consumes the output of the
//! previous one. The only stage with side effects is the descriptor calculation, which
//! sits behind the [`descriptors::DescriptorCalculator`] trait so the external tool can
//! be replaced by an in-process implementation or a mock.
//!
//! ## Architecture
//!
//! - **Validation** ([`validate`]) - Batch-level shape checks on parsed input
//! - **Descriptor Calculation** ([`descriptors`]) - Scoped workspace, subprocess
//!   invocation with timeout and cancellation, and output parsing
//! - **Feature Selection** ([`select`]) - Projection onto the model's feature schema
//! - **Prediction** ([`predict`]) - Scoring through a shared [`crate::core::scoring::Regressor`]
//! - **Configuration** ([`config`]) - Tool, model and export settings
//! - **Run State** ([`state`]) - The linear stage machine of a single run
//! - **Cancellation** ([`cancel`]) - Cooperative cancellation shared with the caller
//! - **Progress Monitoring** ([`progress`]) - Phase events for user feedback
//! - **Error Handling** ([`error`]) - Stage error classification

pub mod cancel;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod predict;
pub mod progress;
pub mod select;
pub mod state;
pub mod validate;
