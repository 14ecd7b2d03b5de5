//! # Core Module
//!
//! Fundamental data structures, file formats and scoring models used by the
//! prediction pipeline.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Molecule records, descriptor matrices, feature
//!   schemas and prediction results
//! - **File I/O** ([`io`]) - The input text format, the tab-delimited intermediate file
//!   handed to the descriptor tool, descriptor CSV output and the exported payload
//! - **Scoring** ([`scoring`]) - The `Regressor` seam, pluggable model loaders and the
//!   bundled tree-ensemble and linear models
//!
//! Nothing in this module spawns processes or holds state between calls; those
//! concerns belong to [`crate::engine`].

pub mod io;
pub mod models;
pub mod scoring;
