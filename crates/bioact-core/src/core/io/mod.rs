//! Readers and writers for the file formats the pipeline touches.
//!
//! Input text is parsed by [`input`], the descriptor tool's intermediate input is
//! written by [`smi`], its CSV output is read by [`descriptors`], and results are
//! encoded for download by [`export`].

pub mod descriptors;
pub mod export;
pub mod input;
pub mod smi;
