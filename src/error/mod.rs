//! Error handling module
//!
//! Defines the error taxonomy of answer file generation with exit codes

pub mod types;

pub use types::*;
