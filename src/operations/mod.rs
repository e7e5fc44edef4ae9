//! Operations module
//!
//! Template loading and answers file generation

pub mod generate;
pub mod template;

pub use generate::*;
pub use template::*;
