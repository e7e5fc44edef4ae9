//! System abstraction for environment and filesystem operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing the path policy and the generator to be tested with mock implementations.

use std::env::VarError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Permission bits applied to every generated answers file
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Unified trait for system operations (environment + filesystem)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `std::fs` and `dirs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Get the platform temporary directory
    fn temp_dir(&self) -> PathBuf;

    /// Get the user's home directory, if one can be determined
    fn home_dir(&self) -> Option<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create or truncate a file readable and writable only by its owner
    ///
    /// The mode is forced to [`PRIVATE_FILE_MODE`] even when the file already
    /// existed with wider permissions.
    fn create_private(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;
}
