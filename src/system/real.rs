//! Real system implementation using `std::env` and `std::fs`

use super::System;
use std::env::VarError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// environment and filesystem functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        match std::env::var("HOME") {
            Ok(home) if !home.is_empty() => Some(PathBuf::from(home)),
            _ => dirs::home_dir(),
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_private(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let file = open_private(path)?;
        Ok(Box::new(file))
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt as _, PermissionsExt as _};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(super::PRIVATE_FILE_MODE)
        .open(path)?;
    // An existing file keeps its old bits through `open`
    file.set_permissions(fs::Permissions::from_mode(super::PRIVATE_FILE_MODE))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    File::create(path)
}
