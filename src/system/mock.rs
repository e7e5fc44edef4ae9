//! Mock system implementation for testing

#![expect(clippy::module_name_repetitions)]

use tracing::error;

use super::{PRIVATE_FILE_MODE, System};
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment,
/// perfect for fast, isolated unit tests without side effects.
///
/// # Example
/// ```
/// use answersmith::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user").unwrap()
///     .with_file("/test/file.txt", b"Hello, world!").unwrap()
///     .with_dir("/test/subdir").unwrap();
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert!(system.exists(Path::new("/test/file.txt")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    temp_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    modes: HashMap<PathBuf, u32>,
    read_only: HashSet<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    ///
    /// The working directory is `/` and the temp directory is `/tmp`.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                temp_dir: PathBuf::from("/tmp"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/"), PathBuf::from("/tmp")]),
                modes: HashMap::new(),
                read_only: HashSet::new(),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.env_vars.insert(key.to_owned(), value.to_owned());
        drop(state);
        Ok(self)
    }

    /// Set the current working directory (builder pattern)
    ///
    /// The directory is also created.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &dir);
        state.current_dir = dir;
        drop(state);
        Ok(self)
    }

    /// Set the platform temp directory (builder pattern)
    ///
    /// The directory is also created.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_temp_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &dir);
        state.temp_dir = dir;
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.modes.insert(path_buf.clone(), 0o644);
        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        drop(state);
        Ok(self)
    }

    /// Mark a path as not writable, so creating it fails with `PermissionDenied`
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_read_only<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.read_only.insert(path.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Permission bits of a file in the mock filesystem
    #[must_use]
    #[inline]
    pub fn file_mode(&self, path: &Path) -> Option<u32> {
        let state = self.state.read().ok()?;
        state.modes.get(path).copied()
    }

    /// Resolve a relative path against the mock working directory
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.current_dir()?.join(path))
        }
    }

    fn store(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    #[expect(clippy::map_err_ignore, reason = "This is for VarError")]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn temp_dir(&self) -> PathBuf {
        self.state
            .read()
            .map_or_else(|_| PathBuf::from("/tmp"), |state| state.temp_dir.clone())
    }

    #[inline]
    fn home_dir(&self) -> Option<PathBuf> {
        self.env_var("HOME")
            .ok()
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = self.resolve(path)?;
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(&path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        let Ok(path) = self.resolve(path) else {
            return false;
        };
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(&path) || state.dirs.contains(&path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        let Ok(path) = self.resolve(path) else {
            return false;
        };
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(&path))
    }

    #[inline]
    fn create_private(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let path = self.resolve(path)?;
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if state.read_only.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }
        if state.dirs.contains(&path) {
            return Err(io::Error::other(format!(
                "Is a directory: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        // Truncate up front, like a real create
        state.files.insert(path.clone(), Vec::new());
        state.modes.insert(path.clone(), PRIVATE_FILE_MODE);
        drop(state);

        Ok(Box::new(MockWriter {
            path,
            buffer: Vec::new(),
            system: self.clone(),
        }))
    }
}

/// Custom writer for `MockSystem` that writes to the in-memory filesystem
struct MockWriter {
    path: PathBuf,
    buffer: Vec<u8>,
    system: MockSystem,
}

#[expect(
    clippy::missing_trait_methods,
    reason = "Only implementing what I need"
)]
impl Write for MockWriter {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.system.store(&self.path, &self.buffer)
    }
}

impl Drop for MockWriter {
    #[inline]
    fn drop(&mut self) {
        match self.flush() {
            Ok(()) => (),
            Err(e) => error!("Failed to flush mock writer: {e}"),
        }
    }
}
