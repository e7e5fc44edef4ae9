//! Path normalization and output path policy

use crate::error::{AnswersError, Result};
use crate::system::System;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Directory under the user's home that generated files may be written to
pub const HOME_SUBDIR: &str = "answersmith";

/// Roots a traversing path must never land in
const DENIED_ROOTS: &[&str] = &["/etc/", "/usr/", "/boot/", "/root/"];

/// `/var/` is denied except for the macOS per-user temp area below it
const DENIED_VAR: &str = "/var/";
const VAR_TEMP_EXCEPTION: &str = "/var/folders/";

/// Literal temp prefixes accepted when no allow-list entry matched
const TEMP_PATTERNS: &[&str] = &["/var/folders/", "/tmp/"];

/// Normalize a path lexically by resolving `.` and `..` components
///
/// `..` directly below the root is dropped, leading `..` of a relative path
/// is kept, and an empty result becomes `.`.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }

    components.iter().collect()
}

/// Convert backslashes to forward slashes
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Whether a cleaned path still climbs out of its starting directory
#[must_use]
pub fn has_traversal(cleaned: &Path) -> bool {
    cleaned
        .components()
        .any(|component| component == Component::ParentDir)
}

/// Resolve a path against the working directory and clean it
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined
pub fn absolute(system: &dyn System, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }

    let cwd = system
        .current_dir()
        .map_err(|source| AnswersError::io("invalid path", source))?;
    Ok(clean(&cwd.join(path)))
}

/// Find the denied root a slash-normalized absolute path falls into
///
/// The path must end with `/` so that the final segment is matched too.
#[must_use]
pub fn denied_root(normalized: &str) -> Option<&'static str> {
    if let Some(root) = DENIED_ROOTS
        .iter()
        .copied()
        .find(|root| normalized.contains(root))
    {
        return Some(root);
    }

    if normalized.contains(DENIED_VAR) && !normalized.contains(VAR_TEMP_EXCEPTION) {
        return Some(DENIED_VAR);
    }

    None
}

/// Directories an absolute output path may be written below
///
/// Entries that cannot be resolved are skipped.
#[must_use]
pub fn allowed_prefixes(system: &dyn System) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("/tmp/"), system.temp_dir()];

    if let Some(home) = system.home_dir() {
        candidates.push(home.join(HOME_SUBDIR));
    }

    candidates.push(PathBuf::from("."));

    if let Ok(tmpdir) = system.env_var("TMPDIR")
        && !tmpdir.is_empty()
    {
        candidates.push(PathBuf::from(tmpdir));
    }

    candidates
        .iter()
        .filter_map(|candidate| absolute(system, candidate).ok())
        .collect()
}

/// Ensure an output path is safe to write to
///
/// Paths that climb with `..` are rejected only when they land in a sensitive
/// system root. Plain relative paths are always accepted. Absolute paths must be
/// below an allowed prefix and their parent must be an existing directory.
///
/// # Errors
///
/// Returns an error if:
/// - The path is outside the allowed locations (`PathNotAllowed`)
/// - The parent directory does not exist (`ParentMissing`)
/// - The parent path is not a directory (`ParentNotADirectory`)
/// - The working directory cannot be determined (`Io`)
pub fn validate_output_path(system: &dyn System, path: &Path) -> Result<()> {
    let cleaned = clean(path);
    let abs_path = absolute(system, &cleaned)?;

    if has_traversal(&cleaned) {
        let normalized = format!("{}/", to_slash(&abs_path));
        if let Some(root) = denied_root(&normalized) {
            warn!(
                "Rejected output path {} (resolves into {root})",
                path.display()
            );
            return Err(AnswersError::path_not_allowed(path.display().to_string()));
        }
        // TODO: traversing paths skip the allow-list that absolute paths get;
        // decide whether they should be checked against it too.
        debug!("Accepted traversing output path {}", abs_path.display());
        return Ok(());
    }

    if !cleaned.is_absolute() {
        debug!("Accepted relative output path {}", cleaned.display());
        return Ok(());
    }

    let prefixes = allowed_prefixes(system);
    let matched = prefixes.iter().find(|prefix| abs_path.starts_with(prefix));

    match matched {
        Some(prefix) => debug!(
            "Output path {} is below allowed prefix {}",
            abs_path.display(),
            prefix.display()
        ),
        None => {
            let slashed = to_slash(&abs_path);
            if !TEMP_PATTERNS
                .iter()
                .any(|pattern| slashed.starts_with(pattern))
            {
                warn!("Rejected output path {}", path.display());
                return Err(AnswersError::path_not_allowed(path.display().to_string()));
            }
            debug!("Output path {} matches a temp pattern", abs_path.display());
        }
    }

    let parent = abs_path.parent().unwrap_or_else(|| Path::new("/"));
    if !system.exists(parent) {
        return Err(AnswersError::ParentMissing {
            parent: parent.to_path_buf(),
        });
    }
    if !system.is_dir(parent) {
        return Err(AnswersError::ParentNotADirectory {
            parent: parent.to_path_buf(),
        });
    }

    Ok(())
}
