//! Custom error types with exit codes

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the configuration, path and generation layers
pub type Result<T, E = AnswersError> = core::result::Result<T, E>;

/// Main error type for answersmith operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnswersError {
    /// A required configuration field was blank
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// Filesystem read or stat failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// SSH public key content lacks the `ssh-` prefix
    #[error("invalid SSH public key format: {}", path.display())]
    InvalidSshKeyFormat { path: PathBuf },

    /// Output path rejected by the allow-list or deny-list
    #[error("invalid output path: output path not allowed: {path}")]
    PathNotAllowed { path: String },

    /// Parent directory of the output path does not exist
    #[error("parent directory does not exist: {}", parent.display())]
    ParentMissing { parent: PathBuf },

    /// Parent of the output path exists but is not a directory
    #[error("parent path is not a directory: {}", parent.display())]
    ParentNotADirectory { parent: PathBuf },

    /// Template missing, unreadable or syntactically invalid
    #[error("failed to parse template {}: {message}", path.display())]
    TemplateParse { path: PathBuf, message: String },

    /// Template rendering failed
    #[error("failed to execute template: {message}")]
    TemplateExecution {
        field: Option<String>,
        message: String,
    },

    /// Output file could not be created or restricted
    #[error("failed to create output file {}: {source}", path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file missing or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AnswersError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::EmptyField { .. }
            | Self::InvalidSshKeyFormat { .. }
            | Self::Configuration { .. } => 1,
            Self::PathNotAllowed { .. }
            | Self::ParentMissing { .. }
            | Self::ParentNotADirectory { .. } => 2,
            Self::TemplateParse { .. } | Self::TemplateExecution { .. } => 3,
            Self::Io { .. } | Self::FileCreate { .. } => 4,
        }
    }

    /// Create an I/O error with the operation that failed
    #[inline]
    pub fn io<S: Into<String>>(context: S, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an output path rejection
    #[inline]
    pub fn path_not_allowed<S: Into<String>>(path: S) -> Self {
        Self::PathNotAllowed { path: path.into() }
    }

    /// Whether this error came from the output path policy
    #[must_use]
    #[inline]
    pub const fn is_path_error(&self) -> bool {
        matches!(
            *self,
            Self::PathNotAllowed { .. }
                | Self::ParentMissing { .. }
                | Self::ParentNotADirectory { .. }
        )
    }
}
