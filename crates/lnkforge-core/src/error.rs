//! Error types for lnkforge.
//!
//! Errors are grouped by the stage that produces them so callers can tell a
//! validation problem from an I/O failure, a partial success, or a refused
//! elevation without string matching.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::CliExitCode;

/// The step of [`ShortcutBuilder::build`](crate::shortcut::ShortcutBuilder::build)
/// during which a write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Producing the artifact itself.
    Construct,
    /// Setting the elevate-on-launch bit on an existing artifact.
    Patch,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePhase::Construct => f.write_str("construct"),
            WritePhase::Patch => f.write_str("patch"),
        }
    }
}

/// Errors raised while producing an artifact.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Shortcut name must not be empty")]
    EmptyName,

    #[error("Shortcut target must not be empty")]
    EmptyTarget,

    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write failed during {phase} at {path:?}: {source}")]
    WriteFailed {
        phase: WritePhase,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact is too small to patch ({len} bytes)")]
    PatchTooSmall { len: usize },
}

impl BuildError {
    /// True when the artifact exists and is usable but lacks the
    /// elevate-on-launch flag.
    pub fn is_partial_success(&self) -> bool {
        matches!(
            self,
            BuildError::PatchTooSmall { .. }
                | BuildError::WriteFailed {
                    phase: WritePhase::Patch,
                    ..
                }
        )
    }

    /// True for failures detected before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, BuildError::EmptyName | BuildError::EmptyTarget)
    }
}

/// Errors raised while mapping a location choice to a directory.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("No destination folder selected")]
    NoDestinationSelected,

    #[error("Could not determine the {folder} folder")]
    FolderUnavailable { folder: &'static str },

    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the out-of-process elevation path.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// The user declined the consent prompt (or was not authorized).
    #[error("Elevation was declined")]
    Denied,

    /// The helper could not be launched, or it ran and reported failure.
    #[error("Elevated creation failed: {message}")]
    Failed {
        message: String,
        /// Exit status of the helper, when it ran at all.
        exit_code: Option<i32>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The spec was rejected before anything was launched.
    #[error("Invalid shortcut: {0}")]
    InvalidSpec(#[source] BuildError),

    /// The destination could not be determined.
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl ElevationError {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        ElevationError::Failed {
            message: message.into(),
            exit_code: None,
            source: None,
        }
    }

    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        ElevationError::Failed {
            message: message.into(),
            exit_code: None,
            source: Some(source),
        }
    }

    /// Process exit code a front end should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ElevationError::Denied => CliExitCode::ELEVATION_DENIED,
            ElevationError::Failed { .. } => CliExitCode::ELEVATION_FAILED,
            ElevationError::InvalidSpec(_) => CliExitCode::INVALID_REQUEST,
            ElevationError::Location(LocationError::NoDestinationSelected) => {
                CliExitCode::INVALID_REQUEST
            }
            ElevationError::Location(_) => CliExitCode::BUILD_FAILED,
        }
    }
}

/// Errors returned by [`ShortcutEngine::create_shortcut`](crate::ShortcutEngine::create_shortcut).
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    /// The destination needs elevated rights this process does not have.
    /// The caller decides whether to go through the elevated path.
    #[error("Writing to {directory:?} requires administrator privileges")]
    ElevationRequired { directory: PathBuf },
}

impl CreateError {
    /// Process exit code a front end should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CreateError::Location(LocationError::NoDestinationSelected) => {
                CliExitCode::INVALID_REQUEST
            }
            CreateError::Build(e) if e.is_validation() => CliExitCode::INVALID_REQUEST,
            CreateError::ElevationRequired { .. } => CliExitCode::ELEVATION_REQUIRED,
            _ => CliExitCode::BUILD_FAILED,
        }
    }
}

/// Errors raised while decoding an elevation request inside the helper.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Payload is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Payload is not a valid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported request format version {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn test_partial_success_classification() {
        assert!(BuildError::PatchTooSmall { len: 10 }.is_partial_success());
        assert!(BuildError::WriteFailed {
            phase: WritePhase::Patch,
            path: PathBuf::from("a.lnk"),
            source: io_err(),
        }
        .is_partial_success());
        assert!(!BuildError::WriteFailed {
            phase: WritePhase::Construct,
            path: PathBuf::from("a.lnk"),
            source: io_err(),
        }
        .is_partial_success());
        assert!(!BuildError::EmptyName.is_partial_success());
    }

    #[test]
    fn test_error_display() {
        let err = BuildError::WriteFailed {
            phase: WritePhase::Patch,
            path: PathBuf::from("a.lnk"),
            source: io_err(),
        };
        assert!(err.to_string().contains("during patch"));
        assert_eq!(
            LocationError::NoDestinationSelected.to_string(),
            "No destination folder selected"
        );
    }

    #[test]
    fn test_exit_codes_distinguish_denied_from_failed() {
        assert_ne!(
            ElevationError::Denied.exit_code(),
            ElevationError::failed("boom").exit_code()
        );
        assert_eq!(
            CreateError::from(BuildError::EmptyTarget).exit_code(),
            CreateError::from(LocationError::NoDestinationSelected).exit_code()
        );
    }

    #[test]
    fn test_exit_codes_come_from_cli_table() {
        assert_eq!(ElevationError::Denied.exit_code(), CliExitCode::ELEVATION_DENIED);
        assert_eq!(
            ElevationError::failed("boom").exit_code(),
            CliExitCode::ELEVATION_FAILED
        );
        assert_eq!(
            ElevationError::from(LocationError::NoDestinationSelected).exit_code(),
            CliExitCode::INVALID_REQUEST
        );
        assert_eq!(
            CreateError::ElevationRequired {
                directory: PathBuf::from("C:\\ProgramData")
            }
            .exit_code(),
            CliExitCode::ELEVATION_REQUIRED
        );
        assert_eq!(
            CreateError::from(BuildError::PatchTooSmall { len: 1 }).exit_code(),
            CliExitCode::BUILD_FAILED
        );
    }
}
