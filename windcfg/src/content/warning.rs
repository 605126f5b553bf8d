//! Non-fatal diagnostics collected while walking content directories.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Why part of the tree was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WarningKind {
    /// The directory or entry could not be read due to permissions.
    #[error("permission denied")]
    PermissionDenied,
    /// A directory entry name is not valid UTF-8.
    ///
    /// The warning path carries a lossy rendering of the name.
    #[error("entry name is not valid UTF-8")]
    NonUtf8Name,
    /// A symbolic link points outside the project root.
    ///
    /// Links are only followed within the root; the link itself is skipped.
    #[error("symbolic link points outside the project root")]
    EscapesRoot,
    /// Any other I/O failure.
    #[error("{message}")]
    Io {
        /// Kind reported by the operating system.
        kind: io::ErrorKind,
        /// Rendered error message.
        message: String,
    },
}

impl From<&io::Error> for WarningKind {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            kind => Self::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// A subtree or entry skipped during resolution.
///
/// Warnings accompany a successful [`crate::ContentResolution`]; they never
/// abort the walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped '{path}': {kind}")]
pub struct ResolutionWarning {
    /// Absolute path of the skipped directory or entry.
    pub path: Utf8PathBuf,
    /// Reason the path was skipped.
    pub kind: WarningKind,
}

impl ResolutionWarning {
    pub(crate) fn new(path: Utf8PathBuf, kind: WarningKind) -> Self {
        tracing::warn!(path = %path, reason = %kind, "skipping unreadable content path");
        Self { path, kind }
    }
}
