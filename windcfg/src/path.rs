//! Filesystem path helpers shared by content resolution and config loading.

use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;

use crate::{WindError, WindResult};

/// Canonicalise `p` using platform-specific rules.
///
/// Returns an absolute, normalised path with symlinks resolved. On Windows
/// [`dunce`](https://docs.rs/dunce/latest/dunce/) is used so diagnostics do
/// not carry UNC prefixes.
///
/// # Errors
///
/// Returns a [`WindError::File`] if canonicalisation fails.
pub fn canonicalise(p: &Path) -> WindResult<PathBuf> {
    #[cfg(windows)]
    {
        dunce::canonicalize(p).map_err(|e| WindError::file_arc(p, e))
    }
    #[cfg(not(windows))]
    {
        std::fs::canonicalize(p).map_err(|e| WindError::file_arc(p, e))
    }
}

/// Canonicalise `p` and require the result to be valid UTF-8.
///
/// # Errors
///
/// Returns a [`WindError::File`] when canonicalisation fails or the
/// canonical path is not UTF-8.
pub(crate) fn canonical_utf8(p: &Path) -> WindResult<Utf8PathBuf> {
    let canonical = canonicalise(p)?;
    Utf8PathBuf::from_path_buf(canonical).map_err(|non_utf8| {
        WindError::file_arc(
            &non_utf8,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )
    })
}

/// Normalise a canonical path into a key for cycle detection and
/// de-duplication.
///
/// Windows and macOS compare paths case-insensitively, so the key is
/// lower-cased there; elsewhere the path is returned unchanged.
pub(crate) fn normalise_key(path: &Path) -> String {
    #[cfg(windows)]
    {
        let mut lowered = path.to_string_lossy().to_lowercase();
        if lowered.contains('/') {
            lowered = lowered.replace('/', "\\");
        }
        lowered
    }

    #[cfg(target_os = "macos")]
    {
        path.to_string_lossy().to_lowercase()
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    {
        path.to_string_lossy().into_owned()
    }
}
