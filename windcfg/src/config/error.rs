//! Error constructors shared by configuration loading helpers.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::WindError;

pub(super) fn invalid_data(path: &Path, msg: impl Into<String>) -> Arc<WindError> {
    WindError::file_arc(path, io::Error::new(io::ErrorKind::InvalidData, msg.into()))
}

pub(super) fn not_found(path: &Path, msg: impl Into<String>) -> Arc<WindError> {
    WindError::file_arc(path, io::Error::new(io::ErrorKind::NotFound, msg.into()))
}
