//! Trait-based conversions between external error types and `WindError`.

use figment::Error as FigmentError;

use super::WindError;

/// Convert JSON decoding failures into [`WindError::Gathering`].
impl From<serde_json::Error> for WindError {
    fn from(e: serde_json::Error) -> Self {
        Self::Gathering(Box::new(FigmentError::from(format!(
            "JSON error: {} at line {}, column {}",
            e,
            e.line(),
            e.column()
        ))))
    }
}

impl From<FigmentError> for WindError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(Box::new(e))
    }
}
