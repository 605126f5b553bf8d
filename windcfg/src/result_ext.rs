//! Extensions for mapping errors to `WindResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `WindResult<T>` alias (`Result<T, Arc<WindError>>`).
//!
//! # Examples
//!
//! ```
//! use windcfg::{WindResult, WindResultExt};
//!
//! fn parse() -> WindResult<serde_json::Value> {
//!     serde_json::from_str("{\"mode\": \"all\"}").into_wind()
//! }
//! ```

use std::sync::Arc;

use crate::{WindError, WindResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<WindError>`
/// into a `WindResult<T>`.
pub trait WindResultExt<T, E> {
    /// Convert `Result<T, E>` into `WindResult<T>` using `Into<WindError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<WindError>`.
    fn into_wind(self) -> WindResult<T>;
}

impl<T, E> WindResultExt<T, E> for Result<T, E>
where
    E: Into<WindError>,
{
    fn into_wind(self) -> WindResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
