//! Constructors and aggregation helpers for `WindError`.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::{AggregatedErrors, WindError};
use crate::content::PatternError;

impl WindError {
    /// Tries to build a [`WindError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.len() > 1 {
            return Some(Self::Aggregate(Box::new(AggregatedErrors::new(arcs))));
        }
        let last = arcs.pop()?;
        Some(match Arc::try_unwrap(last) {
            Ok(err) => err,
            Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
        })
    }

    /// Build a [`WindError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`WindError::try_aggregate`] when the
    /// list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct an [`WindError::InvalidPattern`] for `pattern`.
    ///
    /// # Examples
    ///
    /// ```
    /// use windcfg::{PatternError, WindError};
    /// let e = WindError::invalid_pattern("src/**/*.{rs", PatternError::UnbalancedBrace { offset: 9 });
    /// assert!(e.to_string().contains("src/**/*.{rs"));
    /// ```
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: PatternError) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason,
        }
    }

    /// Construct a [`WindError::File`] wrapped in an [`Arc`].
    #[must_use]
    pub fn file_arc(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Returns `true` when this error, or any error it aggregates, is a
    /// cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Aggregate(errors) => errors.iter().any(Self::is_cancelled),
            _ => false,
        }
    }
}
