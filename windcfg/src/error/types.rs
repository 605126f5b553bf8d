//! Primary error enum for configuration resolution flows.

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::content::PatternError;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WindError {
    /// A content pattern could not be parsed.
    #[error("invalid content pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern as written in the configuration.
        pattern: String,
        /// What is wrong with the pattern.
        #[source]
        reason: PatternError,
    },

    /// A chain of `theme(...)` aliases loops back on itself.
    #[error("cyclic theme reference at '{key_path}': {cycle}")]
    CyclicReference {
        /// Key path whose value started the offending chain.
        key_path: String,
        /// Key paths participating in the cycle, joined with `->`.
        cycle: String,
    },

    /// A `theme(...)` alias names a key that does not hold a value.
    #[error("theme reference '{reference}' in '{key_path}' does not name a token value")]
    UnresolvedReference {
        /// Key path whose value contains the alias.
        key_path: String,
        /// Key path named by the alias.
        reference: String,
    },

    /// Cycle detected while resolving `presets`.
    #[error("cyclic presets detected: {cycle}")]
    CyclicPreset {
        /// Chain of configuration files participating in the cycle.
        cycle: String,
    },

    /// Error originating from a file or directory.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while extracting configuration from a parsed document.
    #[error("failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Resolution was abandoned through a cancellation token.
    #[error("resolution cancelled")]
    Cancelled,

    /// Multiple errors occurred during a single operation.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
