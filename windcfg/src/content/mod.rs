//! Resolution of `content` glob patterns into a concrete file set.
//!
//! Patterns are parsed and brace-expanded first. Concrete patterns sharing a
//! static directory prefix are grouped so each prefix is walked once, and the
//! groups are walked in parallel. The union of every match is returned as an
//! ordered set of absolute paths.
//!
//! # Example
//!
//! ```rust,no_run
//! use windcfg::{ContentResolver, ContentSpec};
//!
//! let spec = ContentSpec::new(["./components/**/*.{rs,html,css}", "./pages/**/*.rs"]);
//! let resolution = ContentResolver::new("/srv/app").resolve(&spec)?;
//! for path in &resolution.files {
//!     println!("{path}");
//! }
//! # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
//! ```

mod brace;
mod cancel;
mod pattern;
mod walk;
mod warning;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cancel::CancellationToken;
pub use pattern::{GlobPattern, PatternError};
pub use warning::{ResolutionWarning, WarningKind};

use pattern::ConcretePattern;
use walk::{PrefixGroup, WalkOutput, walk_group};

use crate::path::canonical_utf8;
use crate::{WindError, WindResult};

/// Ordered list of content patterns as written in the configuration.
///
/// Duplicates are legal and collapse during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSpec(Vec<String>);

impl ContentSpec {
    /// Build a spec from pattern strings.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    /// Append a pattern.
    pub fn push(&mut self, pattern: impl Into<String>) {
        self.0.push(pattern.into());
    }

    /// The raw patterns in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    /// Number of declared patterns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no patterns are declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ContentSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Outcome of resolving a [`ContentSpec`].
#[derive(Debug, Default)]
#[must_use]
pub struct ContentResolution {
    /// Absolute paths of every matching file, without duplicates.
    pub files: BTreeSet<Utf8PathBuf>,
    /// Subtrees or entries that could not be read.
    pub warnings: Vec<ResolutionWarning>,
    /// Patterns that failed to parse, in declaration order. Their siblings
    /// still resolve.
    pub pattern_errors: Vec<Arc<WindError>>,
}

impl ContentResolution {
    /// Fail when any pattern was rejected, otherwise return `self`.
    ///
    /// # Errors
    ///
    /// Returns the single [`WindError::InvalidPattern`], or an aggregate of
    /// them when several patterns failed.
    pub fn strict(mut self) -> WindResult<Self> {
        WindError::try_aggregate(std::mem::take(&mut self.pattern_errors))
            .map_or(Ok(self), |err| Err(Arc::new(err)))
    }
}

/// Resolves content patterns against a project root.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    root: Utf8PathBuf,
    cancel: CancellationToken,
}

impl ContentResolver {
    /// Create a resolver for patterns relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` to abort resolution from another thread.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The root patterns are resolved against, as supplied.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Resolve `spec` into the set of matching files.
    ///
    /// Invalid patterns are reported in
    /// [`ContentResolution::pattern_errors`] without affecting the others.
    /// Unreadable subtrees become [`ContentResolution::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`WindError::File`] when the root cannot be opened and
    /// [`WindError::Cancelled`] when the cancellation token fires.
    pub fn resolve(&self, spec: &ContentSpec) -> WindResult<ContentResolution> {
        self.cancel.check()?;
        let root = canonical_utf8(self.root.as_std_path())?;
        let root_dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|err| WindError::file_arc(root.as_std_path(), err))?;

        let mut pattern_errors = Vec::new();
        let mut parsed = Vec::with_capacity(spec.len());
        for raw in spec.patterns() {
            match GlobPattern::parse(raw) {
                Ok(pattern) => parsed.push(pattern),
                Err(reason) => {
                    pattern_errors.push(Arc::new(WindError::invalid_pattern(raw.as_str(), reason)));
                }
            }
        }

        let groups = group_by_prefix(&parsed);
        let output = groups
            .par_iter()
            .map(|group| walk_group(&root_dir, &root, group, &self.cancel))
            .try_reduce(WalkOutput::default, |left, right| Ok(left.merge(right)))?;
        self.cancel.check()?;

        let WalkOutput {
            files,
            mut warnings,
        } = output;
        warnings.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(
            root = %root,
            patterns = spec.len(),
            prefixes = groups.len(),
            files = files.len(),
            warnings = warnings.len(),
            "resolved content patterns"
        );
        Ok(ContentResolution {
            files,
            warnings,
            pattern_errors,
        })
    }
}

/// Group every concrete expansion by its static prefix, dropping duplicates.
fn group_by_prefix(patterns: &[GlobPattern]) -> Vec<PrefixGroup<'_>> {
    let mut by_prefix: BTreeMap<&[String], BTreeSet<&ConcretePattern>> = BTreeMap::new();
    for concrete in patterns.iter().flat_map(GlobPattern::concrete) {
        by_prefix
            .entry(concrete.prefix())
            .or_default()
            .insert(concrete);
    }
    by_prefix
        .into_iter()
        .map(|(prefix, members)| PrefixGroup::new(prefix, members.into_iter().collect()))
        .collect()
}

#[cfg(test)]
mod tests;
