//! Locating project configuration files.
//!
//! [`ConfigDiscovery`] lists candidate files in a fixed order: explicit
//! paths, the path named by an environment variable, then each configured
//! file name under the project root. When more than one candidate exists,
//! [`ConfigPrecedence`] decides which declaration wins.

mod builder;

pub use builder::{ConfigDiscoveryBuilder, DEFAULT_FILE_NAMES};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::{ProjectConfig, load_config_value, merge_value};
use crate::path::{canonicalise, normalise_key};
use crate::{WindError, WindResult};

/// How duplicate configuration declarations combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConfigPrecedence {
    /// The first candidate that loads wins; later ones are not read.
    #[default]
    First,
    /// The last candidate that loads wins.
    Last,
    /// The candidate declaring the most theme tokens wins; ties go to the
    /// earlier candidate.
    RichestTheme,
    /// Every loaded candidate is merged in order, later values overriding
    /// earlier ones.
    Layered,
}

/// A configuration loaded from one candidate file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    path: PathBuf,
    config: ProjectConfig,
    raw: Value,
}

impl LoadedConfig {
    /// The candidate path the configuration came from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Consume the wrapper, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> ProjectConfig {
        self.config
    }

    fn theme_leaves(&self) -> usize {
        self.config.theme.extend.leaf_count() + self.config.theme.overrides.leaf_count()
    }
}

/// Every configuration that loaded, with the failures met on the way.
#[derive(Debug, Default)]
#[must_use]
pub struct DiscoveryOutcome {
    /// Loaded configurations in candidate order.
    pub configs: Vec<LoadedConfig>,
    /// Errors from candidates that exist but failed to load.
    pub errors: Vec<Arc<WindError>>,
}

/// Configuration file discovery for a project root.
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
    env_var: Option<String>,
    explicit_paths: Vec<PathBuf>,
    file_names: Vec<String>,
    precedence: ConfigPrecedence,
}

impl ConfigDiscovery {
    /// Creates a builder searching `root`.
    #[must_use]
    pub fn builder(root: impl Into<PathBuf>) -> ConfigDiscoveryBuilder {
        ConfigDiscoveryBuilder::new(root)
    }

    /// The configured precedence policy.
    #[must_use]
    pub const fn precedence_policy(&self) -> ConfigPrecedence {
        self.precedence
    }

    /// Candidate paths in search order, without duplicates.
    ///
    /// Paths naming the same file are collapsed even when spelled
    /// differently, and compare case-insensitively on Windows and macOS.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let mut seen = HashSet::new();
        for explicit in &self.explicit_paths {
            push_unique(&mut paths, &mut seen, self.root.join(explicit));
        }
        if let Some(from_env) = self
            .env_var
            .as_deref()
            .and_then(std::env::var_os)
            .filter(|value| !value.is_empty())
        {
            push_unique(&mut paths, &mut seen, self.root.join(from_env));
        }
        for name in &self.file_names {
            push_unique(&mut paths, &mut seen, self.root.join(name));
        }
        paths
    }

    /// Load every existing candidate.
    ///
    /// Missing candidates are skipped. Candidates that fail to load are
    /// reported in [`DiscoveryOutcome::errors`] without stopping the search.
    pub fn load_all(&self) -> DiscoveryOutcome {
        let mut outcome = DiscoveryOutcome::default();
        for path in self.candidates() {
            match load_candidate(&path) {
                Ok(Some(loaded)) => outcome.configs.push(loaded),
                Ok(None) => {}
                Err(err) => outcome.errors.push(err),
            }
        }
        outcome
    }

    /// Load the project configuration according to the precedence policy.
    ///
    /// # Errors
    ///
    /// When no candidate loads, returns the recorded errors (aggregated when
    /// there are several). Returns `Ok(None)` if no candidate exists.
    pub fn load(&self) -> WindResult<Option<ProjectConfig>> {
        if self.precedence == ConfigPrecedence::First {
            return self.load_first();
        }
        let DiscoveryOutcome { configs, errors } = self.load_all();
        if configs.is_empty() {
            return fail_with(errors);
        }
        for err in &errors {
            debug!(error = %err, "ignoring configuration candidate that failed to load");
        }
        let chosen = match self.precedence {
            ConfigPrecedence::Layered => return layer(configs).map(Some),
            ConfigPrecedence::Last => configs.into_iter().next_back(),
            ConfigPrecedence::RichestTheme => richest(configs),
            ConfigPrecedence::First => configs.into_iter().next(),
        };
        Ok(chosen.map(|loaded| {
            debug!(
                path = %loaded.path.display(),
                precedence = ?self.precedence,
                "selected configuration file"
            );
            loaded.into_config()
        }))
    }

    fn load_first(&self) -> WindResult<Option<ProjectConfig>> {
        let mut errors = Vec::new();
        for path in self.candidates() {
            match load_candidate(&path) {
                Ok(Some(loaded)) => {
                    debug!(path = %loaded.path.display(), "selected first configuration file");
                    return Ok(Some(loaded.into_config()));
                }
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }
        fail_with(errors)
    }
}

fn load_candidate(path: &Path) -> WindResult<Option<LoadedConfig>> {
    let Some(raw) = load_config_value(path)? else {
        return Ok(None);
    };
    let config = ProjectConfig::from_json(raw.clone())?;
    Ok(Some(LoadedConfig {
        path: path.to_path_buf(),
        config,
        raw,
    }))
}

fn fail_with(errors: Vec<Arc<WindError>>) -> WindResult<Option<ProjectConfig>> {
    WindError::try_aggregate(errors).map_or(Ok(None), |err| Err(Arc::new(err)))
}

fn richest(configs: Vec<LoadedConfig>) -> Option<LoadedConfig> {
    configs.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.theme_leaves() >= candidate.theme_leaves() => Some(current),
        _ => Some(candidate),
    })
}

fn layer(configs: Vec<LoadedConfig>) -> WindResult<ProjectConfig> {
    let mut merged = Value::Object(serde_json::Map::new());
    let count = configs.len();
    for loaded in configs {
        merge_value(&mut merged, loaded.raw);
    }
    debug!(layers = count, "layered configuration files");
    ProjectConfig::from_json(merged)
}

fn push_unique(paths: &mut Vec<PathBuf>, seen: &mut HashSet<String>, candidate: PathBuf) {
    if candidate.as_os_str().is_empty() {
        return;
    }
    let key = canonicalise(&candidate)
        .map_or_else(|_| normalise_key(&candidate), |canonical| normalise_key(&canonical));
    if seen.insert(key) {
        paths.push(candidate);
    }
}
