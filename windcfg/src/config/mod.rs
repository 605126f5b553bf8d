//! Project configuration files.
//!
//! A configuration document carries the `content` patterns, the `theme`
//! tables and a few pass-through options. Documents may name `presets`,
//! which are loaded first and overlaid by the naming file.

mod error;
mod loader;
mod merge;
mod parser;

pub use loader::load_config_file;
pub use merge::merge_value;

pub(crate) use loader::load_config_value;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentSpec;
use crate::theme::{ThemeSpec, TokenTree};
use crate::{WindResult, WindResultExt};

/// The `theme` table of a configuration file.
///
/// `extend` merges into the base theme at every depth. Any other namespace,
/// such as `colors`, replaces the base namespace of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Overlay merged into the base theme.
    pub extend: TokenTree,
    /// Namespaces replacing their base counterparts.
    #[serde(flatten)]
    pub overrides: TokenTree,
}

/// A fully loaded project configuration.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use windcfg::ProjectConfig;
///
/// let config = ProjectConfig::from_json(json!({
///     "mode": "all",
///     "content": ["./src/**/*.{rs,html,css}"],
///     "theme": {"extend": {"colors": {"white": "var(--color-white)"}}},
///     "plugins": []
/// }))?;
/// assert_eq!(config.mode.as_deref(), Some("all"));
/// assert_eq!(config.theme.extend.leaf_count(), 1);
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Build mode, passed through untouched.
    pub mode: Option<String>,
    /// Content patterns relative to the project root.
    pub content: ContentSpec,
    /// Theme tables.
    pub theme: ThemeConfig,
    /// Plugin declarations, passed through untouched.
    pub plugins: Vec<serde_json::Value>,
}

impl ProjectConfig {
    /// Deserialise a configuration from a merged JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WindError::Gathering`] when the document does not
    /// match the expected shape, for example a theme leaf that is not a
    /// string.
    pub fn from_json(value: serde_json::Value) -> WindResult<Self> {
        let config: Self = serde_json::from_value(value).into_wind()?;
        if !config.plugins.is_empty() {
            debug!(plugins = config.plugins.len(), "plugins are passed through unprocessed");
        }
        Ok(config)
    }

    /// Build the theme merge inputs for `base`.
    #[must_use]
    pub fn theme_spec(&self, base: TokenTree) -> ThemeSpec {
        ThemeSpec::new(base, self.theme.extend.clone()).with_overrides(self.theme.overrides.clone())
    }
}

#[cfg(test)]
mod tests;
