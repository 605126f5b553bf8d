//! Configuration resolution for utility-CSS builds.
//!
//! `windcfg` turns a project configuration into the two inputs a utility-CSS
//! compiler needs: the set of source files to scan for class names, and the
//! merged table of design tokens.
//!
//! - [`ContentResolver`] expands `content` glob patterns such as
//!   `./components/**/*.{rs,html,css}` into absolute file paths.
//! - [`ThemeSpec`] deep-merges a base theme with the configuration's
//!   `theme.extend` overlay and expands `theme(...)` aliases.
//! - [`load_config_file`] and [`ConfigDiscovery`] read configuration files
//!   in TOML or JSON5, following `presets`.
//! - [`resolve_project`] runs everything for a loaded configuration.

use std::sync::Arc;

mod config;
mod content;
mod discovery;
mod error;
mod path;
mod project;
mod result_ext;
mod theme;

pub use config::{ProjectConfig, ThemeConfig, load_config_file, merge_value};
pub use content::{
    CancellationToken, ContentResolution, ContentResolver, ContentSpec, GlobPattern, PatternError,
    ResolutionWarning, WarningKind,
};
pub use discovery::{
    ConfigDiscovery, ConfigDiscoveryBuilder, ConfigPrecedence, DEFAULT_FILE_NAMES,
    DiscoveryOutcome, LoadedConfig,
};
pub use error::{AggregatedErrors, WindError};
pub use path::canonicalise;
pub use project::{ProjectResolution, resolve_project};
pub use result_ext::WindResultExt;
pub use theme::{ThemeSpec, TokenTree, TokenValue, apply_overrides, merge_theme, merge_tokens};

/// Convenience result alias for configuration resolution.
pub type WindResult<T> = Result<T, Arc<WindError>>;
