//! One-call resolution of a loaded project configuration.

use std::collections::BTreeSet;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::config::ProjectConfig;
use crate::content::{CancellationToken, ContentResolver, ResolutionWarning};
use crate::theme::TokenTree;
use crate::{WindError, WindResult};

/// Everything a build needs from a project configuration.
#[derive(Debug)]
#[must_use]
pub struct ProjectResolution {
    /// Absolute paths of every content file.
    pub files: BTreeSet<Utf8PathBuf>,
    /// Subtrees skipped while walking content.
    pub warnings: Vec<ResolutionWarning>,
    /// Content patterns that failed to parse.
    pub pattern_errors: Vec<Arc<WindError>>,
    /// The merged theme with aliases expanded.
    pub tokens: TokenTree,
    /// Build mode carried through from the configuration.
    pub mode: Option<String>,
}

/// Resolve content patterns and merge the theme of `config`.
///
/// The content walk and the theme merge run concurrently. `base_theme` holds
/// the built-in tokens the configuration extends.
///
/// # Examples
///
/// ```rust,no_run
/// use windcfg::{CancellationToken, TokenTree, load_config_file, resolve_project};
/// use std::path::Path;
///
/// if let Some(config) = load_config_file(Path::new("/srv/app/windcfg.toml"))? {
///     let resolved = resolve_project(&config, "/srv/app", &TokenTree::new(), &CancellationToken::new())?;
///     println!("{} files, {} tokens", resolved.files.len(), resolved.tokens.leaf_count());
/// }
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
///
/// # Errors
///
/// Returns the content resolver's error when the root cannot be opened or
/// `cancel` fires, otherwise the theme merger's error for alias failures.
pub fn resolve_project(
    config: &ProjectConfig,
    root: impl Into<Utf8PathBuf>,
    base_theme: &TokenTree,
    cancel: &CancellationToken,
) -> WindResult<ProjectResolution> {
    let resolver = ContentResolver::new(root).with_cancellation(cancel.clone());
    let spec = config.theme_spec(base_theme.clone());
    let (content_result, theme_result) =
        rayon::join(|| resolver.resolve(&config.content), || spec.resolve());
    let content = content_result?;
    let tokens = theme_result?;
    debug!(
        root = %resolver.root(),
        files = content.files.len(),
        tokens = tokens.leaf_count(),
        "resolved project configuration"
    );
    Ok(ProjectResolution {
        files: content.files,
        warnings: content.warnings,
        pattern_errors: content.pattern_errors,
        tokens,
        mode: config.mode.clone(),
    })
}
