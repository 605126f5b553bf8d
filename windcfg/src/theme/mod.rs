//! Theme token merging.
//!
//! A [`ThemeSpec`] combines three tables: the `base` theme supplied by the
//! build tool, `overrides` that replace whole top-level namespaces, and the
//! `extend` overlay that merges into the result at every depth. Resolving the
//! spec also expands `theme(<key path>)` aliases.

mod merge;
mod reference;
mod tree;

pub use merge::{apply_overrides, merge_tokens};
pub use tree::{TokenTree, TokenValue};

use tracing::debug;

use crate::WindResult;

/// Inputs to a theme merge.
///
/// # Examples
///
/// ```rust
/// use windcfg::{ThemeSpec, TokenTree};
/// use serde_json::json;
///
/// let base = TokenTree::from_json(json!({"colors": {"black": "#000"}}))?;
/// let extend = TokenTree::from_json(json!({
///     "colors": {
///         "green": {"500": "var(--color-green-500)"},
///         "accent": "theme(colors.green.500)"
///     }
/// }))?;
/// let tokens = ThemeSpec::new(base, extend).resolve()?;
/// assert_eq!(
///     tokens.lookup("colors.accent").and_then(|v| v.as_leaf()),
///     Some("var(--color-green-500)")
/// );
/// assert_eq!(tokens.lookup("colors.black").and_then(|v| v.as_leaf()), Some("#000"));
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSpec {
    base: TokenTree,
    overrides: TokenTree,
    extend: TokenTree,
}

impl ThemeSpec {
    /// Combine a base theme with an `extend` overlay.
    #[must_use]
    pub const fn new(base: TokenTree, extend: TokenTree) -> Self {
        Self {
            base,
            overrides: TokenTree::new(),
            extend,
        }
    }

    /// Replace whole base namespaces before `extend` is applied.
    #[must_use]
    pub fn with_overrides(mut self, overrides: TokenTree) -> Self {
        self.overrides = overrides;
        self
    }

    /// The base theme.
    #[must_use]
    pub const fn base(&self) -> &TokenTree {
        &self.base
    }

    /// Namespaces replacing their base counterparts.
    #[must_use]
    pub const fn overrides(&self) -> &TokenTree {
        &self.overrides
    }

    /// The overlay merged at every depth.
    #[must_use]
    pub const fn extend(&self) -> &TokenTree {
        &self.extend
    }

    /// Merge the tables without expanding aliases.
    #[must_use]
    pub fn merged(&self) -> TokenTree {
        let replaced = apply_overrides(&self.base, &self.overrides);
        merge_tokens(&replaced, &self.extend)
    }

    /// Merge the tables and expand every `theme(...)` alias.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WindError::CyclicReference`] when aliases form a
    /// cycle, naming the key path that closes it, and
    /// [`crate::WindError::UnresolvedReference`] when an alias names a
    /// missing key or a table.
    pub fn resolve(&self) -> WindResult<TokenTree> {
        let merged = self.merged();
        let tokens = reference::resolve_references(&merged)?;
        debug!(
            base = self.base.leaf_count(),
            extend = self.extend.leaf_count(),
            resolved = tokens.leaf_count(),
            "merged theme tokens"
        );
        Ok(tokens)
    }
}

/// Merge `extend` into `base` and expand aliases in one call.
///
/// # Errors
///
/// See [`ThemeSpec::resolve`].
pub fn merge_theme(base: &TokenTree, extend: &TokenTree) -> WindResult<TokenTree> {
    ThemeSpec::new(base.clone(), extend.clone()).resolve()
}
