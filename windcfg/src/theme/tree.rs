//! Hierarchical design-token tables.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::{WindResult, WindResultExt};

/// A token value: either a literal string or a nested table.
///
/// Leaf strings are opaque; `var(--color-black)` is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A literal value such as `var(--color-indigo-500)`.
    Leaf(String),
    /// A nested table such as the shades of one color family.
    Group(TokenTree),
}

impl TokenValue {
    /// Construct a leaf.
    #[must_use]
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::Leaf(value.into())
    }

    /// Returns the leaf string, if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Group(_) => None,
        }
    }

    /// Returns the nested table, if this is a group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&TokenTree> {
        match self {
            Self::Group(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        Self::leaf(value)
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        Self::Leaf(value)
    }
}

impl From<TokenTree> for TokenValue {
    fn from(tree: TokenTree) -> Self {
        Self::Group(tree)
    }
}

/// String-keyed table of tokens, ordered by key.
///
/// # Examples
///
/// ```
/// use windcfg::TokenTree;
/// use serde_json::json;
///
/// let tree = TokenTree::from_json(json!({
///     "colors": { "indigo": { "500": "var(--color-indigo-500)" } }
/// }))?;
/// assert_eq!(
///     tree.lookup("colors.indigo.500").and_then(|v| v.as_leaf()),
///     Some("var(--color-indigo-500)")
/// );
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTree(BTreeMap<String, TokenValue>);

impl TokenTree {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Deserialise a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WindError::Gathering`] when `value` is not an object
    /// whose leaves are all strings.
    pub fn from_json(value: serde_json::Value) -> WindResult<Self> {
        serde_json::from_value(value).into_wind()
    }

    /// Insert `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TokenValue>) -> Option<TokenValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a direct child.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TokenValue> {
        self.0.get(key)
    }

    /// Look up a dotted key path such as `colors.indigo.500`.
    ///
    /// Keys may contain dots themselves (`spacing.0.5`); the longest key that
    /// leads to a value wins.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&TokenValue> {
        self.lookup_segments(path).map(|(_, found)| found)
    }

    /// Like [`TokenTree::lookup`], also returning the keys walked to reach
    /// the value.
    pub(crate) fn lookup_segments(&self, path: &str) -> Option<(Vec<String>, &TokenValue)> {
        if let Some((key, direct)) = self.0.get_key_value(path) {
            return Some((vec![key.clone()], direct));
        }
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let rest = path.strip_prefix(key.as_str())?.strip_prefix('.')?;
                let (tail, found) = value.as_group()?.lookup_segments(rest)?;
                let mut segments = Vec::with_capacity(tail.len() + 1);
                segments.push(key.clone());
                segments.extend(tail);
                Some((key.len(), segments, found))
            })
            .max_by_key(|(len, ..)| *len)
            .map(|(_, segments, found)| (segments, found))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the table has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over direct children in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, TokenValue> {
        self.0.iter()
    }

    /// Every leaf with its dotted key path, depth-first in key order.
    #[must_use]
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        collect_leaves(self, "", &mut out);
        out
    }

    /// Number of leaves at any depth.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.0
            .values()
            .map(|value| match value {
                TokenValue::Leaf(_) => 1,
                TokenValue::Group(tree) => tree.leaf_count(),
            })
            .sum()
    }

    pub(crate) fn entry(&mut self, key: String) -> btree_map::Entry<'_, String, TokenValue> {
        self.0.entry(key)
    }
}

fn collect_leaves<'a>(tree: &'a TokenTree, prefix: &str, out: &mut Vec<(String, &'a str)>) {
    for (key, value) in tree.iter() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            TokenValue::Leaf(leaf) => out.push((path, leaf)),
            TokenValue::Group(group) => collect_leaves(group, &path, out),
        }
    }
}

impl IntoIterator for TokenTree {
    type Item = (String, TokenValue);
    type IntoIter = btree_map::IntoIter<String, TokenValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenTree {
    type Item = (&'a String, &'a TokenValue);
    type IntoIter = btree_map::Iter<'a, String, TokenValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<TokenValue>> FromIterator<(K, V)> for TokenTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
