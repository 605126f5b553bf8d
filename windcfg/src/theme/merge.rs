//! Overlay merging for token tables.

use std::collections::btree_map::Entry;

use super::tree::{TokenTree, TokenValue};

/// Merge `extend` over `base`, returning the combined table.
///
/// Behaviour:
/// - Keys only in `base` are kept, keys only in `extend` are added.
/// - When both sides hold a table, the tables merge recursively.
/// - Otherwise the `extend` value replaces the `base` value, shape included.
///
/// # Examples
///
/// ```rust
/// use windcfg::{TokenTree, merge_tokens};
/// use serde_json::json;
///
/// let base = TokenTree::from_json(json!({"colors": {"indigo": {"400": "a", "500": "b"}}}))?;
/// let extend = TokenTree::from_json(json!({"colors": {"indigo": {"600": "c"}}}))?;
/// let merged = merge_tokens(&base, &extend);
/// assert_eq!(
///     merged,
///     TokenTree::from_json(json!({"colors": {"indigo": {"400": "a", "500": "b", "600": "c"}}}))?
/// );
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
#[must_use]
pub fn merge_tokens(base: &TokenTree, extend: &TokenTree) -> TokenTree {
    let mut merged = base.clone();
    merge_into(&mut merged, extend.clone());
    merged
}

/// Replace each top-level namespace of `base` named in `overrides`.
///
/// Namespaces absent from `overrides` are kept as they are.
#[must_use]
pub fn apply_overrides(base: &TokenTree, overrides: &TokenTree) -> TokenTree {
    let mut replaced = base.clone();
    for (namespace, value) in overrides {
        replaced.insert(namespace.clone(), value.clone());
    }
    replaced
}

fn merge_into(target: &mut TokenTree, overlay: TokenTree) {
    for (key, value) in overlay {
        match target.entry(key) {
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

fn merge_value(target: &mut TokenValue, overlay: TokenValue) {
    match (target, overlay) {
        (TokenValue::Group(existing), TokenValue::Group(incoming)) => merge_into(existing, incoming),
        (slot, incoming) => *slot = incoming,
    }
}
