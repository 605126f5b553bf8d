//! Resolution of `theme(<key path>)` aliases inside token values.

use std::collections::HashMap;
use std::sync::Arc;

use super::tree::{TokenTree, TokenValue};
use crate::{WindError, WindResult};

const ALIAS_OPEN: &str = "theme(";

/// One `theme(...)` call found inside a value.
struct Alias<'a> {
    before: &'a str,
    reference: &'a str,
    after: &'a str,
}

/// Locate the first complete alias in `text`.
///
/// An opening `theme(` without a closing `)` is not an alias.
fn find_alias(text: &str) -> Option<Alias<'_>> {
    let start = text.find(ALIAS_OPEN)?;
    let before = text.get(..start)?;
    let inner_and_rest = text.get(start + ALIAS_OPEN.len()..)?;
    let close = inner_and_rest.find(')')?;
    let inner = inner_and_rest.get(..close)?.trim();
    Some(Alias {
        before,
        reference: strip_quotes(inner),
        after: inner_and_rest.get(close + 1..)?,
    })
}

fn strip_quotes(text: &str) -> &str {
    ['\'', '"']
        .into_iter()
        .find_map(|quote| text.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(text)
}

/// Replace every alias in `tree` with the value it names.
///
/// # Errors
///
/// Returns [`WindError::CyclicReference`] when aliases loop back on
/// themselves and [`WindError::UnresolvedReference`] when an alias names a
/// missing key or a table.
pub(crate) fn resolve_references(tree: &TokenTree) -> WindResult<TokenTree> {
    let mut resolver = AliasResolver {
        tree,
        resolved: HashMap::new(),
        stack: Vec::new(),
    };
    resolver.resolve_tree(tree, &mut Vec::new())
}

/// Keys walked from the root to a token.
///
/// Keys may contain dots, so the segments rather than their dotted
/// rendering identify a token.
type KeyPath = Vec<String>;

fn dotted(path: &[String]) -> String {
    path.join(".")
}

struct AliasResolver<'a> {
    tree: &'a TokenTree,
    resolved: HashMap<KeyPath, String>,
    stack: Vec<KeyPath>,
}

impl AliasResolver<'_> {
    fn resolve_tree(&mut self, node: &TokenTree, path: &mut KeyPath) -> WindResult<TokenTree> {
        let mut out = TokenTree::new();
        for (key, value) in node {
            path.push(key.clone());
            let outcome = match value {
                TokenValue::Leaf(raw) => self.resolve_leaf(path, raw).map(TokenValue::Leaf),
                TokenValue::Group(group) => self.resolve_tree(group, path).map(TokenValue::Group),
            };
            path.pop();
            out.insert(key.clone(), outcome?);
        }
        Ok(out)
    }

    fn resolve_leaf(&mut self, key_path: &[String], raw: &str) -> WindResult<String> {
        if let Some(done) = self.resolved.get(key_path) {
            return Ok(done.clone());
        }
        if let Some(start) = self.stack.iter().position(|entry| entry.as_slice() == key_path) {
            let mut cycle: Vec<String> = self
                .stack
                .get(start..)
                .unwrap_or_default()
                .iter()
                .map(|entry| entry.join("."))
                .collect();
            cycle.push(dotted(key_path));
            return Err(Arc::new(WindError::CyclicReference {
                key_path: dotted(key_path),
                cycle: cycle.join(" -> "),
            }));
        }

        let tree = self.tree;
        self.stack.push(key_path.to_vec());
        let mut value = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(alias) = find_alias(rest) {
            value.push_str(alias.before);
            let (target_path, target) = tree
                .lookup_segments(alias.reference)
                .and_then(|(segments, found)| Some((segments, found.as_leaf()?)))
                .ok_or_else(|| {
                    Arc::new(WindError::UnresolvedReference {
                        key_path: dotted(key_path),
                        reference: alias.reference.to_owned(),
                    })
                })?;
            value.push_str(&self.resolve_leaf(&target_path, target)?);
            rest = alias.after;
        }
        value.push_str(rest);
        self.stack.pop();

        self.resolved.insert(key_path.to_vec(), value.clone());
        Ok(value)
    }
}
