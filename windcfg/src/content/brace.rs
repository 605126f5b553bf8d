//! Brace expansion for content patterns.
//!
//! Each `{a,b}` group multiplies the pattern into one concrete string per
//! alternative. Several groups expand as a cartesian product, left to right.
//! Nesting is rejected rather than interpreted.

use std::collections::HashSet;

use super::PatternError;

/// An open `{` awaiting its closing brace.
struct OpenGroup {
    offset: usize,
    alternatives: Vec<String>,
    current: String,
}

impl OpenGroup {
    const fn new(offset: usize) -> Self {
        Self {
            offset,
            alternatives: Vec::new(),
            current: String::new(),
        }
    }

    fn finish_alternative(&mut self, offset: usize) -> Result<(), PatternError> {
        if self.current.is_empty() {
            return Err(PatternError::EmptyAlternative { offset });
        }
        self.alternatives.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn close(mut self, offset: usize) -> Result<Vec<String>, PatternError> {
        self.finish_alternative(offset)?;
        Ok(self.alternatives)
    }
}

/// Expand every brace group in `pattern`.
///
/// Returns the concrete patterns in expansion order with duplicates removed.
///
/// # Errors
///
/// Returns a [`PatternError`] when braces are unbalanced or nested, or when a
/// group holds an empty alternative.
pub(super) fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let mut pieces: Vec<Vec<String>> = Vec::new();
    let mut literal = String::new();
    let mut group: Option<OpenGroup> = None;

    for (offset, ch) in pattern.char_indices() {
        if let Some(open) = group.as_mut() {
            match ch {
                '{' => return Err(PatternError::NestedBrace { offset }),
                ',' => open.finish_alternative(offset)?,
                '}' => {
                    if let Some(closed) = group.take() {
                        pieces.push(closed.close(offset)?);
                    }
                }
                other => open.current.push(other),
            }
            continue;
        }
        match ch {
            '{' => {
                pieces.push(vec![std::mem::take(&mut literal)]);
                group = Some(OpenGroup::new(offset));
            }
            '}' => return Err(PatternError::UnbalancedBrace { offset }),
            other => literal.push(other),
        }
    }
    if let Some(open) = group {
        return Err(PatternError::UnbalancedBrace {
            offset: open.offset,
        });
    }
    pieces.push(vec![literal]);

    let mut expanded = vec![String::new()];
    for alternatives in pieces {
        expanded = expanded
            .iter()
            .flat_map(|head| alternatives.iter().map(move |alt| format!("{head}{alt}")))
            .collect();
    }
    let mut seen = HashSet::new();
    expanded.retain(|candidate| seen.insert(candidate.clone()));
    Ok(expanded)
}
