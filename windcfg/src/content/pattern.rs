//! Parsing of content glob patterns into concrete, matchable forms.

use std::cmp::Ordering;
use std::fmt;

use camino::Utf8Path;
use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

use super::brace::expand_braces;

/// Reasons a content pattern is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern has no path segments.
    #[error("pattern is empty")]
    Empty,
    /// The pattern starts at the filesystem root.
    #[error("absolute patterns are not supported; patterns are relative to the project root")]
    Absolute,
    /// The pattern contains a `..` segment.
    #[error("'..' segments are not supported")]
    ParentSegment,
    /// A `{` has no matching `}` or a `}` has no matching `{`.
    #[error("unbalanced brace at byte {offset}")]
    UnbalancedBrace {
        /// Byte offset of the offending brace.
        offset: usize,
    },
    /// A `{` appears inside another brace group.
    #[error("nested brace group at byte {offset} is not supported")]
    NestedBrace {
        /// Byte offset of the inner `{`.
        offset: usize,
    },
    /// A brace group holds an empty alternative.
    #[error("empty brace alternative at byte {offset}")]
    EmptyAlternative {
        /// Byte offset of the delimiter closing the empty alternative.
        offset: usize,
    },
    /// `**` shares a segment with other text.
    #[error("'**' must occupy a whole path segment, found '{segment}'")]
    PartialRecursiveWildcard {
        /// Segment containing the misplaced `**`.
        segment: String,
    },
    /// A glob token outside the supported subset.
    #[error("unsupported wildcard token '{token}' at byte {offset}")]
    UnsupportedToken {
        /// The rejected character.
        token: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// The glob engine rejected the pattern.
    #[error("invalid glob: {message}")]
    Glob {
        /// Reason reported by the glob engine.
        message: String,
    },
}

/// Characters with glob meaning that this resolver does not interpret.
const UNSUPPORTED_TOKENS: [char; 6] = ['?', '[', ']', '(', ')', '\\'];

/// One path segment of a concrete pattern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Segment {
    /// Matches exactly this name.
    Literal(String),
    /// A single segment containing `*`.
    Wildcard(String),
    /// `**`: zero or more whole segments.
    AnyDepth,
}

impl Segment {
    fn parse(text: &str) -> Result<Self, PatternError> {
        if text == "**" {
            return Ok(Self::AnyDepth);
        }
        if text.contains("**") {
            return Err(PatternError::PartialRecursiveWildcard {
                segment: text.to_owned(),
            });
        }
        if text.contains('*') {
            Ok(Self::Wildcard(text.to_owned()))
        } else {
            Ok(Self::Literal(text.to_owned()))
        }
    }

    const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) | Self::Wildcard(text) => f.write_str(text),
            Self::AnyDepth => f.write_str("**"),
        }
    }
}

fn join_segments<'a, I, T>(parts: I) -> String
where
    I: IntoIterator<Item = &'a T>,
    T: fmt::Display + 'a,
{
    parts
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// A brace-free pattern split into a static directory prefix and a tail.
///
/// The tail always holds at least one segment; its last segment matches the
/// file name. Paths below the prefix are matched by a compiled glob where
/// `*` never crosses a `/`.
#[derive(Debug, Clone)]
pub(crate) struct ConcretePattern {
    prefix: Vec<String>,
    tail: Vec<Segment>,
    matcher: GlobMatcher,
}

impl ConcretePattern {
    fn parse(expanded: &str) -> Result<Self, PatternError> {
        if expanded.starts_with('/') {
            return Err(PatternError::Absolute);
        }
        let mut segments = Vec::new();
        for text in expanded.split('/') {
            match text {
                "" | "." => {}
                ".." => return Err(PatternError::ParentSegment),
                other => segments.push(Segment::parse(other)?),
            }
        }
        if segments.is_empty() {
            return Err(PatternError::Empty);
        }

        let literal_run = segments.iter().take_while(|s| s.is_literal()).count();
        let prefix_len = literal_run.min(segments.len().saturating_sub(1));
        let tail = segments.split_off(prefix_len);
        let prefix = segments
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Literal(name) => Some(name),
                Segment::Wildcard(_) | Segment::AnyDepth => None,
            })
            .collect();
        let glob = join_segments(&tail);
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|err| PatternError::Glob {
                message: err.kind().to_string(),
            })?
            .compile_matcher();
        Ok(Self {
            prefix,
            tail,
            matcher,
        })
    }

    /// Literal directory segments walked before any matching starts.
    pub(crate) fn prefix(&self) -> &[String] {
        &self.prefix
    }

    /// Number of path components below the prefix a match must have, or
    /// `None` when the tail contains `**`.
    pub(crate) fn fixed_depth(&self) -> Option<usize> {
        if self.tail.contains(&Segment::AnyDepth) {
            None
        } else {
            Some(self.tail.len())
        }
    }

    /// Test a `/`-separated path relative to the prefix.
    pub(crate) fn matches_below_prefix(&self, relative: &str) -> bool {
        !relative.is_empty() && self.matcher.is_match(relative)
    }

    /// Test components relative to the project root.
    fn matches(&self, components: &[&str]) -> bool {
        if components.len() < self.prefix.len() {
            return false;
        }
        let (head, rest) = components.split_at(self.prefix.len());
        head.iter().zip(&self.prefix).all(|(a, b)| *a == b.as_str())
            && self.matches_below_prefix(&rest.join("/"))
    }

    fn key(&self) -> (&[String], &[Segment]) {
        (&self.prefix, &self.tail)
    }
}

impl PartialEq for ConcretePattern {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ConcretePattern {}

impl PartialOrd for ConcretePattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConcretePattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for ConcretePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.prefix.join("/");
        let tail = join_segments(&self.tail);
        if prefix.is_empty() {
            f.write_str(&tail)
        } else {
            write!(f, "{prefix}/{tail}")
        }
    }
}

/// A parsed content pattern such as `./components/**/*.{rs,html,css}`.
///
/// Parsing expands brace groups up front, so a `GlobPattern` holds one
/// concrete pattern per alternative.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use windcfg::GlobPattern;
///
/// let pattern = GlobPattern::parse("./pages/**/*.{rs,html}")?;
/// let expansions: Vec<String> = pattern.expansions().collect();
/// assert_eq!(expansions, ["pages/**/*.rs", "pages/**/*.html"]);
/// assert!(pattern.matches(Utf8Path::new("pages/home/index.html")));
/// assert!(!pattern.matches(Utf8Path::new("pages/home/index.css")));
/// # Ok::<_, windcfg::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    concrete: Vec<ConcretePattern>,
}

impl GlobPattern {
    /// Parse `raw`, expanding brace groups.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is empty, absolute, climbs
    /// out of the root, has malformed braces, or uses an unsupported token.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        if raw.starts_with('!') {
            return Err(PatternError::UnsupportedToken {
                token: '!',
                offset: 0,
            });
        }
        if let Some((offset, token)) = raw
            .char_indices()
            .find(|(_, ch)| UNSUPPORTED_TOKENS.contains(ch))
        {
            return Err(PatternError::UnsupportedToken { token, offset });
        }

        let concrete = expand_braces(raw)?
            .iter()
            .map(|expanded| ConcretePattern::parse(expanded))
            .collect::<Result<Vec<_>, _>>()?;
        let mut unique: Vec<ConcretePattern> = Vec::with_capacity(concrete.len());
        for pattern in concrete {
            if !unique.contains(&pattern) {
                unique.push(pattern);
            }
        }
        Ok(Self {
            raw: raw.to_owned(),
            concrete: unique,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalised brace-free patterns, one per alternative.
    pub fn expansions(&self) -> impl Iterator<Item = String> + '_ {
        self.concrete.iter().map(ToString::to_string)
    }

    /// Returns `true` when `relative` (a path relative to the project root)
    /// matches any expansion of this pattern.
    #[must_use]
    pub fn matches(&self, relative: &Utf8Path) -> bool {
        let components: Vec<&str> = relative
            .components()
            .map(|component| component.as_str())
            .filter(|part| *part != ".")
            .collect();
        self.concrete
            .iter()
            .any(|pattern| pattern.matches(&components))
    }

    pub(crate) fn concrete(&self) -> &[ConcretePattern] {
        &self.concrete
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for GlobPattern {}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
