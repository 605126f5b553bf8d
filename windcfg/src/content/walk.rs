//! Capability-scoped directory traversal for content resolution.
//!
//! Every walk starts from a [`cap_std`] handle on the project root, so
//! symbolic links cannot lead the resolver outside of it. Links are resolved
//! against that root handle; a link whose target climbs above the root is
//! reported as [`WarningKind::EscapesRoot`].

use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, DirEntry};
use tracing::debug;

use super::cancel::CancellationToken;
use super::pattern::ConcretePattern;
use super::warning::{ResolutionWarning, WarningKind};
use crate::WindResult;

/// Concrete patterns sharing one static prefix.
#[derive(Debug)]
pub(super) struct PrefixGroup<'a> {
    prefix: &'a [String],
    patterns: Vec<&'a ConcretePattern>,
    max_depth: Option<usize>,
}

impl<'a> PrefixGroup<'a> {
    pub(super) fn new(prefix: &'a [String], patterns: Vec<&'a ConcretePattern>) -> Self {
        let max_depth = patterns
            .iter()
            .map(|pattern| pattern.fixed_depth())
            .try_fold(0, |deepest, depth| depth.map(|d| deepest.max(d)));
        Self {
            prefix,
            patterns,
            max_depth,
        }
    }

    /// Whether a directory `depth` components below the prefix may hold
    /// matches.
    fn may_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    fn matches(&self, relative: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_below_prefix(relative))
    }
}

/// Files and warnings gathered from one or more walks.
#[derive(Debug, Default)]
pub(super) struct WalkOutput {
    pub(super) files: BTreeSet<Utf8PathBuf>,
    pub(super) warnings: Vec<ResolutionWarning>,
}

impl WalkOutput {
    pub(super) fn merge(mut self, other: Self) -> Self {
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
        self
    }
}

/// Walk the subtree under `group`'s prefix and collect matching files.
///
/// A prefix that does not exist, or names a file, contributes nothing.
///
/// # Errors
///
/// Returns [`crate::WindError::Cancelled`] when `cancel` fires mid-walk.
pub(super) fn walk_group(
    root_dir: &Dir,
    root: &Utf8Path,
    group: &PrefixGroup<'_>,
    cancel: &CancellationToken,
) -> WindResult<WalkOutput> {
    cancel.check()?;
    let base: Utf8PathBuf = group.prefix.iter().collect();
    let start = if group.prefix.is_empty() {
        root_dir.try_clone()
    } else {
        root_dir.open_dir(&base)
    };
    let mut walker = Walker {
        root_dir,
        base: root.join(&base),
        prefix: base.clone(),
        group,
        cancel,
        output: WalkOutput::default(),
    };
    match start {
        Ok(dir) => walker.visit(&dir, &mut Vec::new())?,
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            debug!(prefix = %base, "content prefix does not exist; no matches");
        }
        Err(err) => walker.warn(&[], &err),
    }
    Ok(walker.output)
}

struct Walker<'a> {
    root_dir: &'a Dir,
    /// Absolute path of the walk's starting directory.
    base: Utf8PathBuf,
    /// The starting directory relative to `root_dir`.
    prefix: Utf8PathBuf,
    group: &'a PrefixGroup<'a>,
    cancel: &'a CancellationToken,
    output: WalkOutput,
}

impl Walker<'_> {
    fn visit(&mut self, dir: &Dir, relative: &mut Vec<String>) -> WindResult<()> {
        // Raw entries keep names that are not UTF-8 so they can be reported.
        let entries = match dir.as_cap_std().entries() {
            Ok(entries) => entries,
            Err(err) => {
                self.warn(relative, &err);
                return Ok(());
            }
        };
        for item in entries {
            self.cancel.check()?;
            let raw_entry = match item {
                Ok(raw_entry) => raw_entry,
                Err(err) => {
                    self.warn(relative, &err);
                    continue;
                }
            };
            let name = match raw_entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw_name) => {
                    relative.push(raw_name.to_string_lossy().into_owned());
                    self.record(relative, WarningKind::NonUtf8Name);
                    relative.pop();
                    continue;
                }
            };
            let entry = DirEntry::from_cap_std(raw_entry);
            relative.push(name);
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => self.descend(&entry, relative)?,
                Ok(kind) if kind.is_file() => self.consider(relative),
                Ok(kind) if kind.is_symlink() => self.follow_link(relative),
                Ok(_) => {}
                Err(err) => self.warn(relative, &err),
            }
            relative.pop();
        }
        Ok(())
    }

    fn descend(&mut self, entry: &DirEntry, relative: &mut Vec<String>) -> WindResult<()> {
        if !self.group.may_descend(relative.len()) {
            return Ok(());
        }
        match entry.open_dir() {
            Ok(sub) => self.visit(&sub, relative),
            Err(err) => {
                self.warn(relative, &err);
                Ok(())
            }
        }
    }

    /// Symlinked files are matched under their link name; symlinked
    /// directories are not entered.
    fn follow_link(&mut self, relative: &[String]) {
        let mut link = self.prefix.clone();
        link.extend(relative);
        match self.root_dir.metadata(&link) {
            Ok(meta) if meta.is_file() => self.consider(relative),
            Ok(meta) if meta.is_dir() => {
                debug!(path = %self.path_of(relative), "not following symlinked directory");
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path_of(relative), "skipping dangling symlink");
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied && self.escapes(&link) => {
                self.record(relative, WarningKind::EscapesRoot);
            }
            Err(err) => self.warn(relative, &err),
        }
    }

    /// Whether the symlink at `link` names a target outside the root.
    fn escapes(&self, link: &Utf8Path) -> bool {
        self.root_dir
            .read_link_contents(link)
            .is_ok_and(|target| target_leaves_root(link, &target))
    }

    fn consider(&mut self, relative: &[String]) {
        if self.group.matches(&relative.join("/")) {
            let path = self.path_of(relative);
            self.output.files.insert(path);
        }
    }

    fn path_of(&self, relative: &[String]) -> Utf8PathBuf {
        let mut path = self.base.clone();
        path.extend(relative);
        path
    }

    fn warn(&mut self, relative: &[String], err: &io::Error) {
        self.record(relative, WarningKind::from(err));
    }

    fn record(&mut self, relative: &[String], kind: WarningKind) {
        let path = self.path_of(relative);
        self.output.warnings.push(ResolutionWarning::new(path, kind));
    }
}

/// Whether `target`, read from the symlink at `link`, points above the root
/// that `link` is relative to.
///
/// The check is lexical; links reached through other links are judged by
/// their own text only.
fn target_leaves_root(link: &Utf8Path, target: &Utf8Path) -> bool {
    if target.has_root() {
        return true;
    }
    let mut depth = link.components().count().saturating_sub(1);
    for component in target.components() {
        match component {
            Utf8Component::ParentDir => match depth.checked_sub(1) {
                Some(up) => depth = up,
                None => return true,
            },
            Utf8Component::Normal(_) => depth = depth.saturating_add(1),
            Utf8Component::CurDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;
    use rstest::rstest;

    use super::target_leaves_root;

    #[rstest]
    #[case("src/escape.rs", "/etc/hostname", true)]
    #[case("src/escape.rs", "../../outside.rs", true)]
    #[case("escape.rs", "../outside.rs", true)]
    #[case("src/link.rs", "../lib/real.rs", false)]
    #[case("src/link.rs", "./real.rs", false)]
    #[case("src/a/link.rs", "../../b/../real.rs", false)]
    #[case("src/link.rs", "deep/../../../x.rs", true)]
    fn judges_link_targets(#[case] link: &str, #[case] target: &str, #[case] leaves: bool) {
        assert_eq!(
            target_leaves_root(Utf8Path::new(link), Utf8Path::new(target)),
            leaves
        );
    }
}
