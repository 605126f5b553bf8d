//! Temporary source trees for content resolution tests.

use std::io::Write as _;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// A temporary project directory populated through a capability handle.
///
/// The directory is removed when the tree drops.
///
/// # Examples
///
/// ```
/// use test_helpers::SourceTree;
///
/// let tree = SourceTree::new()?;
/// let page = tree.file("pages/index.html", "<main></main>")?;
/// assert!(page.starts_with(tree.root()));
/// # Ok::<_, anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct SourceTree {
    root: Utf8PathBuf,
    dir: Dir,
    _temp: TempDir,
}

impl SourceTree {
    /// Create an empty tree with a canonical, UTF-8 root.
    ///
    /// # Errors
    ///
    /// Fails when the temporary directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("create temporary directory")?;
        #[cfg(windows)]
        let canonicalised = dunce::canonicalize(temp.path());
        #[cfg(not(windows))]
        let canonicalised = std::fs::canonicalize(temp.path());
        let canonical = canonicalised.context("canonicalise temporary directory")?;
        let root = Utf8PathBuf::from_path_buf(canonical)
            .map_err(|path| anyhow!("temporary directory {} is not UTF-8", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            root,
            dir,
            _temp: temp,
        })
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` under the root.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when a directory or the file cannot be written.
    pub fn file(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        if let Some(parent) = Utf8Path::new(relative)
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
        {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        let mut file = self
            .dir
            .create(relative)
            .with_context(|| format!("create {relative}"))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("write {relative}"))?;
        Ok(self.path(relative))
    }

    /// Create empty files at each relative path.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be written.
    pub fn files<'a>(&self, relatives: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for relative in relatives {
            self.file(relative, "")?;
        }
        Ok(())
    }

    /// Create the directory `relative` and its parents.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created.
    pub fn dir(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.dir
            .create_dir_all(relative)
            .with_context(|| format!("create {relative}"))?;
        Ok(self.path(relative))
    }
}
