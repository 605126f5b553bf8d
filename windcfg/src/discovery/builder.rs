//! Builder for [`ConfigDiscovery`].

use std::path::PathBuf;

use super::{ConfigDiscovery, ConfigPrecedence};

/// File names searched under the project root when none are configured.
pub const DEFAULT_FILE_NAMES: [&str; 3] = ["windcfg.toml", "windcfg.json", "windcfg.json5"];

/// Builder for [`ConfigDiscovery`].
///
/// # Examples
///
/// ```rust
/// use std::path::PathBuf;
/// use windcfg::{ConfigDiscovery, ConfigPrecedence};
///
/// let discovery = ConfigDiscovery::builder("/srv/app")
///     .add_explicit_path("config/site.toml")
///     .file_names(["windcfg.toml"])
///     .precedence(ConfigPrecedence::Layered)
///     .build();
/// assert_eq!(
///     discovery.candidates(),
///     [
///         PathBuf::from("/srv/app/config/site.toml"),
///         PathBuf::from("/srv/app/windcfg.toml"),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscoveryBuilder {
    root: PathBuf,
    env_var: Option<String>,
    explicit_paths: Vec<PathBuf>,
    file_names: Vec<String>,
    precedence: ConfigPrecedence,
}

impl ConfigDiscoveryBuilder {
    /// Creates a builder searching `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            env_var: None,
            explicit_paths: Vec::new(),
            file_names: DEFAULT_FILE_NAMES.map(String::from).to_vec(),
            precedence: ConfigPrecedence::default(),
        }
    }

    /// Sets the environment variable consulted for a configuration path.
    #[must_use]
    pub fn env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    /// Adds a path searched before the environment variable and root files.
    ///
    /// Relative paths are taken from the project root.
    #[must_use]
    pub fn add_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_paths.push(path.into());
        self
    }

    /// Replaces the file names searched under the project root.
    #[must_use]
    pub fn file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Chooses how several loaded candidates combine.
    #[must_use]
    pub const fn precedence(mut self, precedence: ConfigPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Finalises the builder.
    #[must_use]
    pub fn build(self) -> ConfigDiscovery {
        ConfigDiscovery {
            root: self.root,
            env_var: self.env_var,
            explicit_paths: self.explicit_paths,
            file_names: self.file_names,
            precedence: self.precedence,
        }
    }
}
