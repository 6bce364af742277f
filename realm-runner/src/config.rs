// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for realm-runner.
//!
//! The embedded [`RealmConfig::DEFAULT_CONFIG`] is always loaded first. A repository may layer its
//! own settings on top through `.config/realm.toml`.

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Overall configuration for realm-runner.
#[derive(Clone, Debug)]
pub struct RealmConfig {
    workspace_root: Utf8PathBuf,
    inner: RealmConfigDeserialize,
}

impl RealmConfig {
    /// The default location of the config within the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/realm.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from `config_file`, or if not specified from `.config/realm.toml` in the
    /// workspace root.
    ///
    /// An explicitly specified file must exist. The default location is optional.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();
        let (config_path, required) = match config_file {
            Some(file) => (file.to_owned(), true),
            None => (workspace_root.join(Self::CONFIG_PATH), false),
        };

        let builder = Self::make_default_config()
            .add_source(File::new(config_path.as_str(), FileFormat::Toml).required(required));
        let (inner, ignored) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_path, kind))?;

        if !ignored.is_empty() {
            warn!(
                "ignoring unknown configuration keys in config file {config_path}: {}",
                ignored.into_iter().collect::<Vec<_>>().join(", ")
            );
        }
        debug!("loaded realm config (repository file: {config_path})");

        Ok(Self {
            workspace_root,
            inner,
        })
    }

    /// Returns the default configuration, with no repository-specific settings applied.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        let (inner, _) = Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("embedded default config is valid");
        Self {
            workspace_root: workspace_root.into(),
            inner,
        }
    }

    /// Returns the workspace root this config was loaded for.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns settings for stats inference and persistence.
    pub fn stats(&self) -> &StatsConfig {
        &self.inner.stats
    }

    /// Returns settings for terminal output.
    pub fn terminal(&self) -> &TerminalConfig {
        &self.inner.terminal
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// This returns a tuple of (config, ignored paths).
    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(RealmConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: RealmConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // The config crate may also report the key; drop it so the path is only reported
                // once.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RealmConfigDeserialize {
    stats: StatsConfig,
    terminal: TerminalConfig,
}

/// Settings for inferring test file names and persisting statistics.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatsConfig {
    file_name: String,
    test_root: String,
    file_extension: String,
    default_directory: String,
    class_directories: BTreeMap<String, ClassDirectory>,
}

impl StatsConfig {
    /// The name of the stats file, both locally and for the baseline.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The prefix for every inferred test file path.
    pub fn test_root(&self) -> &str {
        &self.test_root
    }

    /// The extension appended to inferred test file paths.
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// The directory used when no known base class matches.
    pub fn default_directory(&self) -> &str {
        &self.default_directory
    }

    /// The known base classes and their directories, keyed by entry name.
    pub fn class_directories(&self) -> &BTreeMap<String, ClassDirectory> {
        &self.class_directories
    }

    /// Returns the directory associated with `base`, if it is a known base class.
    pub fn directory_for_base(&self, base: &str) -> Option<&str> {
        self.class_directories
            .values()
            .find(|entry| entry.base == base)
            .map(|entry| entry.directory.as_str())
    }
}

/// A known base class and the directory its subclasses live in.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClassDirectory {
    /// The fully qualified name of the base class.
    pub base: String,

    /// The directory, relative to the test root, with a trailing `/`.
    pub directory: String,
}

/// Settings for terminal output.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TerminalConfig {
    default_width: u16,
}

impl TerminalConfig {
    /// The width assumed when the real width can't be determined.
    pub fn default_width(&self) -> u16 {
        self.default_width
    }
}
