// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by realm-runner.

use camino::Utf8PathBuf;
use config::ConfigError;
use realm_metadata::StatsFormatError;
use std::io;
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse realm config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// A test display name didn't have the `<case> (<Class>)` shape.
///
/// The external framework always produces names of this shape, so this indicates a contract
/// violation rather than a recoverable condition.
#[derive(Clone, Debug, Error)]
#[error("test name `{name}` does not match the expected form `<case> (<Class>)`")]
pub struct DisplayNameParseError {
    name: String,
}

impl DisplayNameParseError {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An error that occurs while reporting a test event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteEventError {
    /// An error occurred while writing to the output stream.
    #[error("error writing to output")]
    Io(#[source] io::Error),

    /// The framework produced a malformed test name.
    #[error(transparent)]
    DisplayName(#[from] DisplayNameParseError),

    /// A test finished without a corresponding start event.
    #[error("test `{name}` finished without a matching start event")]
    NoTestRunning {
        /// The name passed to the finish event.
        name: String,
    },
}

/// An error that occurs while writing the stats file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsFlushError {
    /// The reports directory could not be created.
    #[error("failed to create reports directory `{path}`")]
    CreateDir {
        /// The directory that couldn't be created.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The lock file could not be opened.
    #[error("failed to open lock file `{path}`")]
    LockOpen {
        /// The path to the lock file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The exclusive lock could not be acquired.
    #[error("failed to acquire exclusive lock on `{path}`")]
    Lock {
        /// The path to the lock file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The merged document could not be serialized.
    #[error("failed to serialize stats for `{path}`")]
    Serialize {
        /// The stats file that was going to be written.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: StatsFormatError,
    },

    /// The stats file could not be written.
    #[error("failed to write stats to `{path}`")]
    Write {
        /// The stats file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },
}
