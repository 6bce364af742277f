// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisting statistics across runs.
//!
//! Several test processes may flush into the same reports directory at once. Each flush takes an
//! exclusive lock on a lock file next to the stats file, then reads, merges and atomically
//! replaces the stats file before releasing the lock. Since every writer starts from the previous
//! writer's output, results from all of them survive.
//!
//! The stats file in the parent of the reports directory is a read-only baseline. It is the
//! primary record of each case's result history, with the local file as a fallback.

use super::{
    StatsStore,
    merge::{merge_run, overlay},
};
use crate::{config::StatsConfig, errors::StatsFlushError};
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use realm_metadata::StatsDocument;
use std::{env::VarError, fs::File, io, io::Write};
use tracing::{debug, info, warn};

/// The environment variable naming the directory that stats are written to.
pub const REPORTS_DIR_ENV: &str = "BUILD_REPORTS";

/// Where statistics are read from and written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsPaths {
    reports_dir: Utf8PathBuf,
    local: Utf8PathBuf,
    baseline: Utf8PathBuf,
    lock: Utf8PathBuf,
}

impl StatsPaths {
    /// Computes paths for stats stored as `file_name` in `reports_dir`.
    pub fn new(reports_dir: impl Into<Utf8PathBuf>, file_name: &str) -> Self {
        let reports_dir = reports_dir.into();
        let local = reports_dir.join(file_name);
        let baseline = reports_dir.join("..").join(file_name);
        let lock = reports_dir.join(format!("{file_name}.lock"));
        Self {
            reports_dir,
            local,
            baseline,
            lock,
        }
    }

    /// The directory stats are written to.
    pub fn reports_dir(&self) -> &Utf8Path {
        &self.reports_dir
    }

    /// The stats file written by this process.
    pub fn local(&self) -> &Utf8Path {
        &self.local
    }

    /// The stats file in the parent directory, read as a baseline but never written.
    pub fn baseline(&self) -> &Utf8Path {
        &self.baseline
    }

    /// The lock file guarding the local stats file.
    pub fn lock(&self) -> &Utf8Path {
        &self.lock
    }
}

/// Whether and where statistics are persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatsPersistence {
    /// No reports directory is configured. Flushing does nothing.
    Disabled,

    /// Stats are merged into files at these paths.
    Enabled(StatsPaths),
}

impl StatsPersistence {
    /// Reads the reports directory from [`REPORTS_DIR_ENV`].
    ///
    /// Persistence is disabled if the variable is unset, empty or not valid UTF-8.
    pub fn from_env(config: &StatsConfig) -> Self {
        Self::from_env_var(std::env::var(REPORTS_DIR_ENV), config)
    }

    /// Interprets the value of [`REPORTS_DIR_ENV`] as returned by [`std::env::var`].
    pub(crate) fn from_env_var(value: Result<String, VarError>, config: &StatsConfig) -> Self {
        let reports_dir = match value {
            Ok(dir) => Some(Utf8PathBuf::from(dir)),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(dir)) => {
                warn!(
                    "{REPORTS_DIR_ENV} is not valid UTF-8 ({}), not writing stats",
                    dir.to_string_lossy()
                );
                None
            }
        };
        Self::from_reports_dir(reports_dir, config)
    }

    /// Uses an explicitly resolved reports directory.
    ///
    /// `None` or an empty path disables persistence.
    pub fn from_reports_dir(reports_dir: Option<Utf8PathBuf>, config: &StatsConfig) -> Self {
        match reports_dir {
            Some(dir) if !dir.as_str().is_empty() => {
                Self::Enabled(StatsPaths::new(dir, config.file_name()))
            }
            _ => Self::Disabled,
        }
    }

    /// Returns the paths used, if persistence is enabled.
    pub fn paths(&self) -> Option<&StatsPaths> {
        match self {
            Self::Disabled => None,
            Self::Enabled(paths) => Some(paths),
        }
    }

    /// Merges `store` into the persisted statistics.
    ///
    /// Intended to be called once, as the host shuts down.
    pub fn flush(&self, store: &StatsStore) -> Result<FlushOutcome, StatsFlushError> {
        let paths = match self {
            Self::Disabled => {
                debug!("{REPORTS_DIR_ENV} not set, not writing stats");
                return Ok(FlushOutcome::Skipped(SkipReason::Disabled));
            }
            Self::Enabled(paths) => paths,
        };
        if store.is_empty() {
            debug!("no tests finished, not writing stats");
            return Ok(FlushOutcome::Skipped(SkipReason::EmptyStore));
        }

        std::fs::create_dir_all(&paths.reports_dir).map_err(|error| {
            StatsFlushError::CreateDir {
                path: paths.reports_dir.clone(),
                error,
            }
        })?;

        let _lock = StatsLock::acquire(&paths.lock)?;

        // A case's result history is taken from the baseline first, then from the local file.
        // Entries the run didn't touch are carried over with the local file winning.
        let baseline = read_document(&paths.baseline);
        let local = read_document(&paths.local);
        let run = merge_run(&[&baseline, &local], store.document());
        let mut document = baseline;
        overlay(&mut document, local);
        overlay(&mut document, run);

        let serialized = document
            .to_yaml_string()
            .map_err(|error| StatsFlushError::Serialize {
                path: paths.local.clone(),
                error,
            })?;

        atomicwrites::AtomicFile::new(&paths.local, atomicwrites::AllowOverwrite)
            .write(|file| file.write_all(serialized.as_bytes()))
            .map_err(|error| StatsFlushError::Write {
                path: paths.local.clone(),
                error,
            })?;

        info!(
            "wrote stats for {} files to {} ({} files total)",
            store.len(),
            paths.local,
            document.len(),
        );
        Ok(FlushOutcome::Written {
            path: paths.local.clone(),
            file_count: document.len(),
        })
    }
}

/// The result of [`StatsPersistence::flush`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was written.
    Skipped(SkipReason),

    /// The stats file was written.
    Written {
        /// The stats file.
        path: Utf8PathBuf,

        /// The number of files in the written document.
        file_count: usize,
    },
}

/// Why a flush didn't write anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No reports directory is configured.
    Disabled,

    /// No test finished during the run.
    EmptyStore,
}

/// An exclusive lock on the stats lock file, released on drop.
#[derive(Debug)]
struct StatsLock {
    file: DebugIgnore<File>,
}

impl StatsLock {
    fn acquire(path: &Utf8Path) -> Result<Self, StatsFlushError> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|error| StatsFlushError::LockOpen {
                path: path.to_owned(),
                error,
            })?;

        debug!("waiting for exclusive lock on {path}");
        file.lock().map_err(|error| StatsFlushError::Lock {
            path: path.to_owned(),
            error,
        })?;

        Ok(Self {
            file: DebugIgnore(file),
        })
    }
}

impl Drop for StatsLock {
    fn drop(&mut self) {
        _ = self.file.unlock();
    }
}

/// Reads a stats document, treating a missing, unreadable or malformed file as empty.
fn read_document(path: &Utf8Path) -> StatsDocument {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!("no stats at {path}");
            return StatsDocument::new();
        }
        Err(error) => {
            warn!("unable to read stats at {path}, ignoring: {error}");
            return StatsDocument::new();
        }
    };

    match StatsDocument::from_yaml_str(&contents) {
        Ok(document) => document,
        Err(error) => {
            warn!("unable to parse stats at {path}, ignoring: {error}");
            StatsDocument::new()
        }
    }
}
