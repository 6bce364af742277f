// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::merge::merge_run_into;
use chrono::{DateTime, FixedOffset};
use realm_metadata::{CaseStats, LastResult, StatsDocument};
use std::time::Duration;

/// The outcome of one finished test case, as recorded into a [`StatsStore`].
#[derive(Clone, Debug)]
pub struct CaseOutcome<'a> {
    /// The inferred file the test's class lives in.
    pub filename: &'a str,

    /// The fully qualified class name.
    pub class_name: &'a str,

    /// The case (method) name.
    pub case_name: &'a str,

    /// When the case started.
    pub start_time: DateTime<FixedOffset>,

    /// How long the case took.
    pub duration: Duration,

    /// Whether the case reported any faults.
    pub result: LastResult,
}

/// Statistics collected by a single process during a run.
///
/// Owned by the reporter while the run is in progress. Once the run finishes, the host hands it to
/// [`StatsPersistence::flush`](super::StatsPersistence::flush).
#[derive(Clone, Debug, Default)]
pub struct StatsStore {
    document: StatsDocument,
}

impl StatsStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no test has been recorded.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Returns the number of files with at least one recorded case.
    pub fn len(&self) -> usize {
        self.document.len()
    }

    /// Returns the statistics recorded so far.
    pub fn document(&self) -> &StatsDocument {
        &self.document
    }

    /// Records a finished case.
    ///
    /// The file's `_seconds` accumulates over every case recorded for it in this run. A case
    /// recorded twice keeps the later outcome.
    pub fn record(&mut self, outcome: CaseOutcome<'_>) {
        let seconds = outcome.duration.as_secs_f64();
        let file = self.document.file_mut(outcome.filename);
        file.class_name = outcome.class_name.to_owned();
        file.seconds += seconds;
        file.cases.insert(
            outcome.case_name.to_owned(),
            CaseStats {
                seconds,
                last_result: outcome.result,
                last_run: format_last_run(&outcome.start_time),
                since: None,
            },
        );
    }

    /// Merges this run's statistics into `base`, tracking result transitions.
    pub fn merge_into(&self, base: &mut StatsDocument) {
        merge_run_into(base, &self.document);
    }
}

/// Formats a start time the way it's stored in `last_run`: Unix seconds, then the RFC 2822 form.
pub(crate) fn format_last_run(time: &DateTime<FixedOffset>) -> String {
    format!("{} {}", time.timestamp(), time.to_rfc2822())
}
