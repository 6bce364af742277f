// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events emitted by the host test framework.

use std::{fmt, time::Duration};

/// A lifecycle event from the host framework.
///
/// Events for a run arrive in the order `SuiteLoaded`, `RunStarted`, then for each test
/// `TestStarted`, any number of `Fault`s and `TestFinished`, and finally `RunFinished`.
#[derive(Clone, Copy)]
pub enum TestEvent<'a> {
    /// The suite was loaded.
    SuiteLoaded {
        /// The name of the suite.
        name: &'a str,
    },

    /// The run started.
    RunStarted,

    /// A test started.
    TestStarted {
        /// The test's display name, of the form `<case> (<Class>)`.
        name: &'a str,
    },

    /// The running test reported a failure or an error.
    Fault {
        /// The fault, displayed in full.
        fault: &'a dyn fmt::Display,
    },

    /// A test finished.
    TestFinished {
        /// The test's display name.
        name: &'a str,
    },

    /// The run finished.
    RunFinished {
        /// The wall-clock time taken by the run.
        elapsed: Duration,

        /// The framework's summary of the run.
        result: &'a dyn fmt::Display,
    },
}

impl fmt::Debug for TestEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuiteLoaded { name } => f.debug_struct("SuiteLoaded").field("name", name).finish(),
            Self::RunStarted => f.write_str("RunStarted"),
            Self::TestStarted { name } => f.debug_struct("TestStarted").field("name", name).finish(),
            Self::Fault { fault } => f
                .debug_struct("Fault")
                .field("fault", &fault.to_string())
                .finish(),
            Self::TestFinished { name } => {
                f.debug_struct("TestFinished").field("name", name).finish()
            }
            Self::RunFinished { elapsed, result } => f
                .debug_struct("RunFinished")
                .field("elapsed", elapsed)
                .field("result", &result.to_string())
                .finish(),
        }
    }
}

/// How much the reporter prints.
///
/// Statistics are recorded at every level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputLevel {
    /// Print nothing.
    Silent,

    /// Print faults only.
    ProgressOnly,

    /// Also print progress lines, and run start and finish messages.
    #[default]
    Normal,

    /// Also print each test's full name as it starts.
    Verbose,
}
