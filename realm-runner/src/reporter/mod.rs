// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prints live progress for a test run and records statistics for each finished test.
//!
//! The main structure in this module is [`Reporter`], created through a [`ReporterBuilder`]. The
//! host forwards every [`TestEvent`] to [`Reporter::report_event`], and once the run is over takes
//! the recorded statistics back with [`Reporter::into_stats_store`].

mod display_name;
mod events;
mod helpers;
mod imp;
mod progress;
mod terminal;

pub use display_name::ParsedTestName;
pub use events::*;
pub use imp::*;
pub use terminal::TerminalInfo;
