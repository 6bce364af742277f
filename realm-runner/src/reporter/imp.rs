// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prints test progress and records per-test statistics.
//!
//! The main structure in this module is [`Reporter`].

use super::{
    ParsedTestName, TerminalInfo,
    events::{OutputLevel, TestEvent},
    helpers::Styles,
    progress::{progress_line, progress_total},
};
use crate::{
    config::RealmConfig,
    errors::WriteEventError,
    helpers::{text_width, truncate_ansi_aware},
    stats::{CaseOutcome, FilenameInferrer, StatsStore, TestClassLookup},
    time::{StopwatchStart, stopwatch},
};
use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use realm_metadata::LastResult;
use std::io::{self, BufWriter, Write};
use tracing::debug;

/// Output destination for the reporter.
///
/// This is usually standard output, but can be an in-memory buffer for tests.
pub enum ReporterOutput<'a> {
    /// Produce output on standard output.
    ///
    /// If standard output is an interactive terminal, the progress line is updated in place.
    Terminal,

    /// Write output to a buffer.
    Buffer(&'a mut Vec<u8>),
}

/// Reporter builder.
#[derive(Debug, Default)]
pub struct ReporterBuilder {
    output_level: OutputLevel,
    should_colorize: bool,
    terminal: Option<TerminalInfo>,
}

impl ReporterBuilder {
    /// Sets how much the reporter prints.
    pub fn set_output_level(&mut self, output_level: OutputLevel) -> &mut Self {
        self.output_level = output_level;
        self
    }

    /// Set to true if the reporter should colorize output.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Overrides terminal detection.
    ///
    /// By default, standard output is inspected for [`ReporterOutput::Terminal`], and a buffer is
    /// treated as a non-terminal with the configured default width.
    pub fn set_terminal(&mut self, terminal: TerminalInfo) -> &mut Self {
        self.terminal = Some(terminal);
        self
    }
}

impl ReporterBuilder {
    /// Creates a new reporter for a suite of `suite_size` tests.
    pub fn build<'a>(
        &self,
        suite_size: usize,
        config: &'a RealmConfig,
        lookup: &'a dyn TestClassLookup,
        output: ReporterOutput<'a>,
    ) -> Reporter<'a> {
        let default_width = config.terminal().default_width();
        let terminal = self.terminal.unwrap_or_else(|| match &output {
            ReporterOutput::Terminal => TerminalInfo::detect(default_width),
            ReporterOutput::Buffer(_) => TerminalInfo::non_terminal(default_width),
        });
        debug!(
            "building reporter: {} tests, width {}, cursor control: {}",
            suite_size,
            terminal.width(),
            terminal.supports_cursor_control(),
        );

        let mut styles = Styles::default();
        if self.should_colorize {
            styles.colorize();
        }

        let output = match output {
            ReporterOutput::Terminal => ReporterOutputImpl::Terminal,
            ReporterOutput::Buffer(buf) => ReporterOutputImpl::Buffer(buf),
        };

        Reporter {
            inner: ReporterImpl {
                output_level: self.output_level,
                terminal,
                styles,
                total: progress_total(suite_size),
                test_index: 0,
                fault_count: 0,
                current: None,
                inferrer: FilenameInferrer::new(config.stats(), lookup),
                stats: StatsStore::new(),
            },
            output,
        }
    }
}

/// Prints progress for a run, and records statistics for each finished test.
pub struct Reporter<'a> {
    inner: ReporterImpl<'a>,
    output: ReporterOutputImpl<'a>,
}

impl Reporter<'_> {
    /// Report a test event.
    ///
    /// Output is flushed after every event.
    pub fn report_event(&mut self, event: TestEvent<'_>) -> Result<(), WriteEventError> {
        match &mut self.output {
            ReporterOutputImpl::Terminal => {
                let mut writer = BufWriter::new(io::stdout());
                self.inner.write_event_impl(event, &mut writer)?;
                writer.flush().map_err(WriteEventError::Io)
            }
            ReporterOutputImpl::Buffer(buf) => self.inner.write_event_impl(event, &mut **buf),
        }
    }

    /// Returns the statistics recorded so far.
    pub fn stats_store(&self) -> &StatsStore {
        &self.inner.stats
    }

    /// Consumes the reporter, returning the statistics it recorded.
    pub fn into_stats_store(self) -> StatsStore {
        self.inner.stats
    }
}

enum ReporterOutputImpl<'a> {
    Terminal,
    Buffer(&'a mut Vec<u8>),
}

struct ReporterImpl<'a> {
    output_level: OutputLevel,
    terminal: TerminalInfo,
    styles: Styles,
    total: usize,
    test_index: usize,
    fault_count: usize,
    current: Option<(ParsedTestName, StopwatchStart)>,
    inferrer: FilenameInferrer<'a>,
    stats: StatsStore,
}

impl ReporterImpl<'_> {
    fn write_event_impl<W: Write>(
        &mut self,
        event: TestEvent<'_>,
        writer: &mut W,
    ) -> Result<(), WriteEventError> {
        match event {
            TestEvent::SuiteLoaded { name } => {
                if self.output_level >= OutputLevel::Normal {
                    writeln!(writer, "Loaded suite {name}").map_err(WriteEventError::Io)?;
                }
            }
            TestEvent::RunStarted => {
                if self.output_level >= OutputLevel::Normal {
                    writeln!(writer, "Started").map_err(WriteEventError::Io)?;
                }
            }
            TestEvent::TestStarted { name } => {
                let parsed = ParsedTestName::parse(name)?;
                self.write_test_started(name, &parsed, writer)
                    .map_err(WriteEventError::Io)?;
                self.fault_count = 0;
                self.current = Some((parsed, stopwatch()));
            }
            TestEvent::Fault { fault } => {
                self.fault_count += 1;
                if self.output_level >= OutputLevel::ProgressOnly {
                    self.write_fault(fault, writer).map_err(WriteEventError::Io)?;
                }
            }
            TestEvent::TestFinished { name } => {
                let Some((parsed, start)) = self.current.take() else {
                    return Err(WriteEventError::NoTestRunning {
                        name: name.to_owned(),
                    });
                };
                self.test_index += 1;
                self.record(&parsed, &start);
            }
            TestEvent::RunFinished { elapsed, result } => {
                if self.terminal.supports_cursor_control()
                    && self.output_level >= OutputLevel::Normal
                {
                    clear_line(writer).map_err(WriteEventError::Io)?;
                }
                if self.output_level >= OutputLevel::Normal {
                    write!(
                        writer,
                        "Finished in {} seconds.\n\n{result}\n",
                        elapsed.as_secs()
                    )
                    .map_err(WriteEventError::Io)?;
                }
            }
        }

        writer.flush().map_err(WriteEventError::Io)
    }

    fn write_test_started<W: Write>(
        &self,
        name: &str,
        parsed: &ParsedTestName,
        writer: &mut W,
    ) -> io::Result<()> {
        // Progress lines are only shown at Normal and above. Faults are shown at ProgressOnly.
        if self.output_level < OutputLevel::Normal {
            return Ok(());
        }

        let cursor_control = self.terminal.supports_cursor_control();
        if cursor_control {
            clear_line(writer)?;
        }
        let verbose = self.output_level >= OutputLevel::Verbose;
        let name_prefix = if verbose {
            format!("{name}: ")
        } else {
            String::new()
        };

        // The name prefix and the progress line share the terminal width.
        let width = usize::from(self.terminal.width());
        let prefix_width = text_width(&name_prefix);
        let line = if prefix_width >= width {
            truncate_ansi_aware(&name_prefix, width)
        } else {
            let progress = progress_line(
                self.test_index,
                self.total,
                parsed.class_name(),
                parsed.case_name(),
                width - prefix_width,
                &self.styles,
            );
            format!("{name_prefix}{progress}")
        };
        write!(writer, "{line}")?;
        if verbose || !cursor_control {
            writeln!(writer)?;
        }
        Ok(())
    }

    fn write_fault<W: Write>(
        &self,
        fault: &dyn std::fmt::Display,
        writer: &mut W,
    ) -> io::Result<()> {
        write!(writer, "\n{}\n{fault}\n", "-------".style(self.styles.fail))?;
        if self.terminal.supports_cursor_control() {
            write!(writer, "\n\n\n")
        } else {
            writeln!(writer)
        }
    }

    fn record(&mut self, parsed: &ParsedTestName, start: &StopwatchStart) {
        let snapshot = start.snapshot();
        let filename = self.inferrer.infer(parsed.class_name());
        let result = LastResult::from_fault_count(self.fault_count);
        debug!(
            "{} ({}) finished in {:?}: {result}, recorded under {filename}",
            parsed.case_name(),
            parsed.class_name(),
            snapshot.duration,
        );

        self.stats.record(CaseOutcome {
            filename: &filename,
            class_name: parsed.class_name(),
            case_name: parsed.case_name(),
            start_time: snapshot.start_time.fixed_offset(),
            duration: snapshot.duration,
            result,
        });
    }
}

/// Moves to the start of the line and clears everything after the cursor.
fn clear_line<W: Write>(writer: &mut W) -> io::Result<()> {
    queue!(writer, MoveToColumn(0), Clear(ClearType::FromCursorDown))
}
