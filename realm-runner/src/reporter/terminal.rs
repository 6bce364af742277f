// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::{self, IsTerminal};
use tracing::debug;

/// What the output stream is capable of.
///
/// Queried once when the reporter is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalInfo {
    width: u16,
    supports_cursor_control: bool,
}

impl TerminalInfo {
    /// Creates terminal info with explicit values.
    pub fn new(width: u16, supports_cursor_control: bool) -> Self {
        Self {
            width,
            supports_cursor_control,
        }
    }

    /// Output that isn't a terminal: plain lines, `default_width` columns.
    pub fn non_terminal(default_width: u16) -> Self {
        Self::new(default_width, false)
    }

    /// Inspects standard output.
    ///
    /// `default_width` is used if standard output isn't a terminal or its size can't be queried.
    pub fn detect(default_width: u16) -> Self {
        if !io::stdout().is_terminal() {
            debug!("stdout is not a terminal: disabling cursor control");
            return Self::non_terminal(default_width);
        }

        let width = match crossterm::terminal::size() {
            Ok((columns, _)) if columns > 0 => columns,
            Ok(_) => default_width,
            Err(error) => {
                debug!("unable to determine terminal size, using {default_width}: {error}");
                default_width
            }
        };

        // Some CI environments appear to pretend to be a terminal. Live-updating lines only make
        // logs harder to read there.
        let supports_cursor_control = !is_ci::uncached();
        if !supports_cursor_control {
            debug!("running in CI: disabling cursor control");
        }

        Self::new(width, supports_cursor_control)
    }

    /// The number of columns available for a progress line.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Whether the progress line can be rewritten in place.
    pub fn supports_cursor_control(&self) -> bool {
        self.supports_cursor_control
    }
}
