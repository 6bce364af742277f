// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    helpers::{text_width, truncate_ansi_aware},
    reporter::helpers::Styles,
};
use owo_colors::OwoColorize;
use swrite::{SWrite, swrite};

/// Returns the denominator shown in progress lines for a suite of `suite_size` tests.
///
/// The index shown is 0-based, so the last test shows `100%` at `total of total`.
pub(super) fn progress_total(suite_size: usize) -> usize {
    suite_size.saturating_sub(1).max(1)
}

/// Renders the progress line for the test at `index`, truncated to `width` columns.
pub(super) fn progress_line(
    index: usize,
    total: usize,
    class_name: &str,
    case_name: &str,
    width: usize,
    styles: &Styles,
) -> String {
    let prefix = format!("{:>3}% {:>4} of {} ", index * 100 / total, index, total);

    let mut line = String::new();
    swrite!(line, "{}{} {}", prefix.style(styles.count), class_name, case_name);

    if text_width(&line) > width {
        truncate_ansi_aware(&line, width)
    } else {
        line
    }
}
