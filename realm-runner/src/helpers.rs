// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for realm-runner.

use console::AnsiCodeIterator;
use unicode_width::UnicodeWidthChar;

/// Returns the display width of `text`, ignoring ANSI escape codes.
pub(crate) fn text_width(text: &str) -> usize {
    // Technically, the width of a string may not be the same as the sum of the
    // widths of its characters. But managing truncation is pretty difficult. See
    // https://docs.rs/unicode-width/latest/unicode_width/#rules-for-determining-width.
    //
    // So we use the sum of the widths of the string's characters, both here and
    // in truncate_ansi_aware below.
    strip_ansi_escapes::strip_str(text)
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Keeps the visible characters of `text` that fit within `max_width` columns.
///
/// ANSI escape codes are always retained so that styles are terminated correctly.
pub(crate) fn truncate_ansi_aware(text: &str, max_width: usize) -> String {
    let mut pos = 0;
    let mut res = String::new();
    for (s, is_ansi) in AnsiCodeIterator::new(text) {
        if is_ansi {
            res.push_str(s);
            continue;
        } else if pos >= max_width {
            // We retain ANSI escape codes, so this is `continue` rather than
            // `break`.
            continue;
        }

        for c in s.chars() {
            let c_width = c.width().unwrap_or(0);
            if pos + c_width > max_width {
                pos = max_width;
                break;
            }
            res.push(c);
            pos += c_width;
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;
    use test_case::test_case;

    #[test_case("", 0; "empty")]
    #[test_case("hello", 5; "ascii")]
    #[test_case("héllo", 5; "accented")]
    #[test_case("日本", 4; "wide characters")]
    fn width_of_plain_text(text: &str, expected: usize) {
        assert_eq!(text_width(text), expected);
    }

    #[test]
    fn width_ignores_ansi() {
        let styled = format!("{}", "hello".bold());
        assert_ne!(styled, "hello");
        assert_eq!(text_width(&styled), 5);
    }

    #[test_case("hello world", 5, "hello"; "truncated")]
    #[test_case("hello", 10, "hello"; "shorter than width")]
    #[test_case("hello", 0, ""; "zero width")]
    #[test_case("日本語", 3, "日"; "wide character not split")]
    fn truncate_plain_text(text: &str, width: usize, expected: &str) {
        assert_eq!(truncate_ansi_aware(text, width), expected);
    }

    #[test]
    fn truncate_keeps_ansi_codes() {
        let styled = format!("{} tail", "head".bold());
        let truncated = truncate_ansi_aware(&styled, 2);
        assert_eq!(text_width(&truncated), 2);
        assert_eq!(strip_ansi_escapes::strip_str(&truncated), "he");
        // The reset code after "head" is kept.
        assert!(truncated.ends_with("\x1b[0m"), "truncated: {truncated:?}");
    }
}
