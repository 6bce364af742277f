// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::DisplayNameParseError;
use regex::Regex;
use std::sync::LazyLock;

static DISPLAY_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Some frameworks prefix generated test names with "test: ".
    Regex::new(r"^(?:test: )?(.*)(\([^)]+\))$").expect("display name regex is valid")
});

/// A test display name split into its case and class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedTestName {
    case_name: String,
    class_name: String,
}

impl ParsedTestName {
    /// Parses a name of the form `<case> (<Class>)`.
    pub fn parse(name: &str) -> Result<Self, DisplayNameParseError> {
        let captures = DISPLAY_NAME_REGEX
            .captures(name)
            .ok_or_else(|| DisplayNameParseError::new(name))?;
        let case_name = captures[1].trim();
        let class_name = captures[2]
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(&captures[2]);

        Ok(Self {
            case_name: case_name.to_owned(),
            class_name: class_name.to_owned(),
        })
    }

    /// The test case (method) name.
    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// The fully qualified class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}
