// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::StatsFormatError;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, btree_map},
    fmt,
};

/// The persisted statistics document, keyed by inferred test file path.
///
/// Files are kept in sorted order so that the serialized form is stable and diffs cleanly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsDocument {
    files: BTreeMap<String, FileStats>,
}

impl StatsDocument {
    /// Creates a new, empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from YAML.
    ///
    /// Empty input, a lone document marker and a bare YAML null all produce an empty document.
    pub fn from_yaml_str(input: &str) -> Result<Self, StatsFormatError> {
        let body = input.trim();
        if body.is_empty() || body == "---" {
            return Ok(Self::default());
        }
        let files: Option<BTreeMap<String, FileStats>> =
            serde_yaml::from_str(input).map_err(StatsFormatError::Deserialize)?;
        Ok(Self {
            files: files.unwrap_or_default(),
        })
    }

    /// Serializes this document to YAML.
    pub fn to_yaml_string(&self) -> Result<String, StatsFormatError> {
        serde_yaml::to_string(self).map_err(StatsFormatError::Serialize)
    }

    /// Returns true if the document has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the number of files in the document.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns the stats recorded for `file`, if any.
    pub fn get(&self, file: &str) -> Option<&FileStats> {
        self.files.get(file)
    }

    /// Returns a mutable reference to the stats recorded for `file`, if any.
    pub fn get_mut(&mut self, file: &str) -> Option<&mut FileStats> {
        self.files.get_mut(file)
    }

    /// Returns the stats for `file`, inserting an empty entry if it isn't present.
    pub fn file_mut(&mut self, file: impl Into<String>) -> &mut FileStats {
        self.files.entry(file.into()).or_default()
    }

    /// Inserts stats for `file`, returning the previous value.
    pub fn insert(&mut self, file: impl Into<String>, stats: FileStats) -> Option<FileStats> {
        self.files.insert(file.into(), stats)
    }

    /// Iterates over files in sorted order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FileStats> {
        self.files.iter()
    }
}

impl IntoIterator for StatsDocument {
    type Item = (String, FileStats);
    type IntoIter = btree_map::IntoIter<String, FileStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a StatsDocument {
    type Item = (&'a String, &'a FileStats);
    type IntoIter = btree_map::Iter<'a, String, FileStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl FromIterator<(String, FileStats)> for StatsDocument {
    fn from_iter<I: IntoIterator<Item = (String, FileStats)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Statistics for a single test file.
///
/// Keys starting with `_` hold file-level data. Every other key is a test case name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    /// The fully qualified name of the test class that lives in this file.
    #[serde(rename = "_class", default)]
    pub class_name: String,

    /// Total seconds spent in this file during the last run that executed it.
    #[serde(rename = "_seconds", default)]
    pub seconds: f64,

    /// Per-case statistics, keyed by case name.
    #[serde(flatten)]
    pub cases: BTreeMap<String, CaseStats>,
}

/// Statistics for a single test case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseStats {
    /// Duration of the latest run of this case, in seconds.
    pub seconds: f64,

    /// Result of the latest run.
    pub last_result: LastResult,

    /// When the latest run started, as `"<unix seconds> <RFC 2822 time>"`.
    pub last_run: String,

    /// The `last_run` value at which `last_result` last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

/// The outcome of a test case.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastResult {
    /// The case finished without faults.
    Success,

    /// The case reported at least one failure or error.
    Failure,
}

impl LastResult {
    /// Returns the result for a case that reported `fault_count` faults.
    pub fn from_fault_count(fault_count: usize) -> Self {
        if fault_count == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }

    /// Returns true if this is [`LastResult::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the string stored in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for LastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(""; "empty")]
    #[test_case("   \n"; "whitespace")]
    #[test_case("---\n"; "document marker only")]
    #[test_case("~\n"; "null")]
    fn parse_empty(input: &str) {
        let doc = StatsDocument::from_yaml_str(input).expect("empty input is valid");
        assert!(doc.is_empty(), "for input {input:?}");
    }

    #[test]
    fn parse_document() {
        let input = indoc! {"
            ---
            test/functional/admin/users_controller.rb:
              _class: Admin::UsersController
              _seconds: 1.25
              test_index:
                seconds: 0.75
                last_result: success
                last_run: 1700000000 Tue, 14 Nov 2023 22:13:20 +0000
                since: 1699990000 Tue, 14 Nov 2023 19:26:40 +0000
              test_show:
                seconds: 0.5
                last_result: failure
                last_run: 1700000001 Tue, 14 Nov 2023 22:13:21 +0000
        "};

        let doc = StatsDocument::from_yaml_str(input).expect("document is valid");
        assert_eq!(doc.len(), 1);

        let file = doc
            .get("test/functional/admin/users_controller.rb")
            .expect("file is present");
        assert_eq!(file.class_name, "Admin::UsersController");
        assert_eq!(file.seconds, 1.25);
        assert_eq!(file.cases.len(), 2);

        let index = &file.cases["test_index"];
        assert_eq!(index.last_result, LastResult::Success);
        assert_eq!(
            index.since.as_deref(),
            Some("1699990000 Tue, 14 Nov 2023 19:26:40 +0000")
        );

        let show = &file.cases["test_show"];
        assert_eq!(show.last_result, LastResult::Failure);
        assert_eq!(show.since, None);
    }

    #[test]
    fn integer_seconds_are_accepted() {
        let input = indoc! {"
            test/unit/widget_test.rb:
              _class: WidgetTest
              _seconds: 3
              test_spin:
                seconds: 3
                last_result: success
                last_run: 1700000000 Tue, 14 Nov 2023 22:13:20 +0000
        "};

        let doc = StatsDocument::from_yaml_str(input).expect("document is valid");
        let file = doc.get("test/unit/widget_test.rb").expect("file is present");
        assert_eq!(file.seconds, 3.0);
        assert_eq!(file.cases["test_spin"].seconds, 3.0);
    }

    #[test]
    fn serialized_form_reparses() {
        let mut doc = StatsDocument::new();
        let file = doc.file_mut("test/unit/widget_test.rb");
        file.class_name = "WidgetTest".to_owned();
        file.seconds = 0.5;
        file.cases.insert(
            "test_spin".to_owned(),
            CaseStats {
                seconds: 0.5,
                last_result: LastResult::Failure,
                last_run: "1700000000 Tue, 14 Nov 2023 22:13:20 +0000".to_owned(),
                since: Some("1700000000 Tue, 14 Nov 2023 22:13:20 +0000".to_owned()),
            },
        );

        let yaml = doc.to_yaml_string().expect("serialization succeeds");
        assert!(yaml.contains("_class: WidgetTest"), "yaml: {yaml}");
        assert!(yaml.contains("last_result: failure"), "yaml: {yaml}");

        let reparsed = StatsDocument::from_yaml_str(&yaml).expect("output is valid");
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn parse_rejects_non_mapping() {
        let err = StatsDocument::from_yaml_str("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, StatsFormatError::Deserialize(_)));
    }

    #[test_case(0, LastResult::Success; "no faults")]
    #[test_case(1, LastResult::Failure; "one fault")]
    #[test_case(3, LastResult::Failure; "several faults")]
    fn result_from_fault_count(count: usize, expected: LastResult) {
        assert_eq!(LastResult::from_fault_count(count), expected);
    }
}
