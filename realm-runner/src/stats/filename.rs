// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference of the source file a test class lives in.
//!
//! Stats are keyed by file rather than by class, so that they line up with what a developer sees
//! in the repository. The file is derived from the class name: known base classes pick the
//! directory, and the class name is converted to a snake-case path.

use crate::config::StatsConfig;
use std::collections::{BTreeMap, HashMap};

/// What the host framework knows about a test class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestClassInfo {
    ancestors: Vec<String>,
    test_filename: Option<String>,
}

impl TestClassInfo {
    /// Creates class info from the class's ancestors, nearest first.
    pub fn new(ancestors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ancestors: ancestors.into_iter().map(Into::into).collect(),
            test_filename: None,
        }
    }

    /// Sets an explicit file name, used verbatim instead of the inferred one.
    pub fn with_test_filename(mut self, test_filename: impl Into<String>) -> Self {
        self.test_filename = Some(test_filename.into());
        self
    }

    /// The class's ancestors, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// The explicit file name, if the class declares one.
    pub fn test_filename(&self) -> Option<&str> {
        self.test_filename.as_deref()
    }
}

/// Resolves class names to [`TestClassInfo`].
///
/// Implemented by the host, which knows about its test classes.
pub trait TestClassLookup {
    /// Returns information about `class_name`, or `None` if nothing is known about it.
    fn lookup(&self, class_name: &str) -> Option<TestClassInfo>;
}

/// A lookup that knows nothing, so that every class lands in the default directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClassInfo;

impl TestClassLookup for NoClassInfo {
    fn lookup(&self, _class_name: &str) -> Option<TestClassInfo> {
        None
    }
}

impl TestClassLookup for BTreeMap<String, TestClassInfo> {
    fn lookup(&self, class_name: &str) -> Option<TestClassInfo> {
        self.get(class_name).cloned()
    }
}

impl TestClassLookup for HashMap<String, TestClassInfo> {
    fn lookup(&self, class_name: &str) -> Option<TestClassInfo> {
        self.get(class_name).cloned()
    }
}

/// Infers test file names from class names.
#[derive(Clone, Copy)]
pub struct FilenameInferrer<'a> {
    config: &'a StatsConfig,
    lookup: &'a dyn TestClassLookup,
}

impl<'a> FilenameInferrer<'a> {
    /// Creates a new inferrer.
    pub fn new(config: &'a StatsConfig, lookup: &'a dyn TestClassLookup) -> Self {
        Self { config, lookup }
    }

    /// Returns the file that `class_name` is defined in.
    pub fn infer(&self, class_name: &str) -> String {
        let info = self.lookup.lookup(class_name);
        if let Some(filename) = info.as_ref().and_then(TestClassInfo::test_filename) {
            return filename.to_owned();
        }

        let mut filename = self.class_directory(info.as_ref());
        filename.push_str(&class_to_filename(class_name));
        filename.push_str(self.config.file_extension());
        filename
    }

    /// Returns the directory, including the test root, for a class with the given info.
    pub fn class_directory(&self, info: Option<&TestClassInfo>) -> String {
        let directory = info
            .into_iter()
            .flat_map(|info| info.ancestors())
            .find_map(|ancestor| self.config.directory_for_base(ancestor))
            .unwrap_or_else(|| self.config.default_directory());
        format!("{}{}", self.config.test_root(), directory)
    }
}

/// Converts a class name to a snake-case relative path, e.g. `Admin::UsersController` to
/// `admin/users_controller`.
///
/// Names that don't start with an ASCII letter are returned unchanged.
pub fn class_to_filename(class_name: &str) -> String {
    if !class_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return class_name.to_owned();
    }

    let mut word = String::with_capacity(class_name.len() + 8);
    for c in class_name.chars() {
        if c.is_ascii_uppercase() {
            word.push('_');
            word.push(c.to_ascii_lowercase());
        } else {
            word.push(c);
        }
    }

    let word = word.replace("::", "/");
    let word = word.strip_prefix('_').unwrap_or(&word);
    word.replace("/_", "/").replace('-', "_")
}
