// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orders tests by fixture realm.
//!
//! The external framework hands over a tree of suites. [`FixtureOrderedSuite`] flattens that tree
//! and sorts the leaf tests by `(realm, class, method)`, so that tests needing the same fixtures
//! run next to each other and the order is the same from one run to the next.

use std::fmt;
use tracing::debug;

/// A leaf test as seen by the ordering pass.
pub trait OrderedTest {
    /// The fixture realm this test belongs to, if any.
    ///
    /// Tests without a realm sort as if their realm were the empty string.
    fn fixture_realm(&self) -> Option<&str>;

    /// The fully qualified name of the class that declares this test.
    fn class_name(&self) -> &str;

    /// The name of the test method.
    fn method_name(&self) -> &str;

    /// The name the framework reports for this test, of the form `<method> (<Class>)`.
    fn display_name(&self) -> String {
        format!("{} ({})", self.method_name(), self.class_name())
    }
}

impl<T: OrderedTest + ?Sized> OrderedTest for &T {
    fn fixture_realm(&self) -> Option<&str> {
        (**self).fixture_realm()
    }

    fn class_name(&self) -> &str {
        (**self).class_name()
    }

    fn method_name(&self) -> &str {
        (**self).method_name()
    }

    fn display_name(&self) -> String {
        (**self).display_name()
    }
}

/// The sort key for a test.
///
/// Fields are compared in declaration order, and the first unequal field decides.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OrderingKey<'a> {
    /// The fixture realm, or `""` if the test has none.
    pub realm: &'a str,

    /// The fully qualified class name.
    pub class_name: &'a str,

    /// The method name.
    pub method_name: &'a str,
}

impl<'a> OrderingKey<'a> {
    /// Returns the key for `test`.
    pub fn for_test<T: OrderedTest + ?Sized>(test: &'a T) -> Self {
        Self {
            realm: test.fixture_realm().unwrap_or_default(),
            class_name: test.class_name(),
            method_name: test.method_name(),
        }
    }
}

/// A node in the suite tree handed over by the framework.
#[derive(Clone, Debug)]
pub enum SuiteNode<T> {
    /// A suite containing further suites and tests.
    Suite {
        /// The suite's name.
        name: String,

        /// The suite's children, in the order the framework declared them.
        children: Vec<SuiteNode<T>>,
    },

    /// A single test.
    Test(T),
}

impl<T> SuiteNode<T> {
    /// Creates a suite node.
    pub fn suite(name: impl Into<String>, children: impl IntoIterator<Item = SuiteNode<T>>) -> Self {
        Self::Suite {
            name: name.into(),
            children: children.into_iter().collect(),
        }
    }

    /// Returns the number of leaf tests under this node.
    pub fn size(&self) -> usize {
        match self {
            Self::Suite { children, .. } => children.iter().map(Self::size).sum(),
            Self::Test(_) => 1,
        }
    }

    fn flatten_into(self, acc: &mut Vec<T>) {
        match self {
            Self::Suite { children, .. } => {
                for child in children {
                    child.flatten_into(acc);
                }
            }
            Self::Test(test) => acc.push(test),
        }
    }
}

/// A flat suite of tests, ordered by fixture realm, then class, then method.
#[derive(Clone, Debug)]
pub struct FixtureOrderedSuite<T> {
    name: String,
    tests: Vec<T>,
}

impl<T: OrderedTest> FixtureOrderedSuite<T> {
    /// Flattens `root` and orders its tests.
    ///
    /// A root that is itself a test produces a single-test suite with an empty name.
    pub fn new(root: SuiteNode<T>) -> Self {
        let name = match &root {
            SuiteNode::Suite { name, .. } => name.clone(),
            SuiteNode::Test(_) => String::new(),
        };

        let mut tests = Vec::with_capacity(root.size());
        root.flatten_into(&mut tests);
        tests.sort_by(|a, b| OrderingKey::for_test(a).cmp(&OrderingKey::for_test(b)));

        debug!(
            "ordered {} tests in suite `{name}`:\n{}",
            tests.len(),
            DisplayOrder { tests: &tests }
        );

        Self { name, tests }
    }

    /// Returns a displayer listing each test's realm, class and method, one per line.
    pub fn display_order(&self) -> impl fmt::Display + '_ {
        DisplayOrder { tests: &self.tests }
    }
}

impl<T> FixtureOrderedSuite<T> {
    /// The name of the root suite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered tests.
    pub fn tests(&self) -> &[T] {
        &self.tests
    }

    /// The number of tests.
    pub fn size(&self) -> usize {
        self.tests.len()
    }

    /// Consumes the suite, returning the ordered tests.
    pub fn into_tests(self) -> Vec<T> {
        self.tests
    }
}

struct DisplayOrder<'a, T> {
    tests: &'a [T],
}

impl<T: OrderedTest> fmt::Display for DisplayOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for test in self.tests {
            writeln!(
                f,
                "  {} {} {}",
                test.fixture_realm().unwrap_or_default(),
                test.class_name(),
                test.method_name()
            )?;
        }
        Ok(())
    }
}
