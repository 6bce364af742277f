// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A small stand-in for the host test framework.

use maplit::btreemap;
use realm_runner::{
    ordering::{OrderedTest, SuiteNode},
    reporter::{Reporter, TestEvent},
    stats::TestClassInfo,
};
use std::{collections::BTreeMap, fmt, time::Duration};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FixtureStatus {
    Pass,
    Fail,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeTest {
    pub(crate) realm: Option<&'static str>,
    pub(crate) class_name: &'static str,
    pub(crate) method_name: &'static str,
    pub(crate) status: FixtureStatus,
}

impl FakeTest {
    pub(crate) fn new(
        realm: Option<&'static str>,
        class_name: &'static str,
        method_name: &'static str,
        status: FixtureStatus,
    ) -> Self {
        Self {
            realm,
            class_name,
            method_name,
            status,
        }
    }
}

impl OrderedTest for FakeTest {
    fn fixture_realm(&self) -> Option<&str> {
        self.realm
    }

    fn class_name(&self) -> &str {
        self.class_name
    }

    fn method_name(&self) -> &str {
        self.method_name
    }
}

/// The suite tree, as the framework would discover it.
pub(crate) fn suite(status_of_show: FixtureStatus) -> SuiteNode<FakeTest> {
    use FixtureStatus::*;

    SuiteNode::suite(
        "all tests",
        [
            SuiteNode::suite(
                "unit",
                [
                    SuiteNode::Test(FakeTest::new(None, "WidgetTest", "test_spin", Pass)),
                    SuiteNode::Test(FakeTest::new(Some("billing"), "InvoiceTest", "test_total", Pass)),
                ],
            ),
            SuiteNode::suite(
                "functional",
                [
                    SuiteNode::Test(FakeTest::new(
                        Some("accounts"),
                        "Admin::UsersController",
                        "test_show",
                        status_of_show,
                    )),
                    SuiteNode::Test(FakeTest::new(
                        Some("accounts"),
                        "Admin::UsersController",
                        "test_index",
                        Pass,
                    )),
                ],
            ),
        ],
    )
}

pub(crate) fn class_info() -> BTreeMap<String, TestClassInfo> {
    btreemap! {
        "Admin::UsersController".to_owned() => TestClassInfo::new([
            "Admin::BaseController",
            "ActionController::TestCase",
        ]),
        "InvoiceTest".to_owned() => TestClassInfo::new(["ActiveSupport::TestCase"]),
    }
}

struct Fault<'a>(&'a FakeTest);

impl fmt::Display for Fault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failure:\n{}: assertion failed", self.0.display_name())
    }
}

struct Summary {
    tests: usize,
    failures: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tests, {} failures", self.tests, self.failures)
    }
}

/// Runs `tests` in order, sending lifecycle events to `reporter`.
pub(crate) fn run(suite_name: &str, tests: &[FakeTest], reporter: &mut Reporter<'_>) {
    reporter
        .report_event(TestEvent::SuiteLoaded { name: suite_name })
        .unwrap();
    reporter.report_event(TestEvent::RunStarted).unwrap();

    let mut failures = 0;
    for test in tests {
        let name = test.display_name();
        reporter
            .report_event(TestEvent::TestStarted { name: &name })
            .unwrap();
        if test.status == FixtureStatus::Fail {
            failures += 1;
            reporter
                .report_event(TestEvent::Fault {
                    fault: &Fault(test),
                })
                .unwrap();
        }
        reporter
            .report_event(TestEvent::TestFinished { name: &name })
            .unwrap();
    }

    reporter
        .report_event(TestEvent::RunFinished {
            elapsed: Duration::from_millis(1_500),
            result: &Summary {
                tests: tests.len(),
                failures,
            },
        })
        .unwrap();
}
