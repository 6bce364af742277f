// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Test ordering by fixture realm, and a console reporter that keeps per-test statistics across
//! runs.
//!
//! Both halves plug into an external test framework:
//!
//! * [`ordering`] flattens the framework's suite tree and orders tests so that everything sharing
//!   a fixture realm runs contiguously.
//! * [`reporter`] consumes the framework's lifecycle events, prints live progress, and records
//!   timing and pass/fail history into a [`stats::StatsStore`]. The host flushes that store once
//!   at shutdown through [`stats::StatsPersistence`].

pub mod config;
pub mod errors;
mod helpers;
pub mod ordering;
pub mod output;
pub mod reporter;
pub mod stats;
mod time;
