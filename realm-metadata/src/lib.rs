// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to the per-test statistics document written by `realm-runner`.
//!
//! The document is a YAML mapping keyed by the inferred source file of each test class. Each entry
//! records the class name, the cumulative time spent in the file during the last run that touched
//! it, and per-case timing and pass/fail history.
//!
//! This crate has no opinion on how the document is merged or stored; see `realm-runner` for that.

mod errors;
mod stats;

pub use errors::*;
pub use stats::*;
