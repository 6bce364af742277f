// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-test statistics: collecting them during a run, and persisting them across runs.

mod filename;
mod merge;
mod persist;
mod store;

pub use filename::*;
pub use persist::*;
pub use store::*;
