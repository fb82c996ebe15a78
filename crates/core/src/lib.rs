// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure decision and aggregation logic for the ticket service.
//!
//! Nothing in this crate performs I/O. Callers load tickets and directory
//! entries, then ask this crate who may do what and how the corpus
//! aggregates.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod policy;
mod stats;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use policy::AccessPolicy;
pub use stats::{
    StatsReport, StatusCounts, assigned_agent_ids, average_resolution_hours, summarize,
};
