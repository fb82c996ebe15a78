// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregation over the full ticket corpus.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use mandodesk_domain::{Ticket, TicketStatus};
use time::Duration;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Per-status ticket counts.
///
/// Every status is always present, zero or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    /// Tickets in `Open`.
    pub open: u64,
    /// Tickets in `In Progress`.
    pub in_progress: u64,
    /// Tickets in `Resolved`.
    pub resolved: u64,
    /// Tickets in `Closed`.
    pub closed: u64,
}

impl StatusCounts {
    /// Returns the count for a status.
    #[must_use]
    pub const fn get(&self, status: TicketStatus) -> u64 {
        match status {
            TicketStatus::Open => self.open,
            TicketStatus::InProgress => self.in_progress,
            TicketStatus::Resolved => self.resolved,
            TicketStatus::Closed => self.closed,
        }
    }

    const fn increment(&mut self, status: TicketStatus) {
        match status {
            TicketStatus::Open => self.open += 1,
            TicketStatus::InProgress => self.in_progress += 1,
            TicketStatus::Resolved => self.resolved += 1,
            TicketStatus::Closed => self.closed += 1,
        }
    }

    /// Returns the total across all statuses.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.open + self.in_progress + self.resolved + self.closed
    }
}

/// The admin statistics report.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    /// Ticket counts per status.
    pub by_status: StatusCounts,
    /// Assigned ticket counts keyed by agent display name.
    pub by_agent: BTreeMap<String, u64>,
    /// Mean time from opening to closing, in hours, rounded to 2 decimals.
    pub avg_resolution_hours: f64,
}

/// Returns the distinct assignee ids across the tickets, for directory lookup.
#[must_use]
pub fn assigned_agent_ids(tickets: &[Ticket]) -> Vec<i64> {
    tickets
        .iter()
        .filter_map(|ticket| ticket.assigned_to)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect()
}

/// Computes the mean resolution time in hours over closed tickets.
///
/// Only tickets whose status is Resolved or Closed and that carry a closing
/// timestamp qualify. Returns 0 when no ticket qualifies.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_resolution_hours(tickets: &[Ticket]) -> f64 {
    let (total, count): (Duration, u64) = tickets
        .iter()
        .filter_map(Ticket::resolution_time)
        .fold((Duration::ZERO, 0), |(total, count), elapsed| {
            (total + elapsed, count + 1)
        });

    if count == 0 {
        return 0.0;
    }

    let hours: f64 = total.as_seconds_f64() / count as f64 / SECONDS_PER_HOUR;
    round_to_hundredths(hours)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds the statistics report.
///
/// # Arguments
///
/// * `tickets` - The full ticket corpus, unfiltered
/// * `agent_names` - Display names for assignee ids; ids without an entry
///   are reported under their raw id
///
/// Agents that share a display name are reported under one key with their
/// counts summed.
#[must_use]
pub fn summarize(tickets: &[Ticket], agent_names: &HashMap<i64, String>) -> StatsReport {
    let mut by_status: StatusCounts = StatusCounts::default();
    let mut by_agent_id: BTreeMap<i64, u64> = BTreeMap::new();

    for ticket in tickets {
        by_status.increment(ticket.status);
        if let Some(agent_id) = ticket.assigned_to {
            *by_agent_id.entry(agent_id).or_insert(0) += 1;
        }
    }

    let mut by_agent: BTreeMap<String, u64> = BTreeMap::new();
    for (agent_id, count) in by_agent_id {
        let key: String = agent_names
            .get(&agent_id)
            .cloned()
            .unwrap_or_else(|| agent_id.to_string());
        *by_agent.entry(key).or_insert(0) += count;
    }

    StatsReport {
        by_status,
        by_agent,
        avg_resolution_hours: average_resolution_hours(tickets),
    }
}
