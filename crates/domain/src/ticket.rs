// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Priority, TicketStatus};

/// Computes the closing timestamp a ticket must carry after a write.
///
/// The closing timestamp is set exactly once: the first time the ticket's
/// status is a closing status. Once set it is returned unchanged no matter
/// what status follows, so toggling away from and back to a closing status
/// keeps the original value.
///
/// Every write path that can set a status must route through this function
/// before persisting.
///
/// # Arguments
///
/// * `status` - The status the ticket will have after the write
/// * `existing` - The closing timestamp currently stored, if any
/// * `now` - The time of the write
#[must_use]
pub fn resolve_closed_at(
    status: TicketStatus,
    existing: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    match existing {
        Some(closed_at) => Some(closed_at),
        None if status.is_closing() => Some(now),
        None => None,
    }
}

/// A comment appended to a ticket.
///
/// Comments are immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// The user who wrote the comment.
    pub author: i64,
    /// The comment body.
    pub message: String,
    /// When the comment was appended.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// The store-assigned identifier.
    pub ticket_id: i64,
    /// Short summary of the problem.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Current lifecycle status.
    pub status: TicketStatus,
    /// Current priority.
    pub priority: Priority,
    /// The user who opened the ticket.
    pub created_by: i64,
    /// The agent working the ticket, if assigned.
    pub assigned_to: Option<i64>,
    /// When the ticket was opened.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the ticket was last mutated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// When the ticket first entered a closing status.
    #[serde(with = "time::serde::rfc3339::option")]
    pub closed_at: Option<OffsetDateTime>,
    /// Comments in append order.
    pub comments: Vec<Comment>,
}

impl Ticket {
    /// Applies a status/assignment update in place.
    ///
    /// Fields absent from the update are left untouched. The closing
    /// timestamp is recomputed from the resulting status.
    ///
    /// # Arguments
    ///
    /// * `update` - The fields to change
    /// * `now` - The time of the write
    pub fn apply_update(&mut self, update: &TicketUpdate, now: OffsetDateTime) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(assigned_to) = update.assigned_to {
            self.assigned_to = Some(assigned_to);
        }
        self.closed_at = resolve_closed_at(self.status, self.closed_at, now);
        self.updated_at = now;
    }

    /// Returns the time between opening and closing, if the ticket is in a
    /// closing status and has a closing timestamp.
    #[must_use]
    pub fn resolution_time(&self) -> Option<time::Duration> {
        if !self.status.is_closing() {
            return None;
        }
        self.closed_at.map(|closed_at| closed_at - self.created_at)
    }
}

/// A ticket that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Short summary of the problem.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Initial status.
    pub status: TicketStatus,
    /// Initial priority.
    pub priority: Priority,
    /// The user opening the ticket.
    pub created_by: i64,
    /// Initial assignee.
    pub assigned_to: Option<i64>,
    /// Creation time.
    pub created_at: OffsetDateTime,
}

impl NewTicket {
    /// Creates an open, unassigned ticket.
    ///
    /// # Arguments
    ///
    /// * `title` - Short summary
    /// * `description` - Full description
    /// * `priority` - Priority
    /// * `created_by` - The creating user
    /// * `created_at` - Creation time
    #[must_use]
    pub const fn new(
        title: String,
        description: String,
        priority: Priority,
        created_by: i64,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            title,
            description,
            status: TicketStatus::Open,
            priority,
            created_by,
            assigned_to: None,
            created_at,
        }
    }

    /// Overrides the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets an initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assigned_to: i64) -> Self {
        self.assigned_to = Some(assigned_to);
        self
    }

    /// The closing timestamp the ticket carries at creation.
    #[must_use]
    pub fn closed_at(&self) -> Option<OffsetDateTime> {
        resolve_closed_at(self.status, None, self.created_at)
    }
}

/// Fields an agent or admin may change on an existing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketUpdate {
    /// New status, if changing.
    pub status: Option<TicketStatus>,
    /// New assignee, if changing.
    pub assigned_to: Option<i64>,
}
