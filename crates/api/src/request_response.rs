// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests tolerate missing fields: a missing title or message is treated
//! as blank and rejected by validation rather than by deserialization.

use std::collections::BTreeMap;

use mandodesk::{StatsReport, StatusCounts};
use mandodesk_domain::{Comment, Priority, Ticket, TicketStatus, UserSummary};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// API request to open a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTicketRequest {
    /// Short summary of the problem.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// `Low`, `Medium`, or `High`. Anything else means `Medium`.
    pub priority: Option<String>,
}

/// API request to change a ticket's status or assignee.
///
/// Absent or empty fields leave the ticket unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTicketRequest {
    /// The new status wire string.
    pub status: Option<String>,
    /// The directory ID of the new assignee.
    pub assigned_to: Option<i64>,
}

/// API request to append a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddCommentRequest {
    /// The comment body.
    pub message: String,
}

/// API request to list directory users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListUsersRequest {
    /// Restricts the listing to one role.
    pub role: Option<String>,
}

/// A ticket with its creator and assignee expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub ticket_id: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub created_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub closed_at: Option<OffsetDateTime>,
    /// Comments in append order.
    pub comments: Vec<Comment>,
}

impl TicketResponse {
    pub(crate) fn from_ticket(
        ticket: Ticket,
        created_by: UserSummary,
        assigned_to: Option<UserSummary>,
    ) -> Self {
        Self {
            ticket_id: ticket.ticket_id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            priority: ticket.priority,
            created_by,
            assigned_to,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            closed_at: ticket.closed_at,
            comments: ticket.comments,
        }
    }
}

/// Per-status counts keyed by status wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCountsResponse {
    #[serde(rename = "Open")]
    pub open: u64,
    #[serde(rename = "In Progress")]
    pub in_progress: u64,
    #[serde(rename = "Resolved")]
    pub resolved: u64,
    #[serde(rename = "Closed")]
    pub closed: u64,
}

impl From<StatusCounts> for StatusCountsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            open: counts.get(TicketStatus::Open),
            in_progress: counts.get(TicketStatus::InProgress),
            resolved: counts.get(TicketStatus::Resolved),
            closed: counts.get(TicketStatus::Closed),
        }
    }
}

/// API response for the admin statistics summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummaryResponse {
    /// Ticket counts per status; every status is present.
    pub by_status: StatusCountsResponse,
    /// Assigned ticket counts keyed by agent display name.
    pub by_agent: BTreeMap<String, u64>,
    /// Mean hours from opening to closing, rounded to 2 decimals.
    pub avg_resolution_hours: f64,
}

impl From<StatsReport> for StatsSummaryResponse {
    fn from(report: StatsReport) -> Self {
        Self {
            by_status: report.by_status.into(),
            by_agent: report.by_agent,
            avg_resolution_hours: report.avg_resolution_hours,
        }
    }
}
