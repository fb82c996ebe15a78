// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket mutations.
//!
//! Every write that can change a status stores the closing timestamp the
//! domain computed for it. Each mutation runs in an immediate transaction
//! so concurrent writers to the same ticket are serialized by `SQLite`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mandodesk_domain::{NewTicket, Ticket, TicketUpdate};
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{ticket_comments, tickets};
use crate::error::PersistenceError;
use crate::queries;
use crate::timestamps::{format_optional_timestamp, format_timestamp};

fn reload(conn: &mut SqliteConnection, ticket_id: i64) -> Result<Ticket, PersistenceError> {
    queries::get_ticket(conn, ticket_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("ticket {ticket_id}")))
}

/// Inserts a new ticket.
///
/// # Returns
///
/// The stored ticket, with its assigned ID and no comments.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the creator or
/// assignee does not reference a directory user.
pub fn insert_ticket(
    conn: &mut SqliteConnection,
    ticket: &NewTicket,
) -> Result<Ticket, PersistenceError> {
    let created_at: String = format_timestamp(ticket.created_at)?;
    let closed_at: Option<String> = format_optional_timestamp(ticket.closed_at())?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(tickets::table)
            .values((
                tickets::title.eq(&ticket.title),
                tickets::description.eq(&ticket.description),
                tickets::status.eq(ticket.status.as_str()),
                tickets::priority.eq(ticket.priority.as_str()),
                tickets::created_by.eq(ticket.created_by),
                tickets::assigned_to.eq(ticket.assigned_to),
                tickets::created_at.eq(&created_at),
                tickets::updated_at.eq(&created_at),
                tickets::closed_at.eq(&closed_at),
            ))
            .execute(conn)?;

        let ticket_id: i64 = get_last_insert_rowid(conn)?;
        debug!(
            ticket_id,
            created_by = ticket.created_by,
            status = %ticket.status,
            priority = %ticket.priority,
            "Created ticket"
        );
        reload(conn, ticket_id)
    })
}

/// Applies a status/assignment update to a stored ticket.
///
/// The ticket is read, updated by the domain, and written back inside one
/// transaction.
///
/// # Returns
///
/// The updated ticket, or `None` if no ticket has the given ID.
///
/// # Errors
///
/// Returns an error if the read or the write fails.
pub fn update_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    update: &TicketUpdate,
    now: OffsetDateTime,
) -> Result<Option<Ticket>, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let Some(mut ticket) = queries::get_ticket(conn, ticket_id)? else {
            return Ok(None);
        };

        ticket.apply_update(update, now);

        diesel::update(tickets::table.filter(tickets::ticket_id.eq(ticket_id)))
            .set((
                tickets::status.eq(ticket.status.as_str()),
                tickets::assigned_to.eq(ticket.assigned_to),
                tickets::updated_at.eq(format_timestamp(ticket.updated_at)?),
                tickets::closed_at.eq(format_optional_timestamp(ticket.closed_at)?),
            ))
            .execute(conn)?;

        debug!(
            ticket_id,
            status = %ticket.status,
            assigned_to = ?ticket.assigned_to,
            "Updated ticket"
        );
        reload(conn, ticket_id).map(Some)
    })
}

/// Appends a comment to a stored ticket.
///
/// The comment is a single row insert. The ticket's `updated_at` is
/// refreshed in the same transaction.
///
/// # Returns
///
/// The ticket with all of its comments, or `None` if no ticket has the
/// given ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the author does
/// not reference a directory user.
pub fn append_comment(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    author: i64,
    message: &str,
    now: OffsetDateTime,
) -> Result<Option<Ticket>, PersistenceError> {
    let created_at: String = format_timestamp(now)?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if !queries::ticket_exists(conn, ticket_id)? {
            return Ok(None);
        }

        diesel::insert_into(ticket_comments::table)
            .values((
                ticket_comments::ticket_id.eq(ticket_id),
                ticket_comments::author_id.eq(author),
                ticket_comments::message.eq(message),
                ticket_comments::created_at.eq(&created_at),
            ))
            .execute(conn)?;
        let comment_id: i64 = get_last_insert_rowid(conn)?;

        diesel::update(tickets::table.filter(tickets::ticket_id.eq(ticket_id)))
            .set(tickets::updated_at.eq(&created_at))
            .execute(conn)?;

        debug!(ticket_id, comment_id, author, "Appended comment");
        reload(conn, ticket_id).map(Some)
    })
}
