// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket and comment queries.
//!
//! Tickets are always returned with their comments attached, in append
//! order. Listings are ordered newest first, with the ticket ID breaking
//! ties between tickets created in the same microsecond.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use mandodesk_domain::{Comment, Priority, Ticket, TicketFilter, TicketStatus};
use tracing::debug;

use crate::diesel_schema::{ticket_comments, tickets};
use crate::error::PersistenceError;
use crate::timestamps::{parse_optional_timestamp, parse_timestamp};

/// Diesel Queryable struct for ticket rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
struct TicketRow {
    ticket_id: i64,
    title: String,
    description: String,
    status: String,
    priority: String,
    created_by: i64,
    assigned_to: Option<i64>,
    created_at: String,
    updated_at: String,
    closed_at: Option<String>,
}

/// Diesel Queryable struct for comment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = ticket_comments)]
struct CommentRow {
    ticket_id: i64,
    author_id: i64,
    message: String,
    created_at: String,
}

fn comment_from_row(row: CommentRow) -> Result<(i64, Comment), PersistenceError> {
    let created_at = parse_timestamp(&row.created_at)?;
    Ok((
        row.ticket_id,
        Comment {
            author: row.author_id,
            message: row.message,
            created_at,
        },
    ))
}

fn ticket_from_row(row: TicketRow, comments: Vec<Comment>) -> Result<Ticket, PersistenceError> {
    let status: TicketStatus = row.status.parse().map_err(|e| {
        PersistenceError::ReconstructionError(format!("ticket {}: {e}", row.ticket_id))
    })?;
    let priority: Priority = row.priority.parse().map_err(|e| {
        PersistenceError::ReconstructionError(format!("ticket {}: {e}", row.ticket_id))
    })?;

    Ok(Ticket {
        ticket_id: row.ticket_id,
        title: row.title,
        description: row.description,
        status,
        priority,
        created_by: row.created_by,
        assigned_to: row.assigned_to,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        closed_at: parse_optional_timestamp(row.closed_at.as_deref())?,
        comments,
    })
}

/// Loads comments grouped by ticket ID, each group in append order.
///
/// When `ticket_ids` is `None` every comment is loaded.
fn load_comments(
    conn: &mut SqliteConnection,
    ticket_ids: Option<&[i64]>,
) -> Result<HashMap<i64, Vec<Comment>>, PersistenceError> {
    let mut query = ticket_comments::table
        .select(CommentRow::as_select())
        .order(ticket_comments::comment_id.asc())
        .into_boxed();

    if let Some(ids) = ticket_ids {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        query = query.filter(ticket_comments::ticket_id.eq_any(ids));
    }

    let rows: Vec<CommentRow> = query.load(conn)?;

    let mut grouped: HashMap<i64, Vec<Comment>> = HashMap::new();
    for row in rows {
        let (ticket_id, comment) = comment_from_row(row)?;
        grouped.entry(ticket_id).or_default().push(comment);
    }
    Ok(grouped)
}

/// Returns whether a ticket with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn ticket_exists(conn: &mut SqliteConnection, ticket_id: i64) -> Result<bool, PersistenceError> {
    Ok(
        diesel::select(diesel::dsl::exists(
            tickets::table.filter(tickets::ticket_id.eq(ticket_id)),
        ))
        .get_result(conn)?,
    )
}

/// Retrieves a ticket with its comments.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value cannot
/// be reconstructed.
/// Returns `Ok(None)` if the ticket is not found.
pub fn get_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<Ticket>, PersistenceError> {
    debug!(ticket_id, "Loading ticket");

    let Some(row) = tickets::table
        .filter(tickets::ticket_id.eq(ticket_id))
        .select(TicketRow::as_select())
        .first::<TicketRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let mut comments = load_comments(conn, Some(std::slice::from_ref(&ticket_id)))?;
    let ticket_comments: Vec<Comment> = comments.remove(&ticket_id).unwrap_or_default();
    ticket_from_row(row, ticket_comments).map(Some)
}

/// Lists the tickets that pass the filter, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value cannot
/// be reconstructed.
pub fn list_tickets(
    conn: &mut SqliteConnection,
    filter: TicketFilter,
) -> Result<Vec<Ticket>, PersistenceError> {
    debug!(?filter, "Listing tickets");

    let mut query = tickets::table
        .select(TicketRow::as_select())
        .order((tickets::created_at.desc(), tickets::ticket_id.desc()))
        .into_boxed();

    query = match filter {
        TicketFilter::All => query,
        TicketFilter::CreatedBy(user_id) => query.filter(tickets::created_by.eq(user_id)),
        TicketFilter::AssignedTo(user_id) => query.filter(tickets::assigned_to.eq(user_id)),
    };

    let rows: Vec<TicketRow> = query.load(conn)?;

    let mut comments = match filter {
        TicketFilter::All => load_comments(conn, None)?,
        TicketFilter::CreatedBy(_) | TicketFilter::AssignedTo(_) => {
            let ids: Vec<i64> = rows.iter().map(|row| row.ticket_id).collect();
            load_comments(conn, Some(&ids))?
        }
    };

    rows.into_iter()
        .map(|row| {
            let ticket_comments: Vec<Comment> =
                comments.remove(&row.ticket_id).unwrap_or_default();
            ticket_from_row(row, ticket_comments)
        })
        .collect()
}

/// Counts every stored ticket.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tickets(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(tickets::table.count().get_result(conn)?)
}
