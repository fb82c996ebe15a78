// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket service operations.
//!
//! Every operation takes the store and the calling principal explicitly,
//! applies the access policy, and returns an API DTO or an `ApiError`.

use std::collections::{BTreeSet, HashMap};

use mandodesk::{AccessPolicy, StatsReport, assigned_agent_ids, summarize};
use mandodesk_domain::{
    NewTicket, Principal, Priority, Role, Ticket, TicketFilter, TicketStatus, TicketUpdate,
    UserSummary, validate_comment_message, validate_ticket_fields, validate_user_fields,
};
use mandodesk_persistence::{Persistence, UserData, current_timestamp};
use tracing::info;

use crate::error::{ApiError, store_error, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddCommentRequest, CreateTicketRequest, ListUsersRequest, StatsSummaryResponse,
    TicketResponse, UpdateTicketRequest,
};

/// Directory users ensured by `seed_demo_users`, as `(name, email, role)`.
pub const DEMO_USERS: [(&str, &str, Role); 3] = [
    ("Admin", "admin@mandodesk.dev", Role::Admin),
    ("Agent One", "agent@mandodesk.dev", Role::Agent),
    ("Demo Customer", "customer@mandodesk.dev", Role::Customer),
];

/// Expands creator and assignee IDs into directory entries.
///
/// Users are fetched with one directory query for the whole batch.
fn expand_tickets(
    persistence: &mut Persistence,
    tickets: Vec<Ticket>,
) -> Result<Vec<TicketResponse>, ApiError> {
    let user_ids: Vec<i64> = tickets
        .iter()
        .flat_map(|ticket| std::iter::once(ticket.created_by).chain(ticket.assigned_to))
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();

    let users: HashMap<i64, UserSummary> = persistence
        .get_users_by_ids(&user_ids)
        .map_err(store_error("Failed to load ticket users"))?
        .into_iter()
        .map(|user| (user.user_id, UserSummary::from(user)))
        .collect();

    tickets
        .into_iter()
        .map(|ticket| {
            let created_by: UserSummary = users
                .get(&ticket.created_by)
                .cloned()
                .ok_or_else(|| ApiError::Internal {
                    message: format!(
                        "Ticket {} references missing creator {}",
                        ticket.ticket_id, ticket.created_by
                    ),
                })?;
            let assigned_to: Option<UserSummary> =
                ticket.assigned_to.and_then(|id| users.get(&id).cloned());
            Ok(TicketResponse::from_ticket(ticket, created_by, assigned_to))
        })
        .collect()
}

fn expand_ticket(persistence: &mut Persistence, ticket: Ticket) -> Result<TicketResponse, ApiError> {
    expand_tickets(persistence, vec![ticket])?
        .pop()
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Ticket expansion produced no result"),
        })
}

fn load_ticket(persistence: &mut Persistence, ticket_id: i64) -> Result<Ticket, ApiError> {
    persistence
        .get_ticket(ticket_id)
        .map_err(store_error("Failed to load ticket"))?
        .ok_or_else(|| ApiError::ticket_not_found(ticket_id))
}

/// Opens a ticket on behalf of the principal.
///
/// Any authenticated principal may open a ticket. The ticket starts `Open`
/// and unassigned; an absent or unrecognized priority means `Medium`.
///
/// # Arguments
///
/// * `persistence` - The ticket store
/// * `principal` - The caller, recorded as the ticket's creator
/// * `request` - The ticket fields
///
/// # Errors
///
/// Returns an error if:
/// - The title or description is blank (nothing is stored)
/// - The store fails
pub fn create_ticket(
    persistence: &mut Persistence,
    principal: &Principal,
    request: CreateTicketRequest,
) -> Result<TicketResponse, ApiError> {
    validate_ticket_fields(&request.title, &request.description)
        .map_err(translate_domain_error)?;

    let priority: Priority = Priority::parse_or_default(request.priority.as_deref());
    let new_ticket: NewTicket = NewTicket::new(
        request.title,
        request.description,
        priority,
        principal.id,
        current_timestamp(),
    );

    let ticket: Ticket = persistence
        .insert_ticket(&new_ticket)
        .map_err(store_error("Failed to create ticket"))?;

    info!(
        ticket_id = ticket.ticket_id,
        created_by = principal.id,
        "Ticket opened"
    );
    expand_ticket(persistence, ticket)
}

/// Lists the tickets visible to the principal, newest first.
///
/// - customer: tickets they created
/// - agent: tickets assigned to them
/// - admin: every ticket
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_tickets(
    persistence: &mut Persistence,
    principal: &Principal,
) -> Result<Vec<TicketResponse>, ApiError> {
    let filter: TicketFilter = AccessPolicy::list_filter(principal);
    let tickets: Vec<Ticket> = persistence
        .list_tickets(filter)
        .map_err(store_error("Failed to list tickets"))?;
    expand_tickets(persistence, tickets)
}

/// Returns one ticket if the principal may read it.
///
/// # Errors
///
/// Returns an error if:
/// - No ticket has the ID
/// - The principal may not read the ticket
/// - The store fails
pub fn get_ticket(
    persistence: &mut Persistence,
    principal: &Principal,
    ticket_id: i64,
) -> Result<TicketResponse, ApiError> {
    let ticket: Ticket = load_ticket(persistence, ticket_id)?;
    AccessPolicy::authorize_read(principal, &ticket).map_err(translate_core_error)?;
    expand_ticket(persistence, ticket)
}

/// Changes a ticket's status and/or assignee.
///
/// The role check runs before the ticket is looked up, so a customer is
/// refused even for a ticket that does not exist. An absent or empty
/// status and an absent assignee leave those fields unchanged.
///
/// # Arguments
///
/// * `persistence` - The ticket store
/// * `principal` - The caller; must be an agent or admin
/// * `ticket_id` - The ticket to change
/// * `request` - The fields to change
///
/// # Errors
///
/// Returns an error if:
/// - The principal is a customer
/// - The status string is not a known status
/// - The assignee is not a directory user
/// - No ticket has the ID
/// - The store fails
pub fn update_ticket(
    persistence: &mut Persistence,
    principal: &Principal,
    ticket_id: i64,
    request: UpdateTicketRequest,
) -> Result<TicketResponse, ApiError> {
    AccessPolicy::authorize_update(principal).map_err(translate_core_error)?;

    let status: Option<TicketStatus> = match request.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse().map_err(translate_domain_error)?),
    };

    if let Some(assignee) = request.assigned_to {
        let known: bool = persistence
            .get_user_by_id(assignee)
            .map_err(store_error("Failed to look up assignee"))?
            .is_some();
        if !known {
            return Err(ApiError::user_not_found(assignee));
        }
    }

    let update: TicketUpdate = TicketUpdate {
        status,
        assigned_to: request.assigned_to,
    };

    let ticket: Ticket = persistence
        .update_ticket(ticket_id, &update, current_timestamp())
        .map_err(store_error("Failed to update ticket"))?
        .ok_or_else(|| ApiError::ticket_not_found(ticket_id))?;

    info!(
        ticket_id,
        updated_by = principal.id,
        status = %ticket.status,
        "Ticket updated"
    );
    expand_ticket(persistence, ticket)
}

/// Appends a comment authored by the principal.
///
/// # Errors
///
/// Returns an error if:
/// - The message is blank
/// - No ticket has the ID
/// - The principal is a customer who did not create the ticket
/// - The store fails
pub fn add_comment(
    persistence: &mut Persistence,
    principal: &Principal,
    ticket_id: i64,
    request: AddCommentRequest,
) -> Result<TicketResponse, ApiError> {
    validate_comment_message(&request.message).map_err(translate_domain_error)?;

    let ticket: Ticket = load_ticket(persistence, ticket_id)?;
    AccessPolicy::authorize_comment(principal, &ticket).map_err(translate_core_error)?;

    let ticket: Ticket = persistence
        .append_comment(ticket_id, principal.id, &request.message, current_timestamp())
        .map_err(store_error("Failed to append comment"))?
        .ok_or_else(|| ApiError::ticket_not_found(ticket_id))?;

    info!(ticket_id, author = principal.id, "Comment added");
    expand_ticket(persistence, ticket)
}

/// Computes the statistics summary over every ticket.
///
/// Agent keys are display names from the directory; an assignee with no
/// directory entry is reported under its raw ID.
///
/// # Errors
///
/// Returns an error if:
/// - The principal is not an admin
/// - The store fails
pub fn stats_summary(
    persistence: &mut Persistence,
    principal: &Principal,
) -> Result<StatsSummaryResponse, ApiError> {
    AccessPolicy::authorize_stats(principal).map_err(translate_core_error)?;

    let tickets: Vec<Ticket> = persistence
        .list_all_tickets()
        .map_err(store_error("Failed to scan tickets"))?;
    let agent_names: HashMap<i64, String> = persistence
        .lookup_user_names(&assigned_agent_ids(&tickets))
        .map_err(store_error("Failed to look up agent names"))?;

    let report: StatsReport = summarize(&tickets, &agent_names);
    info!(
        tickets = report.by_status.total(),
        agents = report.by_agent.len(),
        "Stats summary computed"
    );
    Ok(report.into())
}

/// Lists directory users ordered by name.
///
/// # Errors
///
/// Returns an error if:
/// - The principal is not an admin
/// - The role filter is not a known role
/// - The store fails
pub fn list_users(
    persistence: &mut Persistence,
    principal: &Principal,
    request: &ListUsersRequest,
) -> Result<Vec<UserSummary>, ApiError> {
    AccessPolicy::authorize_list_users(principal).map_err(translate_core_error)?;

    let role: Option<Role> = match request.role.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse().map_err(translate_domain_error)?),
    };

    let users: Vec<UserData> = persistence
        .list_users(role)
        .map_err(store_error("Failed to list users"))?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

/// Ensures the demo directory users exist.
///
/// Existing users, matched by email, are left as they are.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn seed_demo_users(persistence: &mut Persistence) -> Result<Vec<UserSummary>, ApiError> {
    DEMO_USERS
        .iter()
        .map(|(name, email, role)| {
            validate_user_fields(name, email).map_err(translate_domain_error)?;
            let user: UserData = persistence
                .ensure_user(name, email, *role)
                .map_err(store_error("Failed to seed demo user"))?;
            info!(user_id = user.user_id, email = %user.email, "Demo user ready");
            Ok(UserSummary::from(user))
        })
        .collect()
}
