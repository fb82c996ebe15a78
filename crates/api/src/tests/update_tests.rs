// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket update tests.

use mandodesk_domain::TicketStatus;

use super::helpers::{assign_request, create_test_desk, open_ticket, status_request};
use crate::{ApiError, UpdateTicketRequest, get_ticket, update_ticket};

#[test]
fn test_customer_update_is_forbidden_even_for_missing_ticket() {
    let mut desk = create_test_desk();
    let customer = desk.customer;
    let ticket = open_ticket(&mut desk, customer, "Mine");

    let own = update_ticket(
        &mut desk.persistence,
        &customer,
        ticket.ticket_id,
        status_request("Closed"),
    );
    let missing = update_ticket(&mut desk.persistence, &customer, 9_999, status_request("Closed"));

    assert!(matches!(
        own,
        Err(ApiError::Unauthorized { ref action, .. }) if action == "update_ticket"
    ));
    assert!(matches!(missing, Err(ApiError::Unauthorized { .. })));
    let unchanged = get_ticket(&mut desk.persistence, &customer, ticket.ticket_id).unwrap();
    assert_eq!(unchanged.status, TicketStatus::Open);
}

#[test]
fn test_agent_update_of_missing_ticket_is_not_found() {
    let mut desk = create_test_desk();

    let result = update_ticket(
        &mut desk.persistence,
        &desk.agent,
        9_999,
        status_request("Resolved"),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Ticket"
    ));
}

#[test]
fn test_any_agent_may_update_any_ticket() {
    let mut desk = create_test_desk();
    let (customer, agent, other_agent) = (desk.customer, desk.agent, desk.other_agent);
    let ticket = open_ticket(&mut desk, customer, "Shared queue");
    update_ticket(
        &mut desk.persistence,
        &agent,
        ticket.ticket_id,
        assign_request(agent.id),
    )
    .unwrap();

    let updated = update_ticket(
        &mut desk.persistence,
        &other_agent,
        ticket.ticket_id,
        status_request("In Progress"),
    )
    .unwrap();

    assert_eq!(updated.status, TicketStatus::InProgress);
    assert_eq!(
        updated.assigned_to.map(|user| user.name),
        Some(String::from("Avery Agent"))
    );
}

#[test]
fn test_unknown_status_is_rejected() {
    let mut desk = create_test_desk();
    let (customer, agent) = (desk.customer, desk.agent);
    let ticket = open_ticket(&mut desk, customer, "Status check");

    let result = update_ticket(
        &mut desk.persistence,
        &agent,
        ticket.ticket_id,
        status_request("Pending"),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_status_without_space_is_accepted() {
    let mut desk = create_test_desk();
    let (customer, agent) = (desk.customer, desk.agent);
    let ticket = open_ticket(&mut desk, customer, "Alias");

    let updated = update_ticket(
        &mut desk.persistence,
        &agent,
        ticket.ticket_id,
        status_request("InProgress"),
    )
    .unwrap();

    assert_eq!(updated.status, TicketStatus::InProgress);
}

#[test]
fn test_empty_fields_leave_ticket_unchanged() {
    let mut desk = create_test_desk();
    let (customer, agent, admin) = (desk.customer, desk.agent, desk.admin);
    let ticket = open_ticket(&mut desk, customer, "Leave me be");
    update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        assign_request(agent.id),
    )
    .unwrap();

    let updated = update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        UpdateTicketRequest {
            status: Some(String::new()),
            assigned_to: None,
        },
    )
    .unwrap();

    assert_eq!(updated.status, TicketStatus::Open);
    assert_eq!(updated.assigned_to.map(|user| user.user_id), Some(agent.id));
}

#[test]
fn test_unknown_assignee_is_not_found() {
    let mut desk = create_test_desk();
    let (customer, admin) = (desk.customer, desk.admin);
    let ticket = open_ticket(&mut desk, customer, "Assign me");

    let result = update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        assign_request(77_777),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "User"
    ));
}

#[test]
fn test_resolving_stamps_closed_at_and_repeat_keeps_it() {
    let mut desk = create_test_desk();
    let (customer, agent) = (desk.customer, desk.agent);
    let ticket = open_ticket(&mut desk, customer, "Fix me");

    let resolved = update_ticket(
        &mut desk.persistence,
        &agent,
        ticket.ticket_id,
        status_request("Resolved"),
    )
    .unwrap();
    let closed_at = resolved.closed_at.unwrap();
    assert!(closed_at >= resolved.created_at);

    let again = update_ticket(
        &mut desk.persistence,
        &agent,
        ticket.ticket_id,
        status_request("Resolved"),
    )
    .unwrap();
    assert_eq!(again.closed_at, Some(closed_at));
}

#[test]
fn test_reopening_keeps_closed_at() {
    let mut desk = create_test_desk();
    let (customer, admin) = (desk.customer, desk.admin);
    let ticket = open_ticket(&mut desk, customer, "Flip flop");

    let closed = update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        status_request("Closed"),
    )
    .unwrap();
    let reopened = update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        status_request("Open"),
    )
    .unwrap();
    let reclosed = update_ticket(
        &mut desk.persistence,
        &admin,
        ticket.ticket_id,
        status_request("Closed"),
    )
    .unwrap();

    assert_eq!(reopened.status, TicketStatus::Open);
    assert_eq!(reopened.closed_at, closed.closed_at);
    assert_eq!(reclosed.closed_at, closed.closed_at);
}

#[test]
fn test_any_transition_is_allowed() {
    let mut desk = create_test_desk();
    let (customer, agent) = (desk.customer, desk.agent);
    let ticket = open_ticket(&mut desk, customer, "Anything goes");

    for status in ["Closed", "In Progress", "Open", "Resolved", "Open"] {
        let updated = update_ticket(
            &mut desk.persistence,
            &agent,
            ticket.ticket_id,
            status_request(status),
        )
        .unwrap();
        assert_eq!(updated.status.as_str(), status);
    }
}
