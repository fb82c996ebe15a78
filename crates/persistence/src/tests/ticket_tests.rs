// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket creation and listing tests.

use mandodesk_domain::{NewTicket, Priority, Ticket, TicketFilter, TicketStatus};
use time::Duration;

use super::helpers::{T0, create_test_new_ticket, create_test_persistence, seed_users};

#[test]
fn test_insert_ticket_assigns_id_and_round_trips_fields() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let new_ticket = NewTicket::new(
        String::from("VPN drops"),
        String::from("Disconnects every ten minutes."),
        Priority::High,
        users.customer,
        T0,
    );
    let stored: Ticket = persistence.insert_ticket(&new_ticket).unwrap();

    assert!(stored.ticket_id > 0);
    assert_eq!(stored.title, "VPN drops");
    assert_eq!(stored.description, "Disconnects every ten minutes.");
    assert_eq!(stored.status, TicketStatus::Open);
    assert_eq!(stored.priority, Priority::High);
    assert_eq!(stored.created_by, users.customer);
    assert_eq!(stored.assigned_to, None);
    assert_eq!(stored.created_at, T0);
    assert_eq!(stored.updated_at, T0);
    assert_eq!(stored.closed_at, None);
    assert!(stored.comments.is_empty());

    let loaded = persistence.get_ticket(stored.ticket_id).unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn test_ticket_created_in_closing_status_is_stamped() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    for status in [TicketStatus::Resolved, TicketStatus::Closed] {
        let stored = persistence
            .insert_ticket(&create_test_new_ticket(users.customer, 0).with_status(status))
            .unwrap();

        let closed_at = stored.closed_at.unwrap();
        assert!(closed_at >= stored.created_at);
    }
}

#[test]
fn test_insert_ticket_with_unknown_creator_fails() {
    let mut persistence = create_test_persistence();

    let result = persistence.insert_ticket(&create_test_new_ticket(777, 0));

    assert!(result.is_err());
    assert_eq!(persistence.count_tickets().unwrap(), 0);
}

#[test]
fn test_get_ticket_returns_none_for_unknown_id() {
    let mut persistence = create_test_persistence();
    assert!(persistence.get_ticket(42).unwrap().is_none());
}

#[test]
fn test_list_orders_newest_first() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let oldest = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0))
        .unwrap();
    let newest = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 90))
        .unwrap();
    let middle = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 30))
        .unwrap();

    let ids: Vec<i64> = persistence
        .list_all_tickets()
        .unwrap()
        .into_iter()
        .map(|ticket| ticket.ticket_id)
        .collect();

    assert_eq!(ids, vec![newest.ticket_id, middle.ticket_id, oldest.ticket_id]);
}

#[test]
fn test_list_breaks_timestamp_ties_by_id() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let first = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 5))
        .unwrap();
    let second = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 5))
        .unwrap();

    let ids: Vec<i64> = persistence
        .list_all_tickets()
        .unwrap()
        .into_iter()
        .map(|ticket| ticket.ticket_id)
        .collect();

    assert_eq!(ids, vec![second.ticket_id, first.ticket_id]);
}

#[test]
fn test_list_created_by_filter() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let own = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0))
        .unwrap();
    persistence
        .insert_ticket(&create_test_new_ticket(users.other_customer, 1))
        .unwrap();

    let listed = persistence
        .list_tickets(TicketFilter::CreatedBy(users.customer))
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].ticket_id, own.ticket_id);
}

#[test]
fn test_list_assigned_to_filter_excludes_unassigned() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let mine = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0).with_assignee(users.agent))
        .unwrap();
    persistence
        .insert_ticket(
            &create_test_new_ticket(users.customer, 1).with_assignee(users.other_agent),
        )
        .unwrap();
    persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 2))
        .unwrap();

    let listed = persistence
        .list_tickets(TicketFilter::AssignedTo(users.agent))
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].ticket_id, mine.ticket_id);
}

#[test]
fn test_list_attaches_comments_to_each_ticket() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let first = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0))
        .unwrap();
    let second = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 1))
        .unwrap();
    persistence
        .append_comment(first.ticket_id, users.customer, "on first", T0)
        .unwrap();
    persistence
        .append_comment(second.ticket_id, users.agent, "on second", T0)
        .unwrap();

    for filter in [TicketFilter::All, TicketFilter::CreatedBy(users.customer)] {
        let listed = persistence.list_tickets(filter).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].comments.len(), 1);
        assert_eq!(listed[0].comments[0].message, "on second");
        assert_eq!(listed[1].comments.len(), 1);
        assert_eq!(listed[1].comments[0].message, "on first");
    }
}

#[test]
fn test_list_with_no_matches_is_empty() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);
    persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0))
        .unwrap();

    assert!(
        persistence
            .list_tickets(TicketFilter::AssignedTo(users.agent))
            .unwrap()
            .is_empty()
    );
    assert_eq!(persistence.count_tickets().unwrap(), 1);
}

#[test]
fn test_closing_durations_survive_storage() {
    let mut persistence = create_test_persistence();
    let users = seed_users(&mut persistence);

    let stored = persistence
        .insert_ticket(&create_test_new_ticket(users.customer, 0))
        .unwrap();
    let closed = persistence
        .update_ticket(
            stored.ticket_id,
            &mandodesk_domain::TicketUpdate {
                status: Some(TicketStatus::Closed),
                assigned_to: None,
            },
            T0 + Duration::hours(4),
        )
        .unwrap()
        .unwrap();

    assert_eq!(closed.resolution_time(), Some(Duration::hours(4)));
}
