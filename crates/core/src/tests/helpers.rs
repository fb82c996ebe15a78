// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mandodesk_domain::{Principal, Priority, Role, Ticket, TicketStatus};
use time::{Duration, OffsetDateTime, macros::datetime};

pub const CUSTOMER_ID: i64 = 10;
pub const OTHER_CUSTOMER_ID: i64 = 11;
pub const AGENT_ID: i64 = 20;
pub const OTHER_AGENT_ID: i64 = 21;
pub const ADMIN_ID: i64 = 1;

pub const T0: OffsetDateTime = datetime!(2026-01-05 08:00 UTC);

pub fn create_test_customer() -> Principal {
    Principal::new(CUSTOMER_ID, Role::Customer)
}

pub fn create_test_other_customer() -> Principal {
    Principal::new(OTHER_CUSTOMER_ID, Role::Customer)
}

pub fn create_test_agent() -> Principal {
    Principal::new(AGENT_ID, Role::Agent)
}

pub fn create_test_other_agent() -> Principal {
    Principal::new(OTHER_AGENT_ID, Role::Agent)
}

pub fn create_test_admin() -> Principal {
    Principal::new(ADMIN_ID, Role::Admin)
}

/// Builds a ticket opened by the test customer.
pub fn create_test_ticket(ticket_id: i64, assigned_to: Option<i64>) -> Ticket {
    Ticket {
        ticket_id,
        title: String::from("Cannot log in"),
        description: String::from("Password reset link expired"),
        status: TicketStatus::Open,
        priority: Priority::Medium,
        created_by: CUSTOMER_ID,
        assigned_to,
        created_at: T0,
        updated_at: T0,
        closed_at: None,
        comments: Vec::new(),
    }
}

/// Builds a ticket in the given status, closed the given number of hours
/// after `T0` when `closed_after_hours` is provided.
pub fn create_test_ticket_with_status(
    ticket_id: i64,
    status: TicketStatus,
    closed_after_hours: Option<i64>,
) -> Ticket {
    let mut ticket: Ticket = create_test_ticket(ticket_id, None);
    ticket.status = status;
    ticket.closed_at = closed_after_hours.map(|hours| T0 + Duration::hours(hours));
    ticket
}
