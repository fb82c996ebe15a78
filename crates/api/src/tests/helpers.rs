// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use mandodesk_domain::{Principal, Role};
use mandodesk_persistence::Persistence;

use crate::{CreateTicketRequest, TicketResponse, UpdateTicketRequest, create_ticket};

/// A store seeded with one directory user per test persona.
pub struct TestDesk {
    pub persistence: Persistence,
    pub customer: Principal,
    pub other_customer: Principal,
    pub agent: Principal,
    pub other_agent: Principal,
    pub admin: Principal,
}

fn add_user(persistence: &mut Persistence, name: &str, email: &str, role: Role) -> Principal {
    let user_id: i64 = persistence.create_user(name, email, role).unwrap();
    Principal::new(user_id, role)
}

pub fn create_test_desk() -> TestDesk {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let customer = add_user(&mut persistence, "Casey Customer", "casey@example.com", Role::Customer);
    let other_customer =
        add_user(&mut persistence, "Olive Other", "olive@example.com", Role::Customer);
    let agent = add_user(&mut persistence, "Avery Agent", "avery@example.com", Role::Agent);
    let other_agent = add_user(&mut persistence, "Blake Agent", "blake@example.com", Role::Agent);
    let admin = add_user(&mut persistence, "Ada Admin", "ada@example.com", Role::Admin);

    TestDesk {
        persistence,
        customer,
        other_customer,
        agent,
        other_agent,
        admin,
    }
}

pub fn create_test_request(title: &str) -> CreateTicketRequest {
    CreateTicketRequest {
        title: String::from(title),
        description: String::from("Steps to reproduce are in the attached log."),
        priority: None,
    }
}

/// Opens a ticket as `creator`.
pub fn open_ticket(desk: &mut TestDesk, creator: Principal, title: &str) -> TicketResponse {
    create_ticket(&mut desk.persistence, &creator, create_test_request(title)).unwrap()
}

pub fn status_request(status: &str) -> UpdateTicketRequest {
    UpdateTicketRequest {
        status: Some(String::from(status)),
        assigned_to: None,
    }
}

pub fn assign_request(assignee: i64) -> UpdateTicketRequest {
    UpdateTicketRequest {
        status: None,
        assigned_to: Some(assignee),
    }
}
