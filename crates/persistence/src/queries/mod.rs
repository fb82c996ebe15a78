// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Directory lookups
//! - `tickets`: Ticket and comment reads

pub mod tickets;
pub mod users;

pub use tickets::{count_tickets, get_ticket, list_tickets, ticket_exists};
pub use users::{get_user_by_email, get_user_by_id, get_users_by_ids, list_users};
