// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the MandoDesk ticket service.
//!
//! This crate resolves callers into principals, applies the access policy
//! to each ticket operation, and translates domain, core, and store errors
//! into the `ApiError` contract. It knows nothing about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod identity;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    DEMO_USERS, add_comment, create_ticket, get_ticket, list_tickets, list_users,
    seed_demo_users, stats_summary, update_ticket,
};
pub use identity::resolve_principal;
pub use request_response::{
    AddCommentRequest, CreateTicketRequest, ListUsersRequest, StatsSummaryResponse,
    StatusCountsResponse, TicketResponse, UpdateTicketRequest,
};
