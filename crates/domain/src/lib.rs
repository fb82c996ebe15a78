// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod ticket;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use ticket::{Comment, NewTicket, Ticket, TicketUpdate, resolve_closed_at};
pub use types::{Principal, Priority, Role, TicketFilter, TicketStatus, UserSummary};
pub use validation::{
    normalize_email, validate_comment_message, validate_ticket_fields, validate_user_fields,
};
