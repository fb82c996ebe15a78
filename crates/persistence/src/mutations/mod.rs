// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Directory user creation
//! - `tickets`: Ticket creation, update, and comment append
//!
//! `SQLite` row IDs are read back with `get_last_insert_rowid()` from the
//! `backend` module. All other code uses Diesel DSL exclusively.

pub mod tickets;
pub mod users;

pub use tickets::{append_comment, insert_ticket, update_ticket};
pub use users::{create_user, ensure_user};
