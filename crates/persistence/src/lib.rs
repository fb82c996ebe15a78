// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the MandoDesk ticket service.
//!
//! This crate stores directory users, tickets, and ticket comments in
//! `SQLite` through Diesel. The schema is embedded as Diesel migrations and
//! applied whenever a store is opened.
//!
//! ## Storage Model
//!
//! - `users`: the user directory; emails are unique and stored lowercase
//! - `tickets`: one row per ticket; creator and assignee reference `users`
//! - `ticket_comments`: one row per comment, appended and never updated
//!
//! Timestamps are stored as fixed-width UTC text so that ordering by a
//! timestamp column orders by time.
//!
//! ## Testing Philosophy
//!
//! - Every test opens its own shared in-memory database
//! - Foreign key enforcement is verified whenever a store is opened
//! - No external infrastructure is required

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

use crate::backend::sqlite::{open_store, verify_foreign_key_enforcement};
use diesel::SqliteConnection;
use mandodesk_domain::{NewTicket, Role, Ticket, TicketFilter, TicketUpdate};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use backend::sqlite::{MIGRATIONS, StoreLocation};
pub use data_models::UserData;
pub use error::PersistenceError;
pub use timestamps::current_timestamp;

/// The ticket store and user directory.
///
/// Holds a single `SQLite` connection. Callers that share a store across
/// tasks wrap it in a mutex.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a store backed by a fresh in-memory `SQLite` database.
    ///
    /// Each call receives a distinct database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::open(&StoreLocation::Memory(db_id))
    }

    /// Creates a store backed by a `SQLite` database file.
    ///
    /// The file is created if it does not exist. WAL mode is enabled.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::open(&StoreLocation::from(path.as_ref()))
    }

    /// Opens a store at the given location, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(location: &StoreLocation) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = open_store(location)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // User Directory
    // ========================================================================

    /// Creates a directory user and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is taken, or an error if the
    /// insert fails.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<i64, PersistenceError> {
        mutations::create_user(&mut self.conn, name, email, role)
    }

    /// Returns the user with the given email, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the insert fails.
    pub fn ensure_user(
        &mut self,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<UserData, PersistenceError> {
        mutations::ensure_user(&mut self.conn, name, email, role)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves the users with the given IDs, skipping unknown IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_users_by_ids(&mut self, user_ids: &[i64]) -> Result<Vec<UserData>, PersistenceError> {
        queries::get_users_by_ids(&mut self.conn, user_ids)
    }

    /// Maps user IDs to display names.
    ///
    /// IDs with no directory entry are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn lookup_user_names(
        &mut self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, String>, PersistenceError> {
        Ok(self
            .get_users_by_ids(user_ids)?
            .into_iter()
            .map(|user| (user.user_id, user.name))
            .collect())
    }

    /// Lists directory users ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self, role: Option<Role>) -> Result<Vec<UserData>, PersistenceError> {
        queries::list_users(&mut self.conn, role)
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Stores a new ticket and returns it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_ticket(&mut self, ticket: &NewTicket) -> Result<Ticket, PersistenceError> {
        mutations::insert_ticket(&mut self.conn, ticket)
    }

    /// Retrieves a ticket with its comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_ticket(&mut self, ticket_id: i64) -> Result<Option<Ticket>, PersistenceError> {
        queries::get_ticket(&mut self.conn, ticket_id)
    }

    /// Lists the tickets that pass the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_tickets(&mut self, filter: TicketFilter) -> Result<Vec<Ticket>, PersistenceError> {
        queries::list_tickets(&mut self.conn, filter)
    }

    /// Lists every ticket, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_all_tickets(&mut self) -> Result<Vec<Ticket>, PersistenceError> {
        self.list_tickets(TicketFilter::All)
    }

    /// Counts every stored ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_tickets(&mut self) -> Result<i64, PersistenceError> {
        queries::count_tickets(&mut self.conn)
    }

    /// Applies a status/assignment update in one transaction.
    ///
    /// Returns `None` if no ticket has the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or the write fails.
    pub fn update_ticket(
        &mut self,
        ticket_id: i64,
        update: &TicketUpdate,
        now: OffsetDateTime,
    ) -> Result<Option<Ticket>, PersistenceError> {
        mutations::update_ticket(&mut self.conn, ticket_id, update, now)
    }

    /// Appends a comment and returns the ticket with all comments.
    ///
    /// Returns `None` if no ticket has the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_comment(
        &mut self,
        ticket_id: i64,
        author: i64,
        message: &str,
        now: OffsetDateTime,
    ) -> Result<Option<Ticket>, PersistenceError> {
        mutations::append_comment(&mut self.conn, ticket_id, author, message, now)
    }
}
