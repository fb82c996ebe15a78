// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup for the ticket store.
//!
//! Opening a store is one sequence: connect, apply pragmas, migrate, then
//! confirm that foreign keys are enforced. Raw SQL appears here only for
//! pragmas and `last_insert_rowid()`, which Diesel has no DSL for.

use std::path::{Path, PathBuf};

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations for the users, tickets, and comments tables.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where a store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A named shared-cache in-memory database, discarded with the last
    /// connection.
    Memory(u64),
    /// A database file, created if missing.
    File(PathBuf),
}

impl StoreLocation {
    fn connection_url(&self) -> Result<String, PersistenceError> {
        match self {
            Self::Memory(id) => Ok(format!(
                "file:memdb_mandodesk_{id}?mode=memory&cache=shared"
            )),
            Self::File(path) => path.to_str().map(str::to_string).ok_or_else(|| {
                PersistenceError::InitializationError(format!(
                    "Database path is not valid UTF-8: {}",
                    path.display()
                ))
            }),
        }
    }

    const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl From<&Path> for StoreLocation {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the row ID assigned by the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// Tickets reference their creator and assignee, and comments reference
/// their ticket and author. Those references are only enforced while the
/// `foreign_keys` pragma is on.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

fn apply_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {pragma}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {pragma}: {e}")))?;
    Ok(())
}

/// Opens a ticket store connection with the schema applied.
///
/// File stores run in WAL mode so readers do not block the writer.
///
/// # Arguments
///
/// * `location` - Where the store keeps its data
///
/// # Errors
///
/// Returns an error if:
/// - The connection cannot be established
/// - A pragma cannot be applied
/// - A migration fails
/// - Foreign key enforcement is off after setup
pub fn open_store(location: &StoreLocation) -> Result<SqliteConnection, PersistenceError> {
    let url: String = location.connection_url()?;
    info!(database_url = %url, "Opening SQLite ticket store");

    let mut conn: SqliteConnection = SqliteConnection::establish(&url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    apply_pragma(&mut conn, "foreign_keys = ON")?;
    apply_pragma(&mut conn, &format!("busy_timeout = {BUSY_TIMEOUT_MS}"))?;
    if location.is_file() {
        apply_pragma(&mut conn, "journal_mode = WAL")?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(applied = applied.len(), "Ticket store schema is current");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
