// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory user queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mandodesk_domain::{Role, normalize_email};
use tracing::debug;

use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    user_id: i64,
    name: String,
    email: String,
    role: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|e| {
            PersistenceError::ReconstructionError(format!("user {}: {e}", row.user_id))
        })?;
        Ok(Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Retrieves a user by email.
///
/// The email is normalized before lookup, so the match is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let normalized: String = normalize_email(email);
    debug!(email = %normalized, "Looking up user by email");

    users::table
        .filter(users::email.eq(&normalized))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Retrieves the users with the given IDs.
///
/// Unknown IDs are skipped. Results are ordered by user ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_users_by_ids(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
) -> Result<Vec<UserData>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<UserRow> = users::table
        .filter(users::user_id.eq_any(user_ids))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    rows.into_iter().map(UserData::try_from).collect()
}

/// Lists directory users ordered by name, optionally restricted to one role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    role: Option<Role>,
) -> Result<Vec<UserData>, PersistenceError> {
    let mut query = users::table
        .select(UserRow::as_select())
        .order((users::name.asc(), users::user_id.asc()))
        .into_boxed();

    if let Some(role) = role {
        query = query.filter(users::role.eq(role.as_str()));
    }

    let rows: Vec<UserRow> = query.load(conn)?;
    rows.into_iter().map(UserData::try_from).collect()
}
