// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory user mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mandodesk_domain::{Role, normalize_email};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries;
use crate::timestamps::{current_timestamp, format_timestamp};

/// Creates a directory user.
///
/// The email is normalized to lowercase before it is stored.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - Display name
/// * `email` - Contact email, unique across the directory
/// * `role` - The user's role
///
/// # Returns
///
/// The new user's ID.
///
/// # Errors
///
/// Returns `DuplicateEmail` if the normalized email is already taken, or
/// an error if the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    role: Role,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = normalize_email(email);

    if queries::get_user_by_email(conn, &normalized_email)?.is_some() {
        return Err(PersistenceError::DuplicateEmail(normalized_email));
    }

    let created_at: String = format_timestamp(current_timestamp())?;

    diesel::insert_into(users::table)
        .values((
            users::name.eq(name.trim()),
            users::email.eq(&normalized_email),
            users::role.eq(role.as_str()),
            users::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    debug!(user_id, email = %normalized_email, role = %role, "Created directory user");
    Ok(user_id)
}

/// Returns the user with the given email, creating it if absent.
///
/// An existing user is returned as stored; its name and role are not
/// changed.
///
/// # Errors
///
/// Returns an error if the lookup or the insert fails.
pub fn ensure_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    role: Role,
) -> Result<UserData, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if let Some(existing) = queries::get_user_by_email(conn, email)? {
            return Ok(existing);
        }

        let user_id: i64 = create_user(conn, name, email, role)?;
        queries::get_user_by_id(conn, user_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("user {user_id}")))
    })
}
