// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal resolution against the user directory.
//!
//! Credentials are checked upstream. By the time a request reaches this
//! crate it carries a directory user ID, and the principal's role is
//! whatever the directory row says.

use mandodesk_domain::Principal;
use mandodesk_persistence::{Persistence, UserData};
use tracing::{debug, warn};

use crate::error::{ApiError, store_error};

/// Resolves a directory user ID into a principal.
///
/// # Arguments
///
/// * `persistence` - The user directory
/// * `user_id` - The caller's directory ID
///
/// # Errors
///
/// Returns `AuthenticationFailed` if no directory user has the ID, or
/// `Internal` if the lookup fails.
pub fn resolve_principal(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<Principal, ApiError> {
    let user: Option<UserData> = persistence
        .get_user_by_id(user_id)
        .map_err(store_error("Failed to look up caller"))?;

    match user {
        Some(user) => {
            debug!(user_id, role = %user.role, "Resolved principal");
            Ok(Principal::new(user.user_id, user.role))
        }
        None => {
            warn!(user_id, "Rejected unknown caller");
            Err(ApiError::AuthenticationFailed {
                reason: format!("unknown user {user_id}"),
            })
        }
    }
}
