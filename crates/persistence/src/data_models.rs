// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mandodesk_domain::{Role, UserSummary};

/// A directory user as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    /// Normalized (trimmed, lowercase) email.
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<UserData> for UserSummary {
    fn from(user: UserData) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}
