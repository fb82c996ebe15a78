// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised by the access policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The principal may not perform the action.
    #[error("Forbidden: '{action}' {reason}")]
    AccessDenied {
        /// The action that was attempted.
        action: String,
        /// Why the action was denied.
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn denied(action: &str, reason: &str) -> Self {
        Self::AccessDenied {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }
}
