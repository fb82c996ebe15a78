// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use mandodesk::CoreError;
use mandodesk_domain::DomainError;
use mandodesk_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller could not be identified.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the principal may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the action was refused.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    pub(crate) fn ticket_not_found(ticket_id: i64) -> Self {
        Self::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {ticket_id} does not exist"),
        }
    }

    pub(crate) fn user_not_found(user_id: i64) -> Self {
        Self::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}' {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let (field, message): (&str, String) = match err {
        DomainError::InvalidTitle(msg) => ("title", msg),
        DomainError::InvalidDescription(msg) => ("description", msg),
        DomainError::InvalidCommentMessage(msg) => ("message", msg),
        DomainError::InvalidName(msg) => ("name", msg),
        DomainError::InvalidEmail(msg) => ("email", msg),
        DomainError::InvalidStatus(_) => ("status", err.to_string()),
        DomainError::InvalidPriority(_) => ("priority", err.to_string()),
        DomainError::InvalidRole(_) => ("role", err.to_string()),
    };
    ApiError::InvalidInput {
        field: String::from(field),
        message,
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::AccessDenied { action, reason } => ApiError::Unauthorized { action, reason },
    }
}

/// Wraps a store failure as an internal error with the failing step as context.
pub(crate) fn store_error(context: &'static str) -> impl FnOnce(PersistenceError) -> ApiError {
    move |err| ApiError::Internal {
        message: format!("{context}: {err}"),
    }
}
