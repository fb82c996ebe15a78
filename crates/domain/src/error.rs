// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Ticket title is empty or invalid.
    InvalidTitle(String),
    /// Ticket description is empty or invalid.
    InvalidDescription(String),
    /// Comment message is empty or invalid.
    InvalidCommentMessage(String),
    /// Status string does not name a known ticket status.
    InvalidStatus(String),
    /// Priority string does not name a known priority.
    InvalidPriority(String),
    /// Role string does not name a known role.
    InvalidRole(String),
    /// User name is empty or invalid.
    InvalidName(String),
    /// User email is empty or malformed.
    InvalidEmail(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::InvalidCommentMessage(msg) => write!(f, "Invalid comment message: {msg}"),
            Self::InvalidStatus(value) => write!(
                f,
                "Invalid status '{value}'. Must be one of: Open, In Progress, Resolved, Closed"
            ),
            Self::InvalidPriority(value) => write!(
                f,
                "Invalid priority '{value}'. Must be one of: Low, Medium, High"
            ),
            Self::InvalidRole(value) => write!(
                f,
                "Invalid role '{value}'. Must be one of: customer, agent, admin"
            ),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
