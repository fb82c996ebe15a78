// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates the required text fields of a new ticket.
///
/// Whitespace-only values count as blank.
///
/// # Errors
///
/// Returns an error if:
/// - The title is blank
/// - The description is blank
pub fn validate_ticket_fields(title: &str, description: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    if description.trim().is_empty() {
        return Err(DomainError::InvalidDescription(String::from(
            "Description cannot be empty",
        )));
    }

    Ok(())
}

/// Validates a comment body.
///
/// # Errors
///
/// Returns an error if the message is blank.
pub fn validate_comment_message(message: &str) -> Result<(), DomainError> {
    if message.trim().is_empty() {
        return Err(DomainError::InvalidCommentMessage(String::from(
            "Message cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the fields of a directory user.
///
/// # Errors
///
/// Returns an error if:
/// - The name is blank
/// - The email is blank or has no `@` separating a local part and a domain
pub fn validate_user_fields(name: &str, email: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    let email: &str = email.trim();
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::InvalidEmail(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

/// Normalizes an email address for case-insensitive uniqueness.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
