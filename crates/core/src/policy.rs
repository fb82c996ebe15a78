// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-scoped access rules for tickets and reports.

use mandodesk_domain::{Principal, Role, Ticket, TicketFilter};

use crate::error::CoreError;

/// Access policy engine.
///
/// Each rule is a short predicate over the principal's role and the
/// ticket's ownership. The rules are deliberately not uniform:
///
/// - An agent may read any unassigned ticket by id, but the agent's list
///   only contains tickets assigned to that agent.
/// - Any agent or admin may comment on any ticket, which is broader than
///   the read rule.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Returns the filter the store applies when the principal lists tickets.
    ///
    /// - customer: tickets they created
    /// - agent: tickets assigned to them (unassigned tickets excluded)
    /// - admin: everything
    #[must_use]
    pub const fn list_filter(principal: &Principal) -> TicketFilter {
        match principal.role {
            Role::Customer => TicketFilter::CreatedBy(principal.id),
            Role::Agent => TicketFilter::AssignedTo(principal.id),
            Role::Admin => TicketFilter::All,
        }
    }

    /// Returns whether the principal may read the ticket by id.
    #[must_use]
    pub fn can_read(principal: &Principal, ticket: &Ticket) -> bool {
        match principal.role {
            Role::Customer => ticket.created_by == principal.id,
            Role::Agent => ticket
                .assigned_to
                .is_none_or(|assignee| assignee == principal.id),
            Role::Admin => true,
        }
    }

    /// Checks if the principal may read the ticket by id.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if:
    /// - a customer reads a ticket they did not create
    /// - an agent reads a ticket assigned to someone else
    pub fn authorize_read(principal: &Principal, ticket: &Ticket) -> Result<(), CoreError> {
        if Self::can_read(principal, ticket) {
            return Ok(());
        }
        let reason: &str = match principal.role {
            Role::Customer => "customers may only read their own tickets",
            Role::Agent | Role::Admin => "ticket is assigned to another agent",
        };
        Err(CoreError::denied("get_ticket", reason))
    }

    /// Checks if the principal may change a ticket's status or assignment.
    ///
    /// Agents and admins may update any ticket.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for customers.
    pub fn authorize_update(principal: &Principal) -> Result<(), CoreError> {
        match principal.role {
            Role::Agent | Role::Admin => Ok(()),
            Role::Customer => Err(CoreError::denied(
                "update_ticket",
                "requires agent or admin role",
            )),
        }
    }

    /// Checks if the principal may append a comment to the ticket.
    ///
    /// Allowed for the ticket's creator, its assigned agent, and any agent
    /// or admin.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for a customer who did not create the ticket.
    pub fn authorize_comment(principal: &Principal, ticket: &Ticket) -> Result<(), CoreError> {
        let is_creator: bool = ticket.created_by == principal.id;
        let is_assignee: bool = ticket.assigned_to == Some(principal.id);

        if is_creator || is_assignee || principal.role.is_staff() {
            return Ok(());
        }
        Err(CoreError::denied(
            "add_comment",
            "only the creator, the assignee, or support staff may comment",
        ))
    }

    /// Checks if the principal may read the statistics summary.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` unless the principal is an admin.
    pub fn authorize_stats(principal: &Principal) -> Result<(), CoreError> {
        match principal.role {
            Role::Admin => Ok(()),
            Role::Customer | Role::Agent => {
                Err(CoreError::denied("stats_summary", "requires admin role"))
            }
        }
    }

    /// Checks if the principal may list directory users.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` unless the principal is an admin.
    pub fn authorize_list_users(principal: &Principal) -> Result<(), CoreError> {
        match principal.role {
            Role::Admin => Ok(()),
            Role::Customer | Role::Agent => {
                Err(CoreError::denied("list_users", "requires admin role"))
            }
        }
    }
}
