use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::extractors::Principal,
    error::{ApiError, ApiResult},
    vulns::model::Vulnerability,
};

/// Closed role hierarchy. `Owner` sits above every requirement; the
/// remaining roles must be listed explicitly to pass a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Analyst,
    Dev,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Analyst, Role::Dev];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Analyst => "analyst",
            Role::Dev => "dev",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core permission evaluator: owner satisfies every requirement
/// unconditionally, everyone else must be in the allowed set.
pub fn role_permits(role: Role, allowed: &[Role]) -> bool {
    role == Role::Owner || allowed.contains(&role)
}

pub fn require_role(principal: &Principal, allowed: &[Role]) -> ApiResult<()> {
    if role_permits(principal.role, allowed) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Forbidden"))
    }
}

/// Role mutation rules, checked in order; the first failing rule wins.
/// The requested role is parsed (and therefore valid) before this runs.
pub fn can_mutate_role(
    actor: &Principal,
    target_id: Uuid,
    target_role: Role,
    requested: Role,
) -> ApiResult<()> {
    if actor.id == target_id {
        return Err(ApiError::validation("You cannot change your own role"));
    }
    if requested == Role::Owner && actor.role != Role::Owner {
        return Err(ApiError::Forbidden("Only owners can assign owner role"));
    }
    if target_role == Role::Owner && actor.role != Role::Owner {
        return Err(ApiError::Forbidden("Only owners can change an owner's role"));
    }
    Ok(())
}

/// Admins and owners can edit any report; everyone else only their own.
pub fn can_edit(principal: &Principal, vuln: &Vulnerability) -> bool {
    role_permits(principal.role, &[Role::Admin]) || principal.id == vuln.created_by
}

/// Deletion is reserved for admins and owners, creator or not.
pub fn can_delete(principal: &Principal) -> bool {
    role_permits(principal.role, &[Role::Admin])
}
