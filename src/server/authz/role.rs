use std::collections::HashSet;

use anyhow::Result;

use crate::types::user::Role;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Allows principals whose role is in `roles`. Guests are always denied.
pub struct RoleAuthorizer {
    roles: HashSet<Role>,
    message: String,
}

impl RoleAuthorizer {
    pub const ADMIN_DENIED: &'static str = "Permission Denied, only admins";
    pub const MANAGER_DENIED: &'static str = "Permission Denied, only managers";

    pub fn new(roles: impl IntoIterator<Item = Role>, message: impl ToString) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            message: message.to_string(),
        }
    }

    pub fn admin_only() -> Self {
        Self::new([Role::Admin], Self::ADMIN_DENIED)
    }

    pub fn manager_or_admin() -> Self {
        Self::new([Role::Admin, Role::Manager], Self::MANAGER_DENIED)
    }
}

impl Authorizer for RoleAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        match req.principal {
            Some(principal) if self.roles.contains(&principal.role) => Ok(AuthzResponse::Ok),
            _ => Ok(AuthzResponse::Unauthorized(self.message.clone())),
        }
    }
}
