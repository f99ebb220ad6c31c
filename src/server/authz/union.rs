use anyhow::Result;

use super::guest::GuestAuthorizer;
use super::role::RoleAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

pub enum UnionAuthorizer {
    Role(RoleAuthorizer),
    Guest(GuestAuthorizer),
}

impl Authorizer for UnionAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        match self {
            UnionAuthorizer::Role(r) => r.authorize_request(req),
            UnionAuthorizer::Guest(g) => g.authorize_request(req),
        }
    }
}
