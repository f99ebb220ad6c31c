use std::collections::HashMap;

use actix_web::http::Method;
use anyhow::Result;
use log::debug;

use crate::server::authn::Principal;

use super::chain::ChainAuthorizer;
use super::guest::GuestAuthorizer;
use super::role::RoleAuthorizer;
use super::union::UnionAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Gate lists per `(method, route pattern)`. Routes without an entry are
/// public.
pub struct RoutePolicy {
    routes: HashMap<(Method, String), ChainAuthorizer>,
}

impl RoutePolicy {
    pub const USERS_ROUTE: &'static str = "/users";
    pub const USER_ROUTE: &'static str = "/users/{id}";
    pub const PASSWORD_EMAIL_ROUTE: &'static str = "/password/email";

    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn add(&mut self, method: Method, route: &str, authorizers: Vec<UnionAuthorizer>) {
        self.routes.insert(
            (method, String::from(route)),
            ChainAuthorizer::new(authorizers),
        );
    }

    /// The user management policy: listing needs a manager or admin, every
    /// other user route needs an admin, and the reset request is guest only.
    pub fn default_policy() -> Self {
        let mut policy = Self::new();

        let admin = || vec![UnionAuthorizer::Role(RoleAuthorizer::admin_only())];

        policy.add(
            Method::GET,
            Self::USERS_ROUTE,
            vec![UnionAuthorizer::Role(RoleAuthorizer::manager_or_admin())],
        );
        policy.add(Method::POST, Self::USERS_ROUTE, admin());
        policy.add(Method::GET, Self::USER_ROUTE, admin());
        policy.add(Method::PATCH, Self::USER_ROUTE, admin());
        policy.add(Method::DELETE, Self::USER_ROUTE, admin());

        policy.add(
            Method::POST,
            Self::PASSWORD_EMAIL_ROUTE,
            vec![UnionAuthorizer::Guest(GuestAuthorizer::new())],
        );

        policy
    }

    pub fn authorize(
        &self,
        method: &Method,
        route: &str,
        principal: Option<&Principal>,
    ) -> Result<AuthzResponse> {
        let chain = match self.routes.get(&(method.clone(), String::from(route))) {
            Some(chain) => chain,
            None => return Ok(AuthzResponse::Ok),
        };

        let req = AuthzRequest { route, principal };
        let resp = chain.authorize_request(&req)?;
        if resp != AuthzResponse::Ok {
            debug!(
                "Deny {method} {route} for {:?}: {resp:?}",
                principal.map(|p| &p.email)
            );
        }
        Ok(resp)
    }
}
