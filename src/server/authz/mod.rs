mod chain;
mod guest;
mod role;
mod union;

pub mod policy;

use anyhow::Result;

use super::authn::Principal;

pub use guest::GuestAuthorizer;
pub use role::RoleAuthorizer;

/// A gate evaluated before a request reaches its handler. Gates keep no
/// state between requests.
pub trait Authorizer: Send + Sync {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse>;
}

#[derive(Debug, Clone)]
pub struct AuthzRequest<'a> {
    /// Route pattern, e.g. `/users/{id}`.
    pub route: &'a str,
    /// `None` for guests.
    pub principal: Option<&'a Principal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthzResponse {
    Ok,
    /// Denied, mapped to 401.
    Unauthorized(String),
    /// Denied, mapped to 403.
    Forbidden(String),
}
