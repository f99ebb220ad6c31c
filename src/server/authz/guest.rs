use anyhow::Result;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Only lets unauthenticated callers through.
pub struct GuestAuthorizer;

impl GuestAuthorizer {
    pub const DENIED: &'static str = "Already authenticated";

    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for GuestAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        if req.principal.is_some() {
            return Ok(AuthzResponse::Forbidden(String::from(Self::DENIED)));
        }
        Ok(AuthzResponse::Ok)
    }
}
