mod bearer_token;

pub mod config;
pub mod factory;
pub mod token;

use actix_web::HttpRequest;
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::types::user::Role;

pub use bearer_token::BearerTokenAuthenticator;

/// Trait for request authenticators.
pub trait Authenticator: Send + Sync {
    /// Attempts to authenticate a request.
    ///
    /// * `Ok(AuthnResponse::Ok(principal))` - the caller is identified
    /// * `Ok(AuthnResponse::Continue)` - no credentials, the caller is a guest
    /// * `Ok(AuthnResponse::Unauthenticated)` - credentials present but invalid
    /// * `Err(_)` - internal error during authentication
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse>;
}

#[derive(Debug)]
pub enum AuthnResponse {
    Ok(Principal),
    Continue,
    Unauthenticated,
}

/// The identity attached to a request, decoded from its bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: u64,
    pub email: String,
    pub role: Role,
}
