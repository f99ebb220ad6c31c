use anyhow::Result;

use super::bearer_token::BearerTokenAuthenticator;
use super::token::factory::TokenFactory;
use super::token::jwt::JwtTokenValidator;

pub struct AuthnFactory;

impl AuthnFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authenticator(
        &self,
        token_factory: &TokenFactory,
    ) -> Result<BearerTokenAuthenticator<JwtTokenValidator>> {
        let jwt = token_factory.build_token_validator()?;
        Ok(BearerTokenAuthenticator::new(jwt))
    }
}
