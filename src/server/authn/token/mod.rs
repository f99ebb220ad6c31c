pub mod config;
pub mod factory;
pub mod jwt;

use anyhow::Result;

use crate::types::token::TokenResponse;

use super::Principal;

pub trait TokenGenerator {
    fn generate_token(&self, principal: &Principal) -> Result<TokenResponse>;
}

pub trait TokenValidator {
    fn validate_token(&self, token: &str) -> Result<Principal>;
}
