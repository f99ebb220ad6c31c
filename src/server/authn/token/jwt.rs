use anyhow::{bail, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::server::authn::Principal;
use crate::time::current_timestamp;
use crate::types::user::Role;

use super::{TokenGenerator, TokenResponse, TokenValidator};

const ISSUER: &str = "usermgr/jwt-tokenizer";

/// Registered claims (RFC 7519) plus the principal's email and role.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub nbf: usize,
    /// User id.
    pub sub: String,

    pub email: String,
    pub role: Role,
}

pub struct JwtTokenGenerator {
    key: EncodingKey,
    expiry: usize,
}

impl JwtTokenGenerator {
    pub fn new(private_key: &[u8], expiry: u64) -> Result<Self> {
        let key = match EncodingKey::from_rsa_pem(private_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA private key for jwt token generation failed: {e}"),
        };
        Ok(Self {
            key,
            expiry: expiry as usize,
        })
    }
}

impl TokenGenerator for JwtTokenGenerator {
    fn generate_token(&self, principal: &Principal) -> Result<TokenResponse> {
        let now = current_timestamp() as usize;

        let claims = Claims {
            exp: now + self.expiry,
            iat: now,
            iss: String::from(ISSUER),
            nbf: now,
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
        };

        match encode(&Header::new(Algorithm::RS256), &claims, &self.key) {
            Ok(token) => Ok(TokenResponse {
                user: claims.email,
                token,
                expire_in: claims.exp,
            }),
            Err(e) => bail!("generate jwt token failed: {e}"),
        }
    }
}

pub struct JwtTokenValidator {
    key: DecodingKey,
}

impl JwtTokenValidator {
    pub fn new(public_key: &[u8]) -> Result<Self> {
        let key = match DecodingKey::from_rsa_pem(public_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA public key for jwt token validation failed: {e}"),
        };
        Ok(Self { key })
    }
}

impl TokenValidator for JwtTokenValidator {
    fn validate_token(&self, token: &str) -> Result<Principal> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "nbf", "sub"]);
        // Time checks use our own clock below.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        let claims = match decode::<Claims>(token, &self.key, &validation) {
            Ok(data) => data.claims,
            Err(e) => bail!("validate jwt token failed: {e}"),
        };

        let id: u64 = match claims.sub.parse() {
            Ok(id) => id,
            Err(_) => bail!("validate jwt token failed: invalid subject"),
        };
        if claims.email.is_empty() {
            bail!("validate jwt token failed: empty email");
        }

        let now = current_timestamp() as usize;
        if now >= claims.exp {
            bail!("validate jwt token failed: token expired");
        }
        if now < claims.nbf {
            bail!("validate jwt token failed: token not yet valid");
        }

        Ok(Principal {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}
