use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use anyhow::Result;
use log::debug;

use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse};

pub struct BearerTokenAuthenticator<T: TokenValidator> {
    validator: T,
}

impl<T: TokenValidator> BearerTokenAuthenticator<T> {
    pub fn new(validator: T) -> Self {
        Self { validator }
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for BearerTokenAuthenticator<T> {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse> {
        let auth = match req.headers().get(AUTHORIZATION) {
            Some(auth) => match auth.to_str() {
                Ok(auth) => auth.trim(),
                Err(_) => return Ok(AuthnResponse::Unauthenticated),
            },
            None => return Ok(AuthnResponse::Continue),
        };

        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let mut iter = auth.split_whitespace();
        match iter.next() {
            Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
            _ => return Ok(AuthnResponse::Unauthenticated),
        }

        let token = match iter.next() {
            Some(token) => token,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if iter.next().is_some() {
            return Ok(AuthnResponse::Unauthenticated);
        }

        match self.validator.validate_token(token) {
            Ok(principal) => Ok(AuthnResponse::Ok(principal)),
            Err(e) => {
                debug!("Reject bearer token: {e:#}");
                Ok(AuthnResponse::Unauthenticated)
            }
        }
    }
}
