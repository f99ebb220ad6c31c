use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::HttpRequest;
use log::{error, info};
use serde_json::Value;

use crate::secret::password::PasswordHasher;
use crate::server::authn::token::jwt::JwtTokenGenerator;
use crate::server::authn::token::TokenGenerator;
use crate::server::authn::Principal;
use crate::server::db::Database;
use crate::server::response::{self, Response};
use crate::server::validation::{validate, Rule, RuleSet};

use super::{parse_json_object, Handler};

pub struct LoginHandler {
    token_generator: JwtTokenGenerator,
    db: Arc<Database>,
}

impl LoginHandler {
    const INVALID_CREDENTIALS: &'static str = "Invalid email or password";

    pub fn new(token_generator: JwtTokenGenerator, db: Arc<Database>) -> Self {
        Self {
            token_generator,
            db,
        }
    }

    fn rules() -> RuleSet {
        RuleSet::new()
            .field("email", vec![Rule::Required, Rule::Email])
            .field("password", vec![Rule::Required, Rule::String])
    }
}

impl Handler for LoginHandler {
    fn handle(&self, _path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response {
        let fields = match parse_json_object(body) {
            Ok(fields) => fields,
            Err(resp) => return resp,
        };

        let result = self.db.with_transaction(|tx| {
            let errors = validate(&fields, &Self::rules(), tx)?;
            if !errors.is_empty() {
                return Ok(Err(errors));
            }
            let email = fields.get("email").and_then(Value::as_str).unwrap_or_default();
            Ok(Ok(tx.get_user_by_email(email)?))
        });

        let password = fields
            .get("password")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let record = match result {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => {
                PasswordHasher::verify_dummy(password);
                return Response::unauthenticated(Self::INVALID_CREDENTIALS);
            }
            Ok(Err(errors)) => return Response::validation(errors),
            Err(e) => {
                error!("Failed to get user record for login: {e:#}");
                return Response::error(response::DATABASE_ERROR);
            }
        };

        match PasswordHasher::verify(password, &record.password) {
            Ok(true) => {}
            Ok(false) => return Response::unauthenticated(Self::INVALID_CREDENTIALS),
            Err(e) => {
                error!("Failed to verify password for user {}: {e:#}", record.id);
                return Response::error(response::AUTHN_ERROR);
            }
        }

        let principal = Principal {
            id: record.id,
            email: record.email,
            role: record.role,
        };
        let token = match self.token_generator.generate_token(&principal) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to generate token: {e:#}");
                return Response::error(response::TOKEN_ERROR);
            }
        };

        let client_ip = req
            .connection_info()
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();
        info!("User {} logged in from '{client_ip}'", principal.email);

        Response::json(StatusCode::OK, token)
    }
}
