use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use log::error;
use serde::Serialize;

use crate::types::response::{ErrorResponse, FieldErrors, MessageResponse};

use super::service::ServiceError;

pub const AUTHN_ERROR: &str = "Authentication failed";
pub const AUTHZ_ERROR: &str = "Authorization failed";
pub const DATABASE_ERROR: &str = "Database error";
pub const TOKEN_ERROR: &str = "Generate token failed";
pub const INVALID_TOKEN: &str = "Invalid token";

/// Wraps the `HttpResponse` returned by handlers. Every body is JSON.
#[derive(Debug)]
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    pub fn json<T: Serialize>(status: StatusCode, data: T) -> Self {
        Self {
            http_response: HttpResponseBuilder::new(status).json(data),
        }
    }

    pub fn ok<T: Serialize>(data: T) -> Self {
        Self::json(StatusCode::OK, data)
    }

    /// `{"message": ..}` with the given status.
    pub fn message(status: StatusCode, message: impl ToString) -> Self {
        Self::json(
            status,
            MessageResponse {
                message: message.to_string(),
            },
        )
    }

    /// `{"error": ..}` with the given status.
    pub fn error_message(status: StatusCode, error: impl ToString) -> Self {
        Self::json(
            status,
            ErrorResponse {
                error: error.to_string(),
            },
        )
    }

    pub fn not_found() -> Self {
        Self::message(StatusCode::NOT_FOUND, "Resource not found")
    }

    pub fn bad_request(message: impl AsRef<str>) -> Self {
        Self::message(
            StatusCode::BAD_REQUEST,
            format!("Bad request: {}", message.as_ref()),
        )
    }

    pub fn unauthenticated(message: impl ToString) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl ToString) -> Self {
        Self::message(StatusCode::FORBIDDEN, message)
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::json(StatusCode::UNPROCESSABLE_ENTITY, errors)
    }

    pub fn error(message: &str) -> Self {
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ServiceError> for Response {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Response::validation(errors),
            ServiceError::NotFound => Response::not_found(),
            ServiceError::Rejected(msg) => {
                Response::error_message(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ServiceError::Database(e) => {
                error!("Service failed: {e:#}");
                Response::error(DATABASE_ERROR)
            }
        }
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
