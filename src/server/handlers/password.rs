use actix_web::http::StatusCode;
use actix_web::HttpRequest;

use crate::server::response::Response;
use crate::server::service::password::PasswordResetService;

use super::{parse_json_object, Handler};

pub struct PasswordHandler {
    service: PasswordResetService,
}

impl PasswordHandler {
    pub fn new(service: PasswordResetService) -> Self {
        Self { service }
    }
}

impl Handler for PasswordHandler {
    fn handle(&self, _path: &str, _req: HttpRequest, body: Option<Vec<u8>>) -> Response {
        let fields = match parse_json_object(body) {
            Ok(fields) => fields,
            Err(resp) => return resp,
        };

        match self.service.send_reset_link(&fields) {
            Ok(()) => Response::message(StatusCode::OK, PasswordResetService::SENT),
            Err(e) => e.into(),
        }
    }
}
