use actix_web::HttpRequest;
use chrono::Local;

use crate::server::response::Response;
use crate::types::healthz::HealthzResponse;

use super::Handler;

pub struct HealthzHandler;

impl HealthzHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Handler for HealthzHandler {
    fn handle(&self, _path: &str, req: HttpRequest, _body: Option<Vec<u8>>) -> Response {
        let local = Local::now();
        let response = HealthzResponse {
            now: local.timestamp() as u64,
            time_zone: format!("{}", local.offset()),
            client_ip: req.connection_info().peer_addr().map(|a| a.to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        };
        Response::ok(response)
    }
}
