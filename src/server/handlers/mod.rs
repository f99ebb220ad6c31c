pub mod healthz;
pub mod login;
pub mod password;
pub mod users;

use actix_web::HttpRequest;
use serde_json::{Map, Value};

use super::response::Response;

pub trait Handler {
    /// `path` is the part of the route after the handler's prefix, e.g. the
    /// user id for `/users/{id}`, or empty.
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response;
}

/// Decodes a JSON object body. A missing or empty body yields an empty map.
pub fn parse_json_object(body: Option<Vec<u8>>) -> Result<Map<String, Value>, Response> {
    let body = match body {
        Some(body) if !body.iter().all(u8::is_ascii_whitespace) => body,
        _ => return Ok(Map::new()),
    };

    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Response::bad_request("JSON object expected")),
        Err(e) => Err(Response::bad_request(format!("Invalid JSON: {e}"))),
    }
}
