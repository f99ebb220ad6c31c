use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::HttpRequest;

use crate::server::db::Database;
use crate::server::response::Response;
use crate::server::service::users::{UpdateOutcome, UserService};
use crate::types::response::{CountMeta, MessageResponse, ResourceResponse, ResultMeta};

use super::{parse_json_object, Handler};

pub struct UsersHandler {
    service: UserService,
}

impl UsersHandler {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: UserService::new(db),
        }
    }

    fn list(&self) -> Response {
        match self.service.list() {
            Ok(users) => {
                let count = users.len();
                Response::ok(ResourceResponse {
                    data: users,
                    meta: Some(CountMeta { count }),
                })
            }
            Err(e) => e.into(),
        }
    }

    fn create(&self, body: Option<Vec<u8>>) -> Response {
        let fields = match parse_json_object(body) {
            Ok(fields) => fields,
            Err(resp) => return resp,
        };
        match self.service.create(&fields) {
            Ok(user) => Response::json(
                StatusCode::CREATED,
                ResourceResponse {
                    data: user,
                    meta: Some(ResultMeta::success("user created")),
                },
            ),
            Err(e) => e.into(),
        }
    }

    fn show(&self, id: &str) -> Response {
        match self.service.show(id) {
            Ok(user) => Response::ok(ResourceResponse::<_, ()> {
                data: user,
                meta: None,
            }),
            Err(e) => e.into(),
        }
    }

    fn update(&self, id: &str, body: Option<Vec<u8>>) -> Response {
        let fields = match parse_json_object(body) {
            Ok(fields) => fields,
            Err(resp) => return resp,
        };
        match self.service.update(id, &fields) {
            Ok(UpdateOutcome::Unchanged) => Response::json(
                StatusCode::NOT_MODIFIED,
                MessageResponse {
                    message: String::from("nothing to change"),
                },
            ),
            Ok(UpdateOutcome::Updated(user)) => Response::ok(ResourceResponse {
                data: user,
                meta: Some(ResultMeta::success("updated")),
            }),
            Err(e) => e.into(),
        }
    }

    fn delete(&self, id: &str) -> Response {
        match self.service.delete(id) {
            Ok(()) => Response::message(StatusCode::NO_CONTENT, "user deleted"),
            Err(e) => e.into(),
        }
    }
}

impl Handler for UsersHandler {
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response {
        let id = path.trim_matches('/');
        if id.contains('/') {
            return Response::not_found();
        }

        let method = req.method();
        if id.is_empty() {
            if method == Method::GET {
                return self.list();
            }
            if method == Method::POST {
                return self.create(body);
            }
            return Response::message(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        if method == Method::GET {
            self.show(id)
        } else if method == Method::PATCH {
            self.update(id, body)
        } else if method == Method::DELETE {
            self.delete(id)
        } else {
            Response::message(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        }
    }
}
