use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::web::{self, Bytes, Data, PayloadConfig, ServiceConfig};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use openssl::ssl::SslAcceptorBuilder;
use sd_notify::NotifyState;

use super::authn::token::jwt::JwtTokenValidator;
use super::authn::{AuthnResponse, Authenticator, BearerTokenAuthenticator, Principal};
use super::authz::policy::RoutePolicy;
use super::authz::AuthzResponse;
use super::db::Database;
use super::handlers::healthz::HealthzHandler;
use super::handlers::login::LoginHandler;
use super::handlers::password::PasswordHandler;
use super::handlers::users::UsersHandler;
use super::handlers::Handler;
use super::response::{self, Response};

pub struct RestfulServer {
    ssl: Option<SslAcceptorBuilder>,
    ctx: Arc<RestfulContext>,

    keep_alive_secs: Option<u64>,
    workers: Option<u64>,

    bind: String,

    payload_limit_mib: usize,
}

pub struct RestfulContext {
    pub db: Arc<Database>,
    pub authn: BearerTokenAuthenticator<JwtTokenValidator>,
    pub policy: RoutePolicy,

    pub users_handler: UsersHandler,
    pub password_handler: PasswordHandler,
    pub login_handler: LoginHandler,
    pub healthz_handler: HealthzHandler,
}

impl RestfulContext {
    /// Authenticates the request and checks the policy of its matched route.
    /// Returns the response to send instead of calling the handler when the
    /// request is rejected.
    fn gate(&self, req: &HttpRequest) -> Option<Response> {
        let principal = match self.authn.authenticate_request(req) {
            Ok(AuthnResponse::Ok(principal)) => match self.current_principal(&principal) {
                Ok(Some(principal)) => Some(principal),
                Ok(None) => return Some(Response::unauthenticated(response::INVALID_TOKEN)),
                Err(e) => {
                    error!("Load user {} for request error: {e:#}", principal.id);
                    return Some(Response::error(response::DATABASE_ERROR));
                }
            },
            Ok(AuthnResponse::Continue) => None,
            Ok(AuthnResponse::Unauthenticated) => {
                return Some(Response::unauthenticated(response::INVALID_TOKEN))
            }
            Err(e) => {
                error!("Authenticate request error: {e:#}");
                return Some(Response::error(response::AUTHN_ERROR));
            }
        };

        let route = req.match_pattern().unwrap_or_default();
        match self
            .policy
            .authorize(req.method(), &route, principal.as_ref())
        {
            Ok(AuthzResponse::Ok) => None,
            Ok(AuthzResponse::Unauthorized(msg)) => Some(Response::unauthenticated(msg)),
            Ok(AuthzResponse::Forbidden(msg)) => Some(Response::forbidden(msg)),
            Err(e) => {
                error!("Authorize request error: {e:#}");
                Some(Response::error(response::AUTHZ_ERROR))
            }
        }
    }

    /// Replaces the token claims with the user's stored email and role. A
    /// token whose user no longer exists yields `None`.
    fn current_principal(&self, principal: &Principal) -> Result<Option<Principal>> {
        let record = match self.db.with_transaction(|tx| tx.get_user(principal.id))? {
            Some(record) => record,
            None => {
                debug!("Reject token of deleted user {}", principal.id);
                return Ok(None);
            }
        };
        Ok(Some(Principal {
            id: record.id,
            email: record.email,
            role: record.role,
        }))
    }
}

impl RestfulServer {
    const USERS_PATH: &'static str = RoutePolicy::USERS_ROUTE;
    const USER_PATH: &'static str = RoutePolicy::USER_ROUTE;
    const PASSWORD_EMAIL_PATH: &'static str = RoutePolicy::PASSWORD_EMAIL_ROUTE;
    const LOGIN_PATH: &'static str = "/login";
    const HEALTHZ_PATH: &'static str = "/healthz";

    pub fn new(
        bind: String,
        ssl: Option<SslAcceptorBuilder>,
        ctx: Arc<RestfulContext>,
        payload_limit_mib: usize,
    ) -> Self {
        Self {
            ssl,
            ctx,
            keep_alive_secs: None,
            workers: None,
            bind,
            payload_limit_mib,
        }
    }

    pub fn set_keep_alive_secs(&mut self, keep_alive_secs: u64) {
        self.keep_alive_secs = Some(keep_alive_secs);
    }

    pub fn set_workers(&mut self, workers: u64) {
        self.workers = Some(workers);
    }

    pub async fn run(mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let payload_limit_mib = self.payload_limit_mib;
        let mut srv = HttpServer::new(move || {
            let ctx = ctx.clone();
            App::new()
                .configure(move |cfg| Self::configure(cfg, ctx, payload_limit_mib))
                .default_service(web::route().to(Self::default_handler))
        });

        if let Some(ssl) = self.ssl.take() {
            info!("Binding to https://{}", self.bind);
            srv = srv.bind_openssl(&self.bind, ssl).context("bind with ssl")?
        } else {
            warn!("Using HTTP (without SSL). THIS IS DANGEROUS, DO NOT USE IN PRODUCTION");
            info!("Binding to http://{}", self.bind);
            srv = srv.bind(&self.bind).context("bind without ssl")?
        };

        if let Some(keep_alive) = self.keep_alive_secs {
            srv = srv.keep_alive(Duration::from_secs(keep_alive));
        }
        if let Some(workers) = self.workers {
            srv = srv.workers(workers as usize);
        }

        sd_notify::notify(true, &[NotifyState::Ready]).context("notify systemd")?;
        info!("Starting restful server");
        srv.run().await.context("run server")?;

        info!("Server stopped by user");
        Ok(())
    }

    /// Registers the context and every route. Unknown routes are left to the
    /// app's default service.
    pub fn configure(cfg: &mut ServiceConfig, ctx: Arc<RestfulContext>, payload_limit_mib: usize) {
        cfg.app_data(Data::new(ctx))
            .app_data(PayloadConfig::new(payload_limit_mib * 1024 * 1024))
            .service(
                web::resource(Self::USERS_PATH)
                    .route(web::get().to(Self::handle_users))
                    .route(web::post().to(Self::handle_users)),
            )
            .service(
                web::resource(Self::USER_PATH)
                    .route(web::get().to(Self::handle_users))
                    .route(web::patch().to(Self::handle_users))
                    .route(web::delete().to(Self::handle_users)),
            )
            .service(
                web::resource(Self::PASSWORD_EMAIL_PATH)
                    .route(web::post().to(Self::handle_password)),
            )
            .service(web::resource(Self::LOGIN_PATH).route(web::post().to(Self::handle_login)))
            .service(
                web::resource(Self::HEALTHZ_PATH).route(web::get().to(Self::handle_healthz)),
            );
    }

    async fn handle_users(
        req: HttpRequest,
        body: Option<Bytes>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        if let Some(resp) = ctx.gate(&req) {
            return resp.into();
        }
        let id = req.match_info().get("id").unwrap_or_default().to_string();
        let body = Self::parse_body(body);

        ctx.users_handler.handle(&id, req, body).into()
    }

    async fn handle_password(
        req: HttpRequest,
        body: Option<Bytes>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        if let Some(resp) = ctx.gate(&req) {
            return resp.into();
        }
        let body = Self::parse_body(body);

        ctx.password_handler.handle("", req, body).into()
    }

    async fn handle_login(
        req: HttpRequest,
        body: Option<Bytes>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        if let Some(resp) = ctx.gate(&req) {
            return resp.into();
        }
        let body = Self::parse_body(body);

        ctx.login_handler.handle("", req, body).into()
    }

    async fn handle_healthz(
        req: HttpRequest,
        body: Option<Bytes>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        let body = Self::parse_body(body);

        ctx.healthz_handler.handle("", req, body).into()
    }

    pub async fn default_handler(req: HttpRequest) -> HttpResponse {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        let message = format!("No route to {method} {path}");
        Response::message(StatusCode::NOT_FOUND, message).into()
    }

    fn parse_body(body: Option<Bytes>) -> Option<Vec<u8>> {
        body.map(|b| b.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::http::Method;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};

    use crate::rsa::generate_rsa_keys;
    use crate::config::CommonConfig;
    use crate::secret::password::PasswordHasher;
    use crate::server::admin::{seed_admin, AdminConfig};
    use crate::server::authn::token::jwt::JwtTokenGenerator;
    use crate::server::authn::token::TokenGenerator;
    use crate::server::db::types::UserRecord;
    use crate::server::mail::tests::MemorySender;
    use crate::server::service::password::PasswordResetService;
    use crate::time::current_timestamp;
    use crate::types::user::Role;

    use super::*;

    struct Fixture {
        ctx: Arc<RestfulContext>,
        sender: Arc<MemorySender>,
        admin_token: String,
        manager_token: String,
    }

    fn fixture() -> Fixture {
        let db = Arc::new(Database::new_test());
        let admin_id = seed_admin(&db, &AdminConfig::default()).unwrap().unwrap();
        let manager_id = db
            .with_transaction(|tx| {
                tx.create_user(&UserRecord {
                    id: 0,
                    names: String::from("Marta"),
                    lastname: String::from("Gil"),
                    email: String::from("manager@x.com"),
                    role: Role::Manager,
                    password: PasswordHasher::hash("manager"),
                    remember_token: String::from("0123456789"),
                    create_time: 1,
                    update_time: 1,
                })
            })
            .unwrap();

        let (public_key, private_key) = generate_rsa_keys().unwrap();
        let generator = JwtTokenGenerator::new(&private_key, 3600).unwrap();
        let validator = JwtTokenValidator::new(&public_key).unwrap();

        let admin_token = generator
            .generate_token(&Principal {
                id: admin_id,
                email: String::from("admin@localhost"),
                role: Role::Admin,
            })
            .unwrap()
            .token;
        let manager_token = generator
            .generate_token(&Principal {
                id: manager_id,
                email: String::from("manager@x.com"),
                role: Role::Manager,
            })
            .unwrap()
            .token;

        let sender = Arc::new(MemorySender::default());
        let password_service = PasswordResetService::new(
            db.clone(),
            sender.clone(),
            60,
            "http://localhost/password/reset",
        )
        .unwrap();

        let ctx = RestfulContext {
            db: db.clone(),
            authn: BearerTokenAuthenticator::new(validator),
            policy: RoutePolicy::default_policy(),
            users_handler: UsersHandler::new(db.clone()),
            password_handler: PasswordHandler::new(password_service),
            login_handler: LoginHandler::new(generator, db),
            healthz_handler: HealthzHandler::new(),
        };

        Fixture {
            ctx: Arc::new(ctx),
            sender,
            admin_token,
            manager_token,
        }
    }

    macro_rules! init {
        ($ctx:expr) => {{
            let ctx = $ctx;
            test::init_service(
                App::new()
                    .configure(move |cfg| RestfulServer::configure(cfg, ctx, 1))
                    .default_service(web::route().to(RestfulServer::default_handler)),
            )
            .await
        }};
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestRequest {
        let mut req = TestRequest::default().method(method).uri(uri);
        if let Some(token) = token {
            req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
        }
        if let Some(body) = body {
            req = req.set_json(body);
        }
        req
    }

    fn ana() -> Value {
        json!({
            "names": "Ana",
            "lastname": "Lopez",
            "email": "ana@x.com",
            "password": "secret1",
            "role": "ADMIN",
        })
    }

    macro_rules! call {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body = test::read_body(resp).await;
            let value: Value = if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&body).unwrap()
            };
            (status, value)
        }};
    }

    #[actix_web::test]
    async fn test_create_user() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let token = Some(fx.admin_token.as_str());

        let (status, body) = call!(app, request(Method::POST, "/users", token, Some(ana())));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["email"], "ana@x.com");
        assert_eq!(body["data"]["role"], "ADMIN");
        assert_eq!(body["meta"]["success"], true);
        assert_eq!(body["meta"]["message"], "user created");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"].get("remember_token").is_none());

        let (status, body) = call!(app, request(Method::POST, "/users", token, Some(ana())));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["email"], json!(["The email has already been taken."]));

        let (status, body) = call!(app, request(Method::POST, "/users", token, Some(json!({}))));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        for field in ["names", "lastname", "email", "password", "role"] {
            assert!(body.get(field).is_some(), "missing error for {field}");
        }

        let (status, _) = call!(
            app,
            TestRequest::post()
                .uri("/users")
                .insert_header((AUTHORIZATION, format!("Bearer {}", fx.admin_token)))
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_users() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());

        let (status, body) = call!(app, request(Method::GET, "/users", Some(&fx.admin_token), None));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["count"], 2);
        assert_eq!(body["data"][0]["email"], "admin@localhost");
        assert_eq!(body["data"][1]["email"], "manager@x.com");

        let (status, body) =
            call!(app, request(Method::GET, "/users", Some(&fx.manager_token), None));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["count"], 2);

        let (status, body) = call!(app, request(Method::GET, "/users", None, None));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Permission Denied, only managers");

        let (status, body) = call!(app, request(Method::GET, "/users", Some("bad.token"), None));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn test_manager_denied() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let token = Some(fx.manager_token.as_str());
        let admin = Some(fx.admin_token.as_str());

        let (_, before) = call!(app, request(Method::GET, "/users", admin, None));

        let cases = [
            (Method::POST, "/users", Some(ana())),
            (Method::GET, "/users/1", None),
            (Method::PATCH, "/users/1", Some(json!({"names": "X"}))),
            (Method::DELETE, "/users/1", None),
        ];
        for (method, uri, body) in cases {
            let (status, resp) = call!(app, request(method.clone(), uri, token, body));
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(resp["message"], "Permission Denied, only admins");
        }

        let (status, _) = call!(app, request(Method::DELETE, "/users/1", None, None));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, resp) = call!(app, request(Method::POST, "/users", None, Some(ana())));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp["message"], "Permission Denied, only admins");
        let (status, _) = call!(
            app,
            request(Method::PATCH, "/users/1", None, Some(json!({"names": "X"})))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, after) = call!(app, request(Method::GET, "/users", admin, None));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after, before);
        assert_eq!(after["meta"]["count"], 2);

        let (status, body) = call!(app, request(Method::GET, "/users/1", admin, None));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], before["data"][0]);
        assert_eq!(body["data"]["names"], "Admin");
        assert_eq!(body["data"]["role"], "ADMIN");
    }

    #[actix_web::test]
    async fn test_role_read_from_store() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let admin = Some(fx.admin_token.as_str());

        let (status, body) = call!(app, request(Method::POST, "/users", admin, Some(ana())));
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/users/{}", body["data"]["id"]);

        let (status, body) = call!(
            app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({"email": "ana@x.com", "password": "secret1"}))
            )
        );
        assert_eq!(status, StatusCode::OK);
        let ana_token = body["token"].as_str().unwrap().to_string();
        let bob = json!({
            "names": "Bob",
            "lastname": "Diaz",
            "email": "bob@x.com",
            "password": "secret2",
            "role": "MANAGER",
        });

        let (status, _) = call!(
            app,
            request(Method::PATCH, &uri, admin, Some(json!({"role": "MANAGER"})))
        );
        assert_eq!(status, StatusCode::OK);

        // The token still claims ADMIN.
        let (status, body) = call!(
            app,
            request(Method::POST, "/users", Some(&ana_token), Some(bob.clone()))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Permission Denied, only admins");
        let (status, _) = call!(app, request(Method::GET, "/users", Some(&ana_token), None));
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(app, request(Method::DELETE, &uri, admin, None));
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call!(
            app,
            request(Method::POST, "/users", Some(&ana_token), Some(bob))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
        let (status, _) = call!(app, request(Method::GET, "/users", Some(&ana_token), None));
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = call!(app, request(Method::GET, "/users", admin, None));
        assert_eq!(body["meta"]["count"], 2);
        assert!(body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|user| user["email"] != "bob@x.com"));
    }

    #[actix_web::test]
    async fn test_show_user() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let token = Some(fx.admin_token.as_str());

        let (_, body) = call!(app, request(Method::POST, "/users", token, Some(ana())));
        let id = body["data"]["id"].as_u64().unwrap();

        let (status, body) = call!(app, request(Method::GET, &format!("/users/{id}"), token, None));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["names"], "Ana");
        assert!(body.get("meta").is_none());

        let (status, _) = call!(app, request(Method::GET, "/users/9999", token, None));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call!(app, request(Method::GET, "/users/abc", token, None));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_user() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let token = Some(fx.admin_token.as_str());

        let (_, body) = call!(app, request(Method::POST, "/users", token, Some(ana())));
        let uri = format!("/users/{}", body["data"]["id"]);

        let (status, _) = call!(
            app,
            request(Method::PATCH, &uri, token, Some(json!({"names": "Ana"})))
        );
        assert_eq!(status, StatusCode::NOT_MODIFIED);

        let (status, body) = call!(
            app,
            request(
                Method::PATCH,
                &uri,
                token,
                Some(json!({"names": "Anabel", "role": "MANAGER"}))
            )
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["names"], "Anabel");
        assert_eq!(body["data"]["role"], "MANAGER");
        assert_eq!(body["meta"]["message"], "updated");

        let (status, body) = call!(
            app,
            request(Method::PATCH, &uri, token, Some(json!({"role": "manager"})))
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["role"], json!(["The selected role is invalid."]));

        let (status, _) = call!(
            app,
            request(Method::PATCH, "/users/9999", token, Some(json!({"names": "X"})))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_user() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let token = Some(fx.admin_token.as_str());

        let (_, body) = call!(app, request(Method::POST, "/users", token, Some(ana())));
        let uri = format!("/users/{}", body["data"]["id"]);

        let (status, _) = call!(app, request(Method::DELETE, &uri, token, None));
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call!(app, request(Method::DELETE, &uri, token, None));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call!(app, request(Method::GET, &uri, token, None));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_password_email() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());
        let body = Some(json!({"email": "admin@localhost"}));

        let (status, resp) = call!(app, request(Method::POST, "/password/email", None, body.clone()));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["message"], PasswordResetService::SENT);
        {
            let sent = fx.sender.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].email, "admin@localhost");
            assert!(sent[0].link.starts_with("http://localhost/password/reset?token="));
        }

        let (status, resp) = call!(app, request(Method::POST, "/password/email", None, body.clone()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["error"], PasswordResetService::THROTTLED);

        let (status, resp) = call!(
            app,
            request(
                Method::POST,
                "/password/email",
                None,
                Some(json!({"email": "nobody@x.com"}))
            )
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["error"], PasswordResetService::INVALID_USER);

        let (status, resp) = call!(
            app,
            request(Method::POST, "/password/email", None, Some(json!({"email": "nope"})))
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resp.get("email").is_some());

        let (status, resp) = call!(
            app,
            request(Method::POST, "/password/email", Some(&fx.admin_token), body)
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(resp["message"], "Already authenticated");
        assert_eq!(fx.sender.sent.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_login() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());

        let (status, body) = call!(
            app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({"email": "admin@localhost", "password": "admin"}))
            )
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"], "admin@localhost");
        assert!(body["expire_in"].as_u64().unwrap() >= current_timestamp() + 3600 - 1);

        let token = body["token"].as_str().unwrap().to_string();
        let req = request(Method::GET, "/users", Some(&token), None).to_http_request();
        let principal = match fx.ctx.authn.authenticate_request(&req).unwrap() {
            AuthnResponse::Ok(principal) => principal,
            resp => panic!("unexpected authn response: {resp:?}"),
        };
        assert_eq!(principal.email, "admin@localhost");
        assert_eq!(principal.role, Role::Admin);

        let (status, _) = call!(app, request(Method::GET, "/users", Some(&token), None));
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call!(
            app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({"email": "admin@localhost", "password": "wrong"}))
            )
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");

        let (status, body) = call!(
            app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({"email": "nobody@x.com", "password": "admin"}))
            )
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");

        let (status, body) = call!(app, request(Method::POST, "/login", None, Some(json!({}))));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.get("email").is_some());
        assert!(body.get("password").is_some());
    }

    #[actix_web::test]
    async fn test_healthz() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());

        let (status, body) = call!(app, request(Method::GET, "/healthz", None, None));
        assert_eq!(status, StatusCode::OK);
        assert!(body["now"].as_u64().unwrap() > 0);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let fx = fixture();
        let app = init!(fx.ctx.clone());

        let (status, body) = call!(app, request(Method::GET, "/nothing/here", None, None));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No route to GET /nothing/here");
    }
}
