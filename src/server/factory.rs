use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslMethod};

use crate::server::authn::factory::AuthnFactory;
use crate::server::authn::token::factory::TokenFactory;
use crate::server::authz::policy::RoutePolicy;
use crate::server::db::factory::DbFactory;
use crate::server::handlers::healthz::HealthzHandler;
use crate::server::handlers::login::LoginHandler;
use crate::server::handlers::password::PasswordHandler;
use crate::server::handlers::users::UsersHandler;
use crate::server::mail::LogSender;
use crate::server::service::password::PasswordResetService;

use super::admin::seed_admin;
use super::config::ServerConfig;
use super::db::Database;
use super::restful::{RestfulContext, RestfulServer};

pub struct ServerFactory {
    db: Arc<Database>,
    cfg: ServerConfig,
}

impl ServerFactory {
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let db_factory = DbFactory::new();
        let db = db_factory.build_db(&cfg.db).context("init database")?;
        seed_admin(&db, &cfg.admin).context("seed admin user")?;
        Ok(Self { cfg, db })
    }

    pub fn build_server(&self) -> Result<RestfulServer> {
        let ssl = self.build_ssl()?;
        let ctx = self.build_context()?;

        let mut srv =
            RestfulServer::new(self.cfg.bind.clone(), ssl, ctx, self.cfg.payload_limit_mib);
        if self.cfg.keep_alive_secs > 0 {
            srv.set_keep_alive_secs(self.cfg.keep_alive_secs);
        }
        if self.cfg.workers > 0 {
            srv.set_workers(self.cfg.workers);
        }

        Ok(srv)
    }

    pub fn build_ssl(&self) -> Result<Option<SslAcceptorBuilder>> {
        if !self.cfg.ssl {
            return Ok(None);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&self.cfg.key_path, openssl::ssl::SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&self.cfg.cert_path)
            .context("load ssl cert file")?;

        Ok(Some(builder))
    }

    pub fn build_context(&self) -> Result<Arc<RestfulContext>> {
        let token_factory = TokenFactory::new(&self.cfg.authn.token).context("init token")?;
        info!("Login tokens expire after {}s", token_factory.expiry());

        let authn_factory = AuthnFactory::new();
        let authn = authn_factory
            .build_authenticator(&token_factory)
            .context("init authenticator")?;

        let token_generator = token_factory
            .build_token_generator()
            .context("init token generator")?;

        let password_service = PasswordResetService::new(
            self.db.clone(),
            Arc::new(LogSender::new()),
            self.cfg.reset.throttle_secs,
            &self.cfg.reset.link_base,
        )
        .context("init password reset")?;

        let ctx = RestfulContext {
            db: self.db.clone(),
            authn,
            policy: RoutePolicy::default_policy(),
            users_handler: UsersHandler::new(self.db.clone()),
            password_handler: PasswordHandler::new(password_service),
            login_handler: LoginHandler::new(token_generator, self.db.clone()),
            healthz_handler: HealthzHandler::new(),
        };
        Ok(Arc::new(ctx))
    }
}
