use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::info;

use crate::config::CommonConfig;
use crate::server::config::ServerConfig;
use crate::server::factory::ServerFactory;
use crate::server::restful::RestfulServer;

use super::{ConfigArgs, LogArgs, ServerCommand};

/// Start the user management server. This command will start an HTTP/HTTPS
/// server, creating the database and the admin account on first start.
#[derive(Args)]
pub struct ServerArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[async_trait]
impl ServerCommand for ServerArgs {
    async fn build_server(&self) -> Result<RestfulServer> {
        self.log.init()?;
        info!("Starting usermgr version {}", env!("CARGO_PKG_VERSION"));

        let ps = self.config.build_path_set()?;
        let cfg: ServerConfig = ps.load_config("server", ServerConfig::default)?;
        let factory = ServerFactory::new(cfg)?;

        factory.build_server()
    }
}
