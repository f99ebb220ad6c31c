use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::config::CommonConfig;
use crate::server::config::ServerConfig;

use super::{ConfigArgs, RunCommand};

/// Display the server configuration in use, in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;
        let cfg = ps.load_config("server", ServerConfig::default)?;
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        Ok(())
    }
}
