mod config;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use crate::config::PathSet;
use crate::logs;
use crate::server::restful::RestfulServer;

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Server(server::ServerArgs),
    Config(config::ShowConfigArgs),
}

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

/// Commands that start a long running server. The returned server is run by
/// [`App::run`].
#[async_trait]
pub trait ServerCommand {
    async fn build_server(&self) -> Result<RestfulServer>;
}

impl App {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Server(args) => {
                let srv = args.build_server().await?;
                srv.run().await
            }
            Commands::Config(args) => args.run().await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// The config directory. Default: `$USERMGR_CONFIG`, `/etc/usermgr` for root,
    /// otherwise `~/.config/usermgr`.
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// The data directory, holds the sqlite database. Default: `$USERMGR_DATA`,
    /// `/var/lib/usermgr` for root, otherwise `~/.local/share/usermgr`.
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// The log level, one of error, warn, info, debug.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl LogArgs {
    pub fn init(&self) -> Result<()> {
        logs::init(&self.log_level)
    }
}
