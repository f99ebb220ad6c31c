mod cmd;
mod config;
mod dirs;
mod logs;
mod rsa;
mod secret;
mod server;
mod time;
mod types;

use std::process;

use clap::Parser;

use crate::cmd::App;

#[tokio::main]
async fn main() {
    let app = App::parse();
    match app.run().await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
