mod config;
mod contributions;
mod error;
mod github;
mod graph;
mod markdown;
mod models;
mod portfolio;
mod render;
mod server;
mod storage;
mod subject;

use anyhow::Result;
use config::Config;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    server::start(config).await
}
