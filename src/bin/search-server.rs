use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use catalog_graph::config::AppConfig;
use catalog_graph::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "search-server")]
#[command(about = "Similarity-search HTTP API over the movie indices")]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Metrics listener address (sets CATALOG_GRAPH_METRICS_ADDR)
    #[arg(long)]
    metrics_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_logging(&config.logging.directory, &config.logging.filter);

    if let Some(addr) = &cli.metrics_addr {
        std::env::set_var("CATALOG_GRAPH_METRICS_ADDR", addr);
    }
    metrics::init_metrics();

    let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;

    info!(
        "Search backend {} (knn index {}, text index {})",
        config.search.endpoint, config.search.knn_index, config.search.text_index
    );
    let recommender = server::build_recommender(&config.search).await?;
    server::start_server(recommender, addr).await
}
