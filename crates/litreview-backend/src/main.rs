//! Literature Review Backend - Entry Point

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use litreview_backend::{SemanticScholarClient, config::Config, server::SearchServer};

#[derive(Parser, Debug)]
#[command(name = "litreview-backend")]
#[command(about = "Paper search backend for the Semantic Scholar API")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Semantic Scholar Graph API base URL
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_URL")]
    api_url: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: IpAddr,

    /// HTTP server port
    #[arg(long, default_value = "5000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting literature review backend");

    let mut config = Config::new(cli.api_key.filter(|k| !k.is_empty()));
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_graph_api_url(url)?;
    }
    tracing::info!(
        api_url = %config.graph_api_url,
        has_api_key = config.has_api_key(),
        "Semantic Scholar client configured"
    );

    let client = SemanticScholarClient::new(config)?;
    let server = SearchServer::new(client);

    server.run_http(SocketAddr::new(cli.host, cli.port)).await
}
