use clap::{Parser, Subcommand};

use catalog_lens::config::Config;
use catalog_lens::http::run_http_server;
use catalog_lens::server::run_mcp_server;

#[derive(Parser)]
#[command(
    name = "catalog-lens",
    about = "Item catalog with AI insights, sentiment, search and recommendations"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API (default)
    Serve {
        /// Listen address, overrides CATALOG_BIND
        #[arg(long)]
        bind: Option<String>,
    },
    /// Serve the catalog as MCP tools on stdin/stdout
    Mcp,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    let service = catalog_lens::build_service(&config);

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            run_http_server(config, service).await
        }
        Command::Mcp => run_mcp_server(service).await,
    }
}
