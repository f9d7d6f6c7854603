use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use positivliste::cache::SnapshotCache;
use positivliste::config::Config;
use positivliste::fetcher::HttpFetcher;
use positivliste::logging;
use positivliste::pipeline::PositiveListPipeline;
use positivliste::service::LookupService;

#[derive(Parser)]
#[command(name = "positivliste")]
#[command(about = "Lookup tool for the skat.dk positive list of investment funds")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up an ISIN in the current positive list
    Search {
        /// ISIN to look up, e.g. DK0060534915
        isin: String,
    },
    /// Force a fresh download of the list and print a summary
    Reload,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    let fetcher = HttpFetcher::new(Duration::from_secs(config.source.timeout_seconds))?;
    let pipeline = PositiveListPipeline::new(Arc::new(fetcher), config.source.url);
    let cache = Arc::new(SnapshotCache::new(Arc::new(pipeline)));
    let service = LookupService::new(cache);

    match cli.command {
        Commands::Search { isin } => match service.search(&isin).await {
            Ok(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Err(e) => {
                error!("Search failed: {}", e);
                println!("❌ Search failed ({}): {}", e.kind(), e);
                std::process::exit(1);
            }
        },
        Commands::Reload => match service.reload().await {
            Ok(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Err(e) => {
                error!("Reload failed: {}", e);
                println!("❌ Reload failed ({}): {}", e.kind(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
