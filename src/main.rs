use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod model;
mod error;
mod config;
mod checkpoint;
mod crawl;
mod aggregate;
mod export;
mod upload;
mod stats;
mod util;
mod telemetry;
mod output;

#[derive(Parser)]
#[command(name = "harvest", about = "Resumable blog crawl-and-extract CLI")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk listing pages and checkpoint every new article
    Crawl(crawl::CrawlCmd),
    /// Regroup the records checkpoint into numbered category buckets
    Aggregate(aggregate::AggregateCmd),
    /// Write one markdown document per record
    Export(export::ExportCmd),
    /// Submit exported markdown documents to the ingestion endpoint
    Upload(upload::UploadCmd),
    Stats(stats::StatsCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and HARVEST_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Crawl(args) => crawl::run(args).await?,
        Commands::Aggregate(args) => aggregate::run(args).await?,
        Commands::Export(args) => export::run(args).await?,
        Commands::Upload(args) => upload::run(args).await?,
        Commands::Stats(args) => stats::run(args).await?,
    }

    Ok(())
}
