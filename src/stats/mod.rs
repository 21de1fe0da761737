use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

pub mod summary;
pub mod types;

#[derive(Args, Debug)]
pub struct StatsCmd {
    /// Records checkpoint (defaults to HARVEST_CHECKPOINT or Articles.json)
    #[arg(long)] pub checkpoint: Option<PathBuf>,

    /// Number of categories to list (default: 20)
    #[arg(long, default_value_t = 20)]
    pub category_limit: usize,
}

pub async fn run(args: StatsCmd) -> Result<()> {
    summary::summary(args.checkpoint, args.category_limit).await
}
