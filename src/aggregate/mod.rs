pub mod logic;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::checkpoint::{BucketStore, RecordStore};
use crate::config::HarvestConfig;
use crate::telemetry::{self};
use crate::telemetry::ops::aggregate::Phase as AggregatePhase;

use self::logic::aggregate;

#[derive(Args)]
pub struct AggregateCmd {
    /// Records checkpoint to read
    #[arg(long)] pub checkpoint: Option<PathBuf>,
    /// Buckets file to (re)write
    #[arg(long)] pub buckets: Option<PathBuf>,
    #[arg(long, default_value_t = false)] pub apply: bool,
}

#[derive(Serialize)]
struct BucketCount { name: String, articles: usize }

#[derive(Serialize)]
struct AggregateReport {
    records: usize,
    uncategorized: usize,
    buckets_path: String,
    buckets: Vec<BucketCount>,
}

pub async fn run(args: AggregateCmd) -> Result<()> {
    let cfg = HarvestConfig::from_env();
    let log = telemetry::aggregate();
    let _g = log.root_span_kv([
        ("checkpoint", format!("{:?}", args.checkpoint)),
        ("buckets", format!("{:?}", args.buckets)),
        ("apply", args.apply.to_string()),
    ]).entered();

    let store = RecordStore::new(args.checkpoint.unwrap_or(cfg.checkpoint));
    let out = BucketStore::new(args.buckets.unwrap_or(cfg.buckets));

    let records = {
        let _s = log.span(&AggregatePhase::LoadRecords).entered();
        store.load().with_context(|| format!("loading checkpoint {}", store.path().display()))?
    };
    let buckets = { let _s = log.span(&AggregatePhase::Structure).entered(); aggregate(&records) };

    let report = AggregateReport {
        records: records.len(),
        uncategorized: records.iter().filter(|r| r.categories.is_empty()).count(),
        buckets_path: out.path().display().to_string(),
        buckets: buckets.values().map(|b| BucketCount { name: b.name.clone(), articles: b.articles.len() }).collect(),
    };

    if !args.apply {
        let _sp = log.span(&AggregatePhase::Plan).entered();
        log.info(format!(
            "📝 Aggregate plan: records={} buckets={} uncategorized={} -> {}",
            report.records, report.buckets.len(), report.uncategorized, report.buckets_path
        ));
        for b in &report.buckets { log.info(format!("  {} ({})", b.name, b.articles)); }
        log.info("   Use --apply to execute.");
        log.plan(&report)?;
        return Ok(());
    }

    {
        let _s = log.span(&AggregatePhase::SaveBuckets).entered();
        out.save(&buckets).with_context(|| format!("writing buckets {}", out.path().display()))?;
    }
    log.info(format!("✅ Wrote {} buckets to {}", buckets.len(), out.path().display()));
    log.result(&report)?;
    Ok(())
}
