pub mod markdown;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::checkpoint::{RecordStore, write_atomic};
use crate::config::HarvestConfig;
use crate::error::PersistenceError;
use crate::model::ArticleRecord;
use crate::telemetry::{self};
use crate::telemetry::ops::export::Phase as ExportPhase;

use self::markdown::{file_name, render};

pub const DEFAULT_AUTHOR: &str = "Anonyme";

#[derive(Args)]
pub struct ExportCmd {
    #[arg(long)] pub checkpoint: Option<PathBuf>,
    #[arg(long, default_value = "articles_markdown")] pub out_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_AUTHOR)] pub author: String,
    /// Category used for records without one (defaults to HARVEST_DEFAULT_CATEGORY)
    #[arg(long)] pub default_category: Option<String>,
    #[arg(long, default_value_t = false)] pub apply: bool,
    #[arg(long, default_value_t = 10)] pub plan_limit: usize,
}

#[derive(Serialize)]
struct ExportPlan { records: usize, out_dir: String, sample_files: Vec<String> }

#[derive(Serialize)]
struct ExportResult { written: usize, out_dir: String }

pub async fn run(args: ExportCmd) -> Result<()> {
    let cfg = HarvestConfig::from_env();
    let log = telemetry::export();
    let _g = log.root_span_kv([
        ("out_dir", args.out_dir.display().to_string()),
        ("author", args.author.clone()),
        ("apply", args.apply.to_string()),
    ]).entered();

    let store = RecordStore::new(args.checkpoint.clone().unwrap_or_else(|| cfg.checkpoint.clone()));
    let records = {
        let _s = log.span(&ExportPhase::LoadRecords).entered();
        store.load().with_context(|| format!("loading checkpoint {}", store.path().display()))?
    };
    let default_category = args.default_category.clone().unwrap_or_else(|| cfg.default_category.clone());

    if !args.apply {
        let _sp = log.span(&ExportPhase::Plan).entered();
        let names: Vec<String> = records.iter().enumerate().map(|(i, r)| file_name(i + 1, r)).collect();
        log.info(format!("📝 Export plan: records={} out_dir={}", records.len(), args.out_dir.display()));
        for n in names.iter().take(args.plan_limit) { log.info(format!("  {}", n)); }
        if names.len() > args.plan_limit { log.info(format!("  ... ({} more)", names.len() - args.plan_limit)); }
        log.info("   Use --apply to execute.");
        let plan = ExportPlan {
            records: records.len(),
            out_dir: args.out_dir.display().to_string(),
            sample_files: names.into_iter().take(args.plan_limit).collect(),
        };
        log.plan(&plan)?;
        return Ok(());
    }

    let written = export_records(&records, &args.out_dir, &args.author, &default_category)
        .with_context(|| format!("exporting to {}", args.out_dir.display()))?;
    log.info(format!("✅ Exported {} documents to {}", written.len(), args.out_dir.display()));
    log.result(&ExportResult { written: written.len(), out_dir: args.out_dir.display().to_string() })?;
    Ok(())
}

/// Write one markdown document per record; returns the paths written.
pub fn export_records(records: &[ArticleRecord], out_dir: &Path, author: &str, default_category: &str) -> Result<Vec<PathBuf>, PersistenceError> {
    let log = telemetry::export();
    let mut written = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let path = out_dir.join(file_name(i + 1, record));
        let doc = { let _s = log.span(&ExportPhase::Render).entered(); render(record, author, default_category) };
        {
            let _s = log.span_kv(&ExportPhase::Write, [("path", path.display().to_string())]).entered();
            write_atomic(&path, doc.as_bytes())?;
        }
        written.push(path);
    }
    Ok(written)
}
