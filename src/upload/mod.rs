pub mod client;
pub mod frontmatter;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use serde::Serialize;

use crate::config::HarvestConfig;
use crate::export::DEFAULT_AUTHOR;
use crate::export::markdown::LOCAL_SOURCE;
use crate::telemetry::{self};
use crate::telemetry::ops::upload::Phase as UploadPhase;

use self::client::{HttpUploader, UploadForm, UploadOutcome, Uploader};

#[derive(Args)]
pub struct UploadCmd {
    /// Directory of exported markdown documents
    #[arg(long, default_value = "articles_markdown")] pub dir: PathBuf,
    /// Ingestion endpoint (defaults to HARVEST_UPLOAD_URL)
    #[arg(long)] pub url: Option<String>,
    /// Contributor id sent with every document (defaults to HARVEST_CONTRIBUTOR_ID)
    #[arg(long)] pub contributor_id: Option<String>,
    #[arg(long)] pub default_category: Option<String>,
    #[arg(long, default_value_t = false)] pub apply: bool,
    #[arg(long, default_value_t = 10)] pub plan_limit: usize,
}

/// Fallbacks for documents whose metadata block lacks a field.
#[derive(Debug, Clone)]
pub struct UploadDefaults {
    pub contributor_id: String,
    pub category: String,
    /// RFC 3339 UTC timestamp used when a document has no date.
    pub now: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadItem {
    pub file: String,
    pub title: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub already_uploaded: usize,
    pub failed: usize,
    pub items: Vec<UploadItem>,
}

#[derive(Serialize)]
struct UploadPlan { dir: String, url: Option<String>, documents: usize, sample_files: Vec<String> }

pub async fn run(args: UploadCmd) -> Result<()> {
    let cfg = HarvestConfig::from_env();
    let log = telemetry::upload();
    let _g = log.root_span_kv([
        ("dir", args.dir.display().to_string()),
        ("apply", args.apply.to_string()),
    ]).entered();

    let url = args.url.clone().or_else(|| cfg.upload_url.clone());
    let files = {
        let _s = log.span(&UploadPhase::ScanDir).entered();
        markdown_files(&args.dir).with_context(|| format!("reading {}", args.dir.display()))?
    };
    if files.is_empty() {
        log.warn(format!("⚠️ No markdown files found in {}", args.dir.display()));
    }

    if !args.apply {
        let _sp = log.span(&UploadPhase::Plan).entered();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        log.info(format!("📝 Upload plan: documents={} url={}", files.len(), url.as_deref().unwrap_or("<unset>")));
        for n in names.iter().take(args.plan_limit) { log.info(format!("  {}", n)); }
        if names.len() > args.plan_limit { log.info(format!("  ... ({} more)", names.len() - args.plan_limit)); }
        log.info("   Use --apply to execute.");
        log.plan(&UploadPlan {
            dir: args.dir.display().to_string(),
            url,
            documents: files.len(),
            sample_files: names.into_iter().take(args.plan_limit).collect(),
        })?;
        return Ok(());
    }

    let url = url.ok_or_else(|| anyhow!("no upload endpoint: pass --url or set HARVEST_UPLOAD_URL"))?;
    let contributor_id = args
        .contributor_id
        .clone()
        .or_else(|| cfg.contributor_id.clone())
        .ok_or_else(|| anyhow!("no contributor id: pass --contributor-id or set HARVEST_CONTRIBUTOR_ID"))?;
    let defaults = UploadDefaults {
        contributor_id,
        category: args.default_category.clone().unwrap_or_else(|| cfg.default_category.clone()),
        now: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    let uploader = HttpUploader::new(url, &cfg.fetch.user_agent, cfg.fetch.timeout).context("building upload client")?;

    let summary = upload_files(&files, &uploader, &defaults).await;
    log.info(format!(
        "📊 Upload totals: uploaded={} already={} failed={}",
        summary.uploaded, summary.already_uploaded, summary.failed
    ));
    log.result(&summary)?;
    Ok(())
}

/// `*.md` files directly inside `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == "md"))
        .collect();
    files.sort();
    Ok(files)
}

/// Submit each file in turn. Unreadable files, transport errors and rejected
/// submissions are counted as failed and the loop moves on.
pub async fn upload_files(files: &[PathBuf], uploader: &dyn Uploader, defaults: &UploadDefaults) -> UploadSummary {
    let log = telemetry::upload();
    let mut summary = UploadSummary::default();
    for path in files {
        let file = display_name(path);
        let content = match std::fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                log.error_kv("💥 unreadable document", [("file", file.clone()), ("error", e.to_string())]);
                summary.failed += 1;
                summary.items.push(UploadItem { file, title: String::new(), outcome: "failed", status: None });
                continue;
            }
        };
        let form = {
            let _s = log.span(&UploadPhase::ReadMeta).entered();
            build_form(path, content, defaults)
        };
        let title = form.title.clone();

        let outcome = {
            let _s = log.span_kv(&UploadPhase::Submit, [("file", file.clone())]).entered();
            uploader.submit(form).await
        };
        let (label, status) = match outcome {
            Ok(UploadOutcome::Uploaded) => {
                log.info_kv("✅ uploaded", [("title", title.clone())]);
                summary.uploaded += 1;
                ("uploaded", Some(201))
            }
            Ok(UploadOutcome::AlreadyUploaded) => {
                log.warn_kv("⚠️ already uploaded", [("title", title.clone())]);
                summary.already_uploaded += 1;
                ("already_uploaded", Some(208))
            }
            Ok(UploadOutcome::Failed { status, body }) => {
                log.error_kv("❌ upload rejected", [("title", title.clone()), ("status", status.to_string()), ("body", body)]);
                summary.failed += 1;
                ("failed", Some(status))
            }
            Err(e) => {
                log.error_kv("💥 upload error", [("file", file.clone()), ("error", e.to_string())]);
                summary.failed += 1;
                ("failed", e.status())
            }
        };
        summary.items.push(UploadItem { file, title, outcome: label, status });
    }
    summary
}

fn build_form(path: &Path, content: Vec<u8>, defaults: &UploadDefaults) -> UploadForm {
    let meta = frontmatter::parse(&String::from_utf8_lossy(&content));
    let field = |key: &str| meta.get(key).filter(|v| !v.is_empty()).cloned();
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    UploadForm {
        contributor_id: defaults.contributor_id.clone(),
        title: field("title").unwrap_or(stem),
        author: field("author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        source: field("source").unwrap_or_else(|| LOCAL_SOURCE.to_string()),
        date: field("date").unwrap_or_else(|| defaults.now.clone()),
        category: field("category").unwrap_or_else(|| defaults.category.clone()),
        file_name: display_name(path),
        content,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::client::MockUploader;

    fn defaults() -> UploadDefaults {
        UploadDefaults { contributor_id: "46293".into(), category: "Religion".into(), now: "2025-04-05T12:00:00Z".into() }
    }

    #[test]
    fn missing_metadata_falls_back_to_defaults() {
        let form = build_form(Path::new("/tmp/0003-imana.md"), b"# Imana\n\nBody.\n".to_vec(), &defaults());
        assert_eq!(form.title, "0003-imana");
        assert_eq!(form.author, "Anonyme");
        assert_eq!(form.source, "local");
        assert_eq!(form.category, "Religion");
        assert_eq!(form.date, "2025-04-05T12:00:00Z");
        assert_eq!(form.file_name, "0003-imana.md");
        assert_eq!(form.contributor_id, "46293");
    }

    #[test]
    fn metadata_block_overrides_defaults() {
        let doc = b"---\ntitle: \"Imana\"\nauthor: \"Pasiteri\"\nsource: \"https://blog.example/imana/\"\ndate: \"May 3, 2019\"\ncategory: \"Iyobokamana\"\n---\n".to_vec();
        let form = build_form(Path::new("x.md"), doc, &defaults());
        assert_eq!(form.title, "Imana");
        assert_eq!(form.author, "Pasiteri");
        assert_eq!(form.source, "https://blog.example/imana/");
        assert_eq!(form.date, "May 3, 2019");
        assert_eq!(form.category, "Iyobokamana");
    }

    #[test]
    fn lists_only_markdown_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["0002-b.md", "0001-a.md", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.md")).unwrap();
        let names: Vec<String> = markdown_files(dir.path()).unwrap().iter().map(|p| display_name(p)).collect();
        assert_eq!(names, ["0001-a.md", "0002-b.md"]);
    }

    #[tokio::test]
    async fn outcomes_are_tallied_and_failures_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["0001-a.md", "0002-b.md", "0003-c.md", "0004-d.md"] {
            std::fs::write(dir.path().join(name), "---\ntitle: T\n---\n").unwrap();
        }
        let files = markdown_files(dir.path()).unwrap();
        let uploader = MockUploader::new();
        uploader.push_status(201);
        uploader.push_status(208);
        uploader.push_status(500);
        // fourth submission has no queued status and errors out

        let summary = upload_files(&files, &uploader, &defaults()).await;

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.already_uploaded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(uploader.calls().len(), 4);
        let outcomes: Vec<&str> = summary.items.iter().map(|i| i.outcome).collect();
        assert_eq!(outcomes, ["uploaded", "already_uploaded", "failed", "failed"]);
        assert_eq!(summary.items[2].status, Some(500));
    }
}
