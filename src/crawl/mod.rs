pub mod extractor;
pub mod fetch;
pub mod walker;
mod types;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;

use crate::checkpoint::{BucketStore, DedupSet, RecordStore};
use crate::config::{HarvestConfig, MIN_DELAY_MS, polite_delay};
use crate::model::Cursor;
use crate::telemetry::{self};
use crate::telemetry::ops::crawl::Phase as CrawlPhase;

use self::extractor::{BoilerplateFilter, Extractor, Profile, default_profiles};
use self::fetch::HttpFetcher;
use self::walker::{Ledger, WalkState, Walker};

#[derive(Args)]
pub struct CrawlCmd {
    /// First listing page to fetch
    #[arg(long, env = "HARVEST_START_URL")] pub start_url: String,
    /// Page number of --start-url, used to resume an aborted walk
    #[arg(long, default_value_t = 1)] pub start_page: u32,
    /// Records checkpoint (defaults to HARVEST_CHECKPOINT or Articles.json)
    #[arg(long)] pub checkpoint: Option<PathBuf>,
    /// Also keep a category buckets file up to date after every record
    #[arg(long, default_value_t = false)] pub write_buckets: bool,
    /// Buckets file path (implies --write-buckets)
    #[arg(long)] pub buckets: Option<PathBuf>,
    /// Treat titles in the buckets file as already harvested (they only cover
    /// articles without a URL unless --match-titles is given)
    #[arg(long, default_value_t = false)] pub seed_from_buckets: bool,
    /// Let saved titles also cover articles that have a URL, for checkpoints
    /// written before URLs were recorded
    #[arg(long, default_value_t = false)] pub match_titles: bool,
    /// Extraction profiles in fallback order (legacy, production)
    #[arg(long = "profile")] pub profiles: Vec<String>,
    #[arg(long)] pub max_pages: Option<u32>,
    /// Pause between listing pages (at least 250 ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(MIN_DELAY_MS..))] pub page_delay_ms: Option<u64>,
    /// Pause before each detail or read-more fetch (at least 250 ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(MIN_DELAY_MS..))] pub item_delay_ms: Option<u64>,
    #[arg(long, default_value_t = false)] pub apply: bool,
}

pub async fn run(args: CrawlCmd) -> Result<()> {
    let cfg = HarvestConfig::from_env();
    let log = telemetry::crawl();
    let _g = log.root_span_kv([
        ("start_url", args.start_url.clone()),
        ("start_page", args.start_page.to_string()),
        ("apply", args.apply.to_string()),
        ("max_pages", format!("{:?}", args.max_pages)),
        ("profiles", format!("{:?}", args.profiles)),
    ]).entered();

    let profiles = resolve_profiles(&args.profiles)?;
    let page_delay = args.page_delay_ms.map(polite_delay).unwrap_or(cfg.page_delay);
    let item_delay = args.item_delay_ms.map(polite_delay).unwrap_or(cfg.item_delay);
    let store = RecordStore::new(args.checkpoint.clone().unwrap_or_else(|| cfg.checkpoint.clone()));
    let buckets_path = args.buckets.clone().or_else(|| args.write_buckets.then(|| cfg.buckets.clone()));
    let bucket_store = buckets_path.as_ref().map(|p| BucketStore::new(p.clone()));

    let (records, seen) = {
        let _s = log.span(&CrawlPhase::LoadCheckpoint).entered();
        store
            .load_with_keys()
            .with_context(|| format!("loading checkpoint {}", store.path().display()))?
    };
    let mut seen = seen.matching_titles(args.match_titles);
    if args.seed_from_buckets {
        let seed_store = bucket_store.clone().unwrap_or_else(|| BucketStore::new(cfg.buckets.clone()));
        let seeded = seed_store
            .load()
            .with_context(|| format!("loading buckets {}", seed_store.path().display()))?;
        seen.merge(DedupSet::from_buckets(&seeded));
    }

    if !args.apply {
        let _sp = log.span(&CrawlPhase::Plan).entered();
        log.info(format!(
            "📝 Crawl plan: start={} page={} checkpoint={} existing={} profiles={:?} max_pages={:?}",
            args.start_url,
            args.start_page,
            store.path().display(),
            records.len(),
            profiles.iter().map(|p| p.name).collect::<Vec<_>>(),
            args.max_pages,
        ));
        log.info("   Use --apply to execute.");
        let plan = types::CrawlPlan {
            start_url: args.start_url.clone(),
            start_page: args.start_page,
            checkpoint: store.path().display().to_string(),
            checkpoint_exists: store.exists(),
            existing_records: records.len(),
            known_keys: seen.len(),
            match_titles: args.match_titles,
            profiles: profiles.iter().map(|p| p.name).collect(),
            max_pages: args.max_pages,
            page_delay_ms: page_delay.as_millis(),
            item_delay_ms: item_delay.as_millis(),
            buckets: buckets_path.as_ref().map(|p| p.display().to_string()),
        };
        log.plan(&plan)?;
        return Ok(());
    }

    let fetcher = HttpFetcher::new(cfg.fetch.clone()).context("building http client")?;
    let extractor = Extractor::new(profiles, BoilerplateFilter::new(cfg.boilerplate_prefixes.clone()));
    let report = Walker::new(&fetcher, &extractor, &store, page_delay, item_delay)
        .with_buckets(bucket_store.as_ref())
        .with_max_pages(args.max_pages)
        .walk(Cursor::start(args.start_url.clone(), args.start_page), Ledger::new(records, seen))
        .await
        .context("persisting crawl progress")?;

    let resume = report.cursor.current_url.clone().map(|url| types::ResumePoint { url, page: report.cursor.page_number });
    if let Some(r) = &resume {
        log.info(format!("↪️  Resume with: --start-url {} --start-page {}", r.url, r.page));
    }
    let result = types::CrawlApply {
        state: report.state.as_str(),
        totals: types::CrawlTotals {
            pages: report.stats.pages,
            new: report.stats.new,
            skipped: report.stats.skipped,
            failed: report.stats.failed,
        },
        records: report.ledger.records.len(),
        resume,
        error: report.abort.as_ref().map(|e| e.to_string()),
    };
    log.result(&result)?;

    if report.state == WalkState::Aborted {
        let cause = report.abort.map(anyhow::Error::from).unwrap_or_else(|| anyhow!("walk aborted"));
        return Err(cause.context(format!("crawl aborted on page {}", report.cursor.page_number)));
    }
    Ok(())
}

fn resolve_profiles(names: &[String]) -> Result<Vec<Profile>> {
    if names.is_empty() {
        return Ok(default_profiles());
    }
    names
        .iter()
        .map(|n| Profile::by_name(n).ok_or_else(|| anyhow!("unknown profile '{}' (expected legacy or production)", n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct CrawlCli {
        #[command(flatten)]
        crawl: CrawlCmd,
    }

    fn parse(extra: &[&str]) -> Result<CrawlCmd, clap::Error> {
        let mut argv = vec!["harvest", "--start-url", "https://blog.example/"];
        argv.extend_from_slice(extra);
        CrawlCli::try_parse_from(argv).map(|c| c.crawl)
    }

    #[test]
    fn delay_flags_below_the_floor_are_rejected() {
        assert!(parse(&["--page-delay-ms", "0"]).is_err());
        assert!(parse(&["--item-delay-ms", "100"]).is_err());
        let cmd = parse(&["--page-delay-ms", "250", "--item-delay-ms", "1500"]).unwrap();
        assert_eq!(cmd.page_delay_ms, Some(250));
        assert_eq!(cmd.item_delay_ms, Some(1500));
    }

    #[test]
    fn title_matching_is_off_unless_asked() {
        assert!(!parse(&[]).unwrap().match_titles);
        assert!(!parse(&["--seed-from-buckets"]).unwrap().match_titles);
        assert!(parse(&["--match-titles"]).unwrap().match_titles);
    }

    #[test]
    fn empty_profile_list_uses_default_order() {
        let names: Vec<&str> = resolve_profiles(&[]).unwrap().iter().map(|p| p.name).collect();
        assert_eq!(names, ["legacy", "production"]);
    }

    #[test]
    fn explicit_profiles_keep_given_order() {
        let names: Vec<&str> = resolve_profiles(&["production".into(), "legacy".into()]).unwrap().iter().map(|p| p.name).collect();
        assert_eq!(names, ["production", "legacy"]);
    }

    #[test]
    fn unknown_profile_is_rejected() {
        assert!(resolve_profiles(&["wordpress".into()]).is_err());
    }
}
