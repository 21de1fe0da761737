use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::aggregate::logic::aggregate;
use crate::checkpoint::RecordStore;
use crate::config::HarvestConfig;
use crate::model::ArticleRecord;
use crate::telemetry::{self};
use crate::telemetry::ops::stats::Phase as StatsPhase;
use crate::stats::types::*;

pub async fn summary(checkpoint: Option<PathBuf>, category_limit: usize) -> Result<()> {
    let cfg = HarvestConfig::from_env();
    let log = telemetry::stats();
    let store = RecordStore::new(checkpoint.unwrap_or(cfg.checkpoint));

    let records = {
        let _s = log.span(&StatsPhase::LoadRecords).entered();
        store.load().with_context(|| format!("loading checkpoint {}", store.path().display()))?
    };
    let _s = log.span(&StatsPhase::Summary).entered();
    let stats = summarize(&store.path().display().to_string(), &records);

    log.info(format!("📦 Checkpoint: {}", stats.checkpoint));
    log.info(format!(
        "📄 Records: total={} without_url={} without_title={} without_paragraphs={}",
        stats.records, stats.without_url, stats.without_title, stats.without_paragraphs
    ));
    log.info(format!("📑 Pages: distinct={} last={:?}", stats.distinct_pages, stats.last_page));
    log.info(format!("🏷️  Categories: {} (uncategorized records: {})", stats.categories.len(), stats.uncategorized));
    for c in stats.categories.iter().take(category_limit) {
        log.info(format!("  {:30} {}", c.name, c.articles));
    }
    if stats.categories.len() > category_limit {
        log.info(format!("  ... ({} more)", stats.categories.len() - category_limit));
    }

    log.result(&stats)?;
    Ok(())
}

pub fn summarize(checkpoint: &str, records: &[ArticleRecord]) -> StatsSummary {
    let pages: BTreeSet<u32> = records.iter().map(|r| r.page_number).collect();
    StatsSummary {
        checkpoint: checkpoint.to_string(),
        records: records.len(),
        without_url: records.iter().filter(|r| r.source_url.is_none()).count(),
        without_title: records.iter().filter(|r| !r.has_title()).count(),
        without_paragraphs: records.iter().filter(|r| r.paragraphs.is_empty()).count(),
        uncategorized: records.iter().filter(|r| r.categories.is_empty()).count(),
        distinct_pages: pages.len(),
        last_page: pages.last().copied(),
        categories: aggregate(records)
            .into_values()
            .map(|b| StatsCategory { name: b.name, articles: b.articles.len() })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, NO_TITLE};

    fn rec(title: &str, url: Option<&str>, page: u32, cats: &[&str], paragraphs: usize) -> ArticleRecord {
        ArticleRecord {
            title: title.into(),
            published_date: "May 3, 2019".into(),
            paragraphs: (0..paragraphs).map(|i| format!("p{}", i)).collect(),
            categories: cats.iter().map(|c| Category { name: c.to_string(), category_url: String::new() }).collect(),
            source_url: url.map(str::to_string),
            page_number: page,
        }
    }

    #[test]
    fn counts_gaps_pages_and_categories() {
        let records = vec![
            rec("A", Some("https://blog.example/a/"), 1, &["News"], 2),
            rec(NO_TITLE, None, 1, &[], 0),
            rec("C", Some("https://blog.example/c/"), 3, &["News", "Sport"], 1),
        ];
        let s = summarize("Articles.json", &records);
        assert_eq!(s.records, 3);
        assert_eq!(s.without_url, 1);
        assert_eq!(s.without_title, 1);
        assert_eq!(s.without_paragraphs, 1);
        assert_eq!(s.uncategorized, 1);
        assert_eq!(s.distinct_pages, 2);
        assert_eq!(s.last_page, Some(3));
        assert_eq!(s.categories, vec![
            StatsCategory { name: "News".into(), articles: 2 },
            StatsCategory { name: "Sport".into(), articles: 1 },
        ]);
    }

    #[test]
    fn empty_checkpoint_summarizes_to_zeroes() {
        let s = summarize("Articles.json", &[]);
        assert_eq!(s.records, 0);
        assert_eq!(s.last_page, None);
        assert!(s.categories.is_empty());
    }
}
