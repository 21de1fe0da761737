use std::collections::HashSet;
use std::time::Duration;

use crate::aggregate::logic::aggregate;
use crate::checkpoint::{BucketStore, DedupSet, RecordStore};
use crate::config::MIN_DELAY;
use crate::error::{FetchError, PersistenceError};
use crate::model::{ArticleRecord, Cursor, NO_DATE, NO_TITLE};
use crate::telemetry::{self};
use crate::telemetry::ops::crawl::Phase as CrawlPhase;
use crate::util::url::normalize;

use super::extractor::{Extractor, ListingItem};
use super::fetch::Fetcher;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkState {
    Running,
    Completed,
    Aborted,
}

impl WalkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkState::Running => "running",
            WalkState::Completed => "completed",
            WalkState::Aborted => "aborted",
        }
    }
}

/// Everything persisted so far plus the keys derived from it. Handed to the
/// walker and handed back in the report.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub records: Vec<ArticleRecord>,
    pub seen: DedupSet,
}

impl Ledger {
    pub fn new(records: Vec<ArticleRecord>, seen: DedupSet) -> Self {
        Self { records, seen }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub pages: u32,
    pub new: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct WalkReport {
    pub state: WalkState,
    /// On abort: the listing page that failed. After a `max_pages` stop: the
    /// next page to visit. Otherwise `current_url` is None.
    pub cursor: Cursor,
    pub stats: WalkStats,
    pub ledger: Ledger,
    pub abort: Option<FetchError>,
}

pub struct Walker<'a> {
    fetcher: &'a dyn Fetcher,
    extractor: &'a Extractor,
    store: &'a RecordStore,
    buckets: Option<&'a BucketStore>,
    page_delay: Duration,
    item_delay: Duration,
    max_pages: Option<u32>,
}

enum ItemOutcome {
    New(ArticleRecord),
    Skipped,
    Failed,
}

impl<'a> Walker<'a> {
    /// `page_delay` is slept before every listing page after the first and
    /// `item_delay` before every detail or read-more fetch. Both are raised to
    /// at least [`MIN_DELAY`].
    pub fn new(
        fetcher: &'a dyn Fetcher,
        extractor: &'a Extractor,
        store: &'a RecordStore,
        page_delay: Duration,
        item_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            buckets: None,
            page_delay: page_delay.max(MIN_DELAY),
            item_delay: item_delay.max(MIN_DELAY),
            max_pages: None,
        }
    }

    /// Also rewrite the category buckets file after every new record.
    pub fn with_buckets(mut self, buckets: Option<&'a BucketStore>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Walk listing pages from `start` until there is no next page, a page has
    /// no items, pagination loops back, or `max_pages` is reached. A listing
    /// fetch failure stops the walk as `Aborted`; only a checkpoint write
    /// failure is returned as an error.
    pub async fn walk(&self, start: Cursor, mut ledger: Ledger) -> Result<WalkReport, PersistenceError> {
        let log = telemetry::crawl();
        let mut cursor = start;
        let mut state = WalkState::Running;
        let mut stats = WalkStats::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut abort = None;

        while state == WalkState::Running {
            let Some(url) = cursor.current_url.clone() else {
                state = WalkState::Completed;
                break;
            };
            if let Some(max) = self.max_pages {
                if stats.pages >= max {
                    log.info_kv("⏸️ page limit reached", [("max_pages", max.to_string()), ("next", url.clone())]);
                    state = WalkState::Completed;
                    break;
                }
            }
            if stats.pages > 0 {
                tokio::time::sleep(self.page_delay).await;
            }
            visited.insert(normalize(&url));

            let _page_span = log
                .span_kv(&CrawlPhase::Page, [("page", cursor.page_number.to_string()), ("url", url.clone())])
                .entered();

            let fetched = {
                let _s = log.span(&CrawlPhase::FetchPage).entered();
                self.fetcher.fetch(&url).await
            };
            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    log.error_kv("❌ listing fetch failed", [
                        ("url", url.clone()),
                        ("page", cursor.page_number.to_string()),
                        ("error", e.to_string()),
                    ]);
                    abort = Some(e);
                    state = WalkState::Aborted;
                    break;
                }
            };
            stats.pages += 1;
            let html = page.text();

            let listing = {
                let _s = log.span(&CrawlPhase::Extract).entered();
                self.extractor.extract_listing(&html, &page.url)
            };
            if listing.items.is_empty() {
                log.info_kv("ℹ️  no items on page, stopping", [("url", url.clone())]);
                cursor.current_url = None;
                state = WalkState::Completed;
                break;
            }
            log.debug_kv("listing", [
                ("status", page.status.to_string()),
                ("profile", listing.profile.unwrap_or("-").to_string()),
                ("items", listing.items.len().to_string()),
            ]);

            let (mut new, mut skipped, mut failed) = (0usize, 0usize, 0usize);
            for item in &listing.items {
                match self.process_item(item, listing.fetch_detail, cursor.page_number, &ledger.seen).await {
                    ItemOutcome::New(record) => {
                        let _s = log.span(&CrawlPhase::Persist).entered();
                        self.persist(&mut ledger, record)?;
                        new += 1;
                    }
                    ItemOutcome::Skipped => skipped += 1,
                    ItemOutcome::Failed => failed += 1,
                }
            }
            stats.new += new;
            stats.skipped += skipped;
            stats.failed += failed;
            log.page_summary(cursor.page_number, &url, new, skipped, failed);

            let next = {
                let _s = log.span(&CrawlPhase::DiscoverNext).entered();
                self.extractor.next_page(&html, &page.url)
            };
            match next {
                Some(next) if visited.contains(&normalize(&next)) => {
                    log.warn_kv("🔁 next page already visited, stopping", [("next", next)]);
                    cursor.current_url = None;
                    state = WalkState::Completed;
                }
                Some(next) => {
                    cursor = Cursor { current_url: Some(next), page_number: cursor.page_number + 1 };
                }
                None => {
                    cursor.current_url = None;
                    state = WalkState::Completed;
                }
            }
        }

        log.totals(stats.pages, stats.new, stats.skipped, stats.failed);
        Ok(WalkReport { state, cursor, stats, ledger, abort })
    }

    async fn process_item(&self, item: &ListingItem, fetch_detail: bool, page_number: u32, seen: &DedupSet) -> ItemOutcome {
        let log = telemetry::crawl();
        if !item.has_title() && item.link.is_none() {
            log.warn("⚠️ item without title or link, skipping");
            return ItemOutcome::Failed;
        }
        if seen.contains(item.link.as_deref(), &item.title) {
            log.debug_kv("↩️ skip", [("title", item.title.clone())]);
            return ItemOutcome::Skipped;
        }
        if !item.gaps.is_empty() {
            let gaps: Vec<&str> = item.gaps.iter().map(|g| g.name()).collect();
            log.debug_kv("extraction gaps", [("title", item.title.clone()), ("gaps", gaps.join(","))]);
        }

        match self.build_record(item, fetch_detail, page_number).await {
            Ok(record) => {
                log.info_kv("➕ new", [("title", record.title.clone()), ("url", record.source_url.clone().unwrap_or_default())]);
                ItemOutcome::New(record)
            }
            Err(e) => {
                log.warn_kv("⚠️ item failed", [("title", item.title.clone()), ("error", e.to_string())]);
                ItemOutcome::Failed
            }
        }
    }

    async fn build_record(&self, item: &ListingItem, fetch_detail: bool, page_number: u32) -> Result<ArticleRecord, FetchError> {
        let log = telemetry::crawl();
        let mut record = ArticleRecord {
            title: item.title.clone(),
            published_date: item.published_date.clone(),
            paragraphs: item.paragraphs.clone(),
            categories: item.categories.clone(),
            source_url: item.link.clone(),
            page_number,
        };

        if fetch_detail {
            if let Some(link) = item.link.as_deref() {
                tokio::time::sleep(self.item_delay).await;
                let page = {
                    let _s = log.span_kv(&CrawlPhase::FetchItem, [("url", link.to_string())]).entered();
                    self.fetcher.fetch(link).await?
                };
                match self.extractor.extract_article(&page.text(), &page.url) {
                    Some(article) => {
                        log.debug_kv("detail", [("url", link.to_string()), ("profile", article.profile.to_string())]);
                        merge_detail(&mut record, article);
                    }
                    None => log.debug_kv("detail page had no article, keeping listing fields", [("url", link.to_string())]),
                }
                return Ok(record);
            }
        }

        if record.paragraphs.is_empty() {
            if let Some(more) = item.read_more.as_deref() {
                tokio::time::sleep(self.item_delay).await;
                let page = {
                    let _s = log.span_kv(&CrawlPhase::ReadMore, [("url", more.to_string())]).entered();
                    self.fetcher.fetch(more).await?
                };
                record.paragraphs = self.extractor.full_paragraphs(&page.text());
            }
        }
        Ok(record)
    }

    fn persist(&self, ledger: &mut Ledger, record: ArticleRecord) -> Result<(), PersistenceError> {
        ledger.seen.insert(record.dedup_key());
        ledger.records.push(record);
        self.store.save(&ledger.records)?;
        if let Some(buckets) = self.buckets {
            buckets.save(&aggregate(&ledger.records))?;
        }
        Ok(())
    }
}

// Detail fields win; listing values fill whatever the detail page lacked.
fn merge_detail(record: &mut ArticleRecord, article: super::extractor::ExtractedArticle) {
    if article.title != NO_TITLE {
        record.title = article.title;
    }
    if article.published_date != NO_DATE {
        record.published_date = article.published_date;
    }
    if !article.paragraphs.is_empty() {
        record.paragraphs = article.paragraphs;
    }
    if !article.categories.is_empty() {
        record.categories = article.categories;
    }
}
