use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_PAGE_DELAY_MS: u64 = 2000;
const DEFAULT_ITEM_DELAY_MS: u64 = 1000;
/// Floor for both crawl delays; smaller values are raised to it.
pub const MIN_DELAY_MS: u64 = 250;
pub const MIN_DELAY: Duration = Duration::from_millis(MIN_DELAY_MS);
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_MS: u64 = 2000;
const DEFAULT_CHECKPOINT: &str = "Articles.json";
const DEFAULT_BUCKETS: &str = "Categories.json";
const DEFAULT_CATEGORY: &str = "Religion";
const DEFAULT_BOILERPLATE_PREFIXES: &[&str] = &["Share this:", "Like this:", "Like Loading"];

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

#[derive(Clone, Debug)]
pub struct HarvestConfig {
    pub fetch: FetchConfig,
    pub page_delay: Duration,
    pub item_delay: Duration,
    pub checkpoint: PathBuf,
    pub buckets: PathBuf,
    pub boilerplate_prefixes: Vec<String>,
    pub upload_url: Option<String>,
    pub contributor_id: Option<String>,
    pub default_category: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            item_delay: Duration::from_millis(DEFAULT_ITEM_DELAY_MS),
            checkpoint: PathBuf::from(DEFAULT_CHECKPOINT),
            buckets: PathBuf::from(DEFAULT_BUCKETS),
            boilerplate_prefixes: DEFAULT_BOILERPLATE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            upload_url: None,
            contributor_id: None,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl HarvestConfig {
    /// Defaults overlaid with `HARVEST_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(ua) = get("HARVEST_USER_AGENT").filter(|s| !s.trim().is_empty()) {
            cfg.fetch.user_agent = ua;
        }
        if let Some(ms) = get("HARVEST_PAGE_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
            cfg.page_delay = polite_delay(ms);
        }
        if let Some(ms) = get("HARVEST_ITEM_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
            cfg.item_delay = polite_delay(ms);
        }
        if let Some(secs) = get("HARVEST_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            cfg.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = get("HARVEST_MAX_RETRIES").and_then(|v| v.parse::<u32>().ok()) {
            cfg.fetch.max_retries = n;
        }
        if let Some(path) = get("HARVEST_CHECKPOINT") {
            cfg.checkpoint = PathBuf::from(path);
        }
        if let Some(path) = get("HARVEST_BUCKETS") {
            cfg.buckets = PathBuf::from(path);
        }
        if let Some(list) = get("HARVEST_BOILERPLATE_PREFIXES") {
            cfg.boilerplate_prefixes = list
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        cfg.upload_url = get("HARVEST_UPLOAD_URL").filter(|s| !s.trim().is_empty());
        cfg.contributor_id = get("HARVEST_CONTRIBUTOR_ID").filter(|s| !s.trim().is_empty());
        if let Some(cat) = get("HARVEST_DEFAULT_CATEGORY").filter(|s| !s.trim().is_empty()) {
            cfg.default_category = cat;
        }
        cfg
    }
}

pub fn polite_delay(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_DELAY_MS))
}
