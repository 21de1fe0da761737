use serde::Serialize;

// Plan envelope types
#[derive(Serialize)]
pub struct CrawlPlan {
    pub start_url: String,
    pub start_page: u32,
    pub checkpoint: String,
    pub checkpoint_exists: bool,
    pub existing_records: usize,
    pub known_keys: usize,
    pub match_titles: bool,
    pub profiles: Vec<&'static str>,
    pub max_pages: Option<u32>,
    pub page_delay_ms: u128,
    pub item_delay_ms: u128,
    pub buckets: Option<String>,
}

// Apply/result envelope types
#[derive(Serialize)]
pub struct CrawlTotals { pub pages: u32, pub new: usize, pub skipped: usize, pub failed: usize }

#[derive(Serialize)]
pub struct ResumePoint { pub url: String, pub page: u32 }

#[derive(Serialize)]
pub struct CrawlApply {
    pub state: &'static str,
    pub totals: CrawlTotals,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
