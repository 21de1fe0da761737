use serde::Serialize;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct StatsCategory { pub name: String, pub articles: usize }

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct StatsSummary {
    pub checkpoint: String,
    pub records: usize,
    pub without_url: usize,
    pub without_title: usize,
    pub without_paragraphs: usize,
    pub uncategorized: usize,
    pub distinct_pages: usize,
    pub last_page: Option<u32>,
    pub categories: Vec<StatsCategory>,
}
