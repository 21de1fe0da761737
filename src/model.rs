use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No title";
pub const NO_DATE: &str = "No date";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub category_url: String,
}

/// One harvested article, as persisted in the records checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub published_date: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub source_url: Option<String>,
    pub page_number: u32,
}

impl ArticleRecord {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::for_item(self.source_url.as_deref(), &self.title)
    }

    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE
    }

    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            title: self.title.clone(),
            published_date: self.published_date.clone(),
            paragraphs: self.paragraphs.clone(),
        }
    }
}

/// The subset of a record stored inside a category bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: String,
    pub published_date: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub name: String,
    pub category_url: String,
    #[serde(default)]
    pub articles: IndexMap<String, ArticleSummary>,
}

impl CategoryBucket {
    pub fn new(name: impl Into<String>, category_url: impl Into<String>) -> Self {
        Self { name: name.into(), category_url: category_url.into(), articles: IndexMap::new() }
    }

    /// Appends under the next dense sequence key and returns that key.
    pub fn push(&mut self, article: ArticleSummary) -> String {
        let key = sequence_key(self.articles.len() + 1);
        self.articles.insert(key.clone(), article);
        key
    }
}

/// Category name -> bucket, in first-seen order.
pub type CategoryBuckets = IndexMap<String, CategoryBucket>;

pub fn sequence_key(n: usize) -> String {
    format!("Article{}", n)
}

/// `sourceUrl` when the extraction saw one, otherwise the title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Url(String),
    Title(String),
}

impl DedupKey {
    pub fn for_item(source_url: Option<&str>, title: &str) -> Self {
        match source_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => DedupKey::Url(url.to_string()),
            None => DedupKey::Title(title.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub current_url: Option<String>,
    pub page_number: u32,
}

impl Cursor {
    pub fn start(url: impl Into<String>, page_number: u32) -> Self {
        Self { current_url: Some(url.into()), page_number }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            title: "Amakuru".into(),
            published_date: "May 3, 2019".into(),
            paragraphs: vec!["Para one".into()],
            categories: vec![Category { name: "Politics".into(), category_url: "https://blog.example/category/politics/".into() }],
            source_url: url.map(str::to_string),
            page_number: 2,
        }
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(record(Some("https://blog.example/a"))).unwrap();
        assert_eq!(value["publishedDate"], "May 3, 2019");
        assert_eq!(value["sourceUrl"], "https://blog.example/a");
        assert_eq!(value["pageNumber"], 2);
        assert_eq!(value["categories"][0]["categoryUrl"], "https://blog.example/category/politics/");
    }

    #[test]
    fn dedup_key_prefers_url_and_falls_back_to_title() {
        assert_eq!(record(Some("https://blog.example/a")).dedup_key(), DedupKey::Url("https://blog.example/a".into()));
        assert_eq!(record(None).dedup_key(), DedupKey::Title("Amakuru".into()));
        assert_eq!(record(Some("  ")).dedup_key(), DedupKey::Title("Amakuru".into()));
    }

    #[test]
    fn bucket_push_assigns_dense_keys() {
        let mut bucket = CategoryBucket::new("Politics", "https://blog.example/category/politics/");
        assert_eq!(bucket.push(record(None).summary()), "Article1");
        assert_eq!(bucket.push(record(None).summary()), "Article2");
        let keys: Vec<&String> = bucket.articles.keys().collect();
        assert_eq!(keys, ["Article1", "Article2"]);
    }
}
