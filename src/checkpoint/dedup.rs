use std::collections::HashSet;

use crate::model::{ArticleRecord, CategoryBuckets, DedupKey};

/// Keys of everything already persisted, scoped to one run.
///
/// Title keys only stand in for records saved without a URL, so by default
/// they are matched against URL-less candidates alone. `match_titles` widens
/// that to every candidate, for checkpoints (or bucket files) written before
/// URLs were captured.
#[derive(Debug, Clone, Default)]
pub struct DedupSet {
    keys: HashSet<DedupKey>,
    match_titles: bool,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[ArticleRecord]) -> Self {
        let mut set = Self::new();
        for r in records {
            set.insert(r.dedup_key());
        }
        set
    }

    /// Bucket summaries carry no URL, so they only contribute title keys.
    pub fn from_buckets(buckets: &CategoryBuckets) -> Self {
        let mut set = Self::new();
        for bucket in buckets.values() {
            for article in bucket.articles.values() {
                set.insert(DedupKey::Title(article.title.clone()));
            }
        }
        set
    }

    pub fn matching_titles(mut self, on: bool) -> Self {
        self.match_titles = on;
        self
    }

    pub fn merge(&mut self, other: DedupSet) {
        self.keys.extend(other.keys);
    }

    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    /// A candidate with a URL is seen if that URL is known; one without is
    /// seen if its title is. With `match_titles` on, a known title also
    /// covers candidates that do have a URL.
    pub fn contains(&self, source_url: Option<&str>, title: &str) -> bool {
        match DedupKey::for_item(source_url, title) {
            DedupKey::Url(url) => {
                self.keys.contains(&DedupKey::Url(url))
                    || (self.match_titles && self.keys.contains(&DedupKey::Title(title.to_string())))
            }
            key @ DedupKey::Title(_) => self.keys.contains(&key),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArticleSummary, CategoryBucket};

    fn rec(title: &str, url: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            title: title.into(),
            published_date: "No date".into(),
            paragraphs: vec![],
            categories: vec![],
            source_url: url.map(str::to_string),
            page_number: 1,
        }
    }

    #[test]
    fn url_keyed_records_match_by_url_only() {
        let set = DedupSet::from_records(&[rec("Same title", Some("https://blog.example/a"))]);
        assert!(set.contains(Some("https://blog.example/a"), "Different title"));
        assert!(!set.contains(Some("https://blog.example/b"), "Same title"));
        assert!(!set.contains(None, "Same title"));
    }

    #[test]
    fn title_keyed_records_only_match_candidates_without_url() {
        let set = DedupSet::from_records(&[rec("Amakuru", None)]);
        assert!(set.contains(None, "Amakuru"));
        assert!(!set.contains(Some("https://blog.example/2024/new-amakuru/"), "Amakuru"));
        assert!(!set.contains(None, "Other post"));
    }

    #[test]
    fn matching_titles_lets_title_keys_cover_linked_candidates() {
        let set = DedupSet::from_records(&[rec("Legacy post", None), rec("Linked", Some("https://blog.example/linked"))])
            .matching_titles(true);
        assert!(set.contains(Some("https://blog.example/legacy"), "Legacy post"));
        assert!(set.contains(None, "Legacy post"));
        // url keys never turn into title matches
        assert!(!set.contains(Some("https://blog.example/other"), "Linked"));
    }

    #[test]
    fn buckets_seed_title_keys() {
        let mut buckets = CategoryBuckets::new();
        let mut bucket = CategoryBucket::new("News", "https://blog.example/category/news/");
        bucket.push(ArticleSummary { title: "Old".into(), published_date: "x".into(), paragraphs: vec![] });
        buckets.insert("News".into(), bucket);

        let set = DedupSet::from_buckets(&buckets);
        assert_eq!(set.len(), 1);
        assert!(set.contains(None, "Old"));
        assert!(!set.contains(Some("https://blog.example/old"), "Old"));
        assert!(set.matching_titles(true).contains(Some("https://blog.example/old"), "Old"));
    }
}
