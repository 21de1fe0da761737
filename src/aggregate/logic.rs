use crate::model::{ArticleRecord, CategoryBucket, CategoryBuckets};

/// Regroups records by category. Starts from an empty mapping on every call,
/// so sequence keys are always `Article1..ArticleN` per bucket in record order.
pub fn aggregate(records: &[ArticleRecord]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::new();
    for record in records {
        for category in &record.categories {
            buckets
                .entry(category.name.clone())
                .or_insert_with(|| CategoryBucket::new(category.name.clone(), category.category_url.clone()))
                .push(record.summary());
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, sequence_key};

    fn cat(name: &str) -> Category {
        Category { name: name.into(), category_url: format!("https://blog.example/category/{}/", name.to_lowercase()) }
    }

    fn record(title: &str, cats: &[&str]) -> ArticleRecord {
        ArticleRecord {
            title: title.into(),
            published_date: "May 3, 2019".into(),
            paragraphs: vec![format!("{} body", title)],
            categories: cats.iter().map(|c| cat(c)).collect(),
            source_url: Some(format!("https://blog.example/{}/", title.to_lowercase())),
            page_number: 1,
        }
    }

    #[test]
    fn keys_are_dense_and_one_based_per_bucket() {
        let records = vec![
            record("A", &["News"]),
            record("B", &["Sport"]),
            record("C", &["News"]),
            record("D", &["News"]),
        ];
        let buckets = aggregate(&records);
        let news: Vec<&str> = buckets["News"].articles.keys().map(String::as_str).collect();
        assert_eq!(news, ["Article1", "Article2", "Article3"]);
        let sport: Vec<&str> = buckets["Sport"].articles.keys().map(String::as_str).collect();
        assert_eq!(sport, ["Article1"]);
        assert_eq!(buckets["News"].articles[&sequence_key(2)].title, "C");
    }

    #[test]
    fn multi_category_record_is_assigned_independently() {
        let records = vec![record("A", &["Sport"]), record("B", &["News", "Sport"])];
        let buckets = aggregate(&records);
        assert_eq!(buckets["News"].articles[&sequence_key(1)].title, "B");
        assert_eq!(buckets["Sport"].articles[&sequence_key(2)].title, "B");
    }

    #[test]
    fn category_less_records_are_absent() {
        let buckets = aggregate(&[record("A", &[])]);
        assert!(buckets.is_empty());
    }

    #[test]
    fn bucket_order_and_url_follow_first_sighting() {
        let mut first = record("A", &["Politiki"]);
        first.categories[0].category_url = "https://blog.example/category/politiki/".into();
        let mut second = record("B", &["Politiki", "Amakuru"]);
        second.categories[0].category_url = "https://other.example/politiki/".into();
        let buckets = aggregate(&[first, second]);
        let names: Vec<&str> = buckets.keys().map(String::as_str).collect();
        assert_eq!(names, ["Politiki", "Amakuru"]);
        assert_eq!(buckets["Politiki"].category_url, "https://blog.example/category/politiki/");
    }

    #[test]
    fn rerun_over_same_records_is_identical() {
        let records = vec![record("A", &["News"]), record("B", &["News"])];
        assert_eq!(aggregate(&records), aggregate(&records));
    }
}
