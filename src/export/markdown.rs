use crate::model::ArticleRecord;
use crate::util::text::slugify;

const SLUG_MAX: usize = 60;
pub const LOCAL_SOURCE: &str = "local";

/// Values that go into the leading `---` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocHeader {
    pub title: String,
    pub author: String,
    pub source: String,
    pub date: String,
    pub category: String,
}

impl DocHeader {
    pub fn for_record(record: &ArticleRecord, author: &str, default_category: &str) -> Self {
        DocHeader {
            title: record.title.clone(),
            author: author.to_string(),
            source: record.source_url.clone().unwrap_or_else(|| LOCAL_SOURCE.to_string()),
            date: record.published_date.clone(),
            category: record
                .categories
                .first()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| default_category.to_string()),
        }
    }
}

/// `0001-some-title.md`, numbered by position in the checkpoint (1-based).
pub fn file_name(index: usize, record: &ArticleRecord) -> String {
    format!("{:04}-{}.md", index, slugify(&record.title, SLUG_MAX))
}

pub fn render(record: &ArticleRecord, author: &str, default_category: &str) -> String {
    let header = DocHeader::for_record(record, author, default_category);
    let categories = if record.categories.is_empty() {
        header.category.clone()
    } else {
        record.categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
    };

    let mut out = String::new();
    out.push_str("---\n");
    for (key, value) in [
        ("title", &header.title),
        ("author", &header.author),
        ("source", &header.source),
        ("date", &header.date),
        ("category", &header.category),
    ] {
        out.push_str(&format!("{}: \"{}\"\n", key, single_line(value)));
    }
    out.push_str("---\n\n");
    out.push_str(&format!("# {}\n\n", single_line(&record.title)));
    out.push_str(&format!("**Category:** {}\n", categories));
    out.push_str(&format!("**Date:** {}\n", record.published_date));
    out.push_str(&format!("**Source:** {}\n", header.source));
    out.push('\n');
    out.push_str(&record.paragraphs.join("\n\n"));
    if !record.paragraphs.is_empty() {
        out.push('\n');
    }
    out
}

// header values must stay on their line
fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn record() -> ArticleRecord {
        ArticleRecord {
            title: "Imana ni nziza: igice cya 2".into(),
            published_date: "May 3, 2019".into(),
            paragraphs: vec!["First paragraph.".into(), "Second paragraph.".into()],
            categories: vec![
                Category { name: "Iyobokamana".into(), category_url: "https://blog.example/category/iyobokamana/".into() },
                Category { name: "News".into(), category_url: "https://blog.example/category/news/".into() },
            ],
            source_url: Some("https://blog.example/2019/05/imana/".into()),
            page_number: 4,
        }
    }

    #[test]
    fn renders_header_then_body() {
        let doc = render(&record(), "Anonyme", "Religion");
        let expected = "---\n\
title: \"Imana ni nziza: igice cya 2\"\n\
author: \"Anonyme\"\n\
source: \"https://blog.example/2019/05/imana/\"\n\
date: \"May 3, 2019\"\n\
category: \"Iyobokamana\"\n\
---\n\
\n\
# Imana ni nziza: igice cya 2\n\
\n\
**Category:** Iyobokamana, News\n\
**Date:** May 3, 2019\n\
**Source:** https://blog.example/2019/05/imana/\n\
\n\
First paragraph.\n\
\n\
Second paragraph.\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn uncategorized_local_record_uses_defaults() {
        let mut r = record();
        r.categories.clear();
        r.source_url = None;
        r.paragraphs.clear();
        let doc = render(&r, "Anonyme", "Religion");
        assert!(doc.contains("category: \"Religion\"\n"));
        assert!(doc.contains("source: \"local\"\n"));
        assert!(doc.contains("**Category:** Religion\n"));
        assert!(doc.ends_with("**Source:** local\n\n"));
    }

    #[test]
    fn file_names_are_numbered_and_slugged() {
        assert_eq!(file_name(7, &record()), "0007-imana-ni-nziza-igice-cya-2.md");
    }
}
