//! Extraction profiles: one per markup generation of the site.
//!
//! A profile is data, not code. Each field lists strategies in priority order;
//! `fields` applies them and keeps the first non-empty result.

/// How to read a single string field inside a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStrategy {
    /// Trimmed text of the first match with non-empty text.
    Text { selector: &'static str },
    /// Attribute value of the first match carrying a non-empty value.
    Attr { selector: &'static str, attr: &'static str },
}

/// Where an item's categories come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryStrategy {
    /// Anchor elements tagged as category links inside the item.
    Anchors { selector: &'static str },
    /// Class tokens on the container, e.g. `category-amakuru` decoded into a
    /// name and `{origin}/category/{slug}/`.
    ClassTokens { prefix: &'static str },
}

#[derive(Clone, Debug)]
pub struct Profile {
    pub name: &'static str,
    pub container: &'static str,
    pub title: Vec<FieldStrategy>,
    pub link: Vec<FieldStrategy>,
    pub date: Vec<FieldStrategy>,
    /// Content container on listing pages (summary).
    pub content: &'static str,
    /// Content container on detail pages.
    pub full_content: &'static str,
    pub categories: Vec<CategoryStrategy>,
    pub read_more: Vec<FieldStrategy>,
    /// Fetch each item's detail page to build the record.
    pub fetch_detail: bool,
}

pub const LEGACY: &str = "legacy";
pub const PRODUCTION: &str = "production";

impl Profile {
    /// Older theme: `div.post`, heading link title, first meta link as date,
    /// `div.entry-summary` excerpt.
    pub fn legacy() -> Self {
        Profile {
            name: LEGACY,
            container: "div.post",
            title: vec![FieldStrategy::Text { selector: "h2 a" }, FieldStrategy::Text { selector: "h2" }],
            link: vec![FieldStrategy::Attr { selector: "h2 a", attr: "href" }],
            date: vec![FieldStrategy::Text { selector: "p.entry-meta a" }, FieldStrategy::Text { selector: ".entry-meta" }],
            content: "div.entry-summary",
            full_content: "div.entry-content",
            categories: vec![
                CategoryStrategy::Anchors { selector: "a[rel~=category]" },
                CategoryStrategy::Anchors { selector: ".cat-links a" },
            ],
            read_more: vec![FieldStrategy::Attr { selector: "a.more-link", attr: "href" }],
            fetch_detail: false,
        }
    }

    /// Current theme: `<article>` with `.entry-title`, `<time>`, full
    /// `div.entry-content` on the article's own page.
    pub fn production() -> Self {
        Profile {
            name: PRODUCTION,
            container: "article",
            title: vec![FieldStrategy::Text { selector: ".entry-title a" }, FieldStrategy::Text { selector: ".entry-title" }],
            link: vec![
                FieldStrategy::Attr { selector: ".entry-title a", attr: "href" },
                FieldStrategy::Attr { selector: "a[rel~=bookmark]", attr: "href" },
            ],
            date: vec![
                FieldStrategy::Text { selector: "time.entry-date" },
                FieldStrategy::Text { selector: "time" },
                FieldStrategy::Attr { selector: "time", attr: "datetime" },
            ],
            content: "div.entry-content, div.entry-summary",
            full_content: "div.entry-content",
            categories: vec![
                CategoryStrategy::ClassTokens { prefix: "category-" },
                CategoryStrategy::Anchors { selector: "a[rel~=category]" },
            ],
            read_more: vec![FieldStrategy::Attr { selector: "a.more-link", attr: "href" }],
            fetch_detail: true,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            LEGACY => Some(Self::legacy()),
            PRODUCTION => Some(Self::production()),
            _ => None,
        }
    }
}

/// Fixed fallback order used when none is configured.
pub fn default_profiles() -> Vec<Profile> {
    vec![Profile::legacy(), Profile::production()]
}

/// Next-page discovery: semantic `rel=next` first, then page-number anchors.
pub const NEXT_PAGE: &[FieldStrategy] = &[
    FieldStrategy::Attr { selector: "a[rel~=next]", attr: "href" },
    FieldStrategy::Attr { selector: "link[rel~=next]", attr: "href" },
    FieldStrategy::Attr { selector: "a.next.page-numbers", attr: "href" },
    FieldStrategy::Attr { selector: "a.next", attr: "href" },
    FieldStrategy::Attr { selector: ".nav-previous a", attr: "href" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_is_case_insensitive() {
        assert_eq!(Profile::by_name("Legacy").map(|p| p.name), Some(LEGACY));
        assert_eq!(Profile::by_name(" production ").map(|p| p.name), Some(PRODUCTION));
        assert!(Profile::by_name("other").is_none());
    }

    #[test]
    fn default_order_is_legacy_then_production() {
        let names: Vec<&str> = default_profiles().iter().map(|p| p.name).collect();
        assert_eq!(names, [LEGACY, PRODUCTION]);
    }

    #[test]
    fn all_selectors_parse() {
        let mut selectors: Vec<&str> = Vec::new();
        for p in default_profiles() {
            selectors.extend([p.container, p.content, p.full_content]);
            for s in p.title.iter().chain(&p.link).chain(&p.date).chain(&p.read_more) {
                selectors.push(match s { FieldStrategy::Text { selector } | FieldStrategy::Attr { selector, .. } => *selector });
            }
            for c in &p.categories {
                if let CategoryStrategy::Anchors { selector } = c { selectors.push(*selector); }
            }
        }
        for s in NEXT_PAGE {
            if let FieldStrategy::Attr { selector, .. } = s { selectors.push(*selector); }
        }
        for s in selectors {
            assert!(scraper::Selector::parse(s).is_ok(), "bad selector {s}");
        }
    }
}
