use scraper::{ElementRef, Selector};

use super::boilerplate::BoilerplateFilter;
use super::profile::{CategoryStrategy, FieldStrategy};
use crate::model::Category;
use crate::util::text::{collapse_whitespace, title_case_slug};
use crate::util::url::{origin, resolve};

/// First non-empty value produced by `strategies`, in order.
pub fn first_field(scope: ElementRef<'_>, strategies: &[FieldStrategy]) -> Option<String> {
    strategies.iter().find_map(|s| apply_field(scope, s))
}

fn apply_field(scope: ElementRef<'_>, strategy: &FieldStrategy) -> Option<String> {
    match *strategy {
        FieldStrategy::Text { selector } => {
            let sel = Selector::parse(selector).ok()?;
            scope.select(&sel).find_map(|el| {
                let text = collapse_whitespace(&el.text().collect::<String>());
                if text.is_empty() { None } else { Some(text) }
            })
        }
        FieldStrategy::Attr { selector, attr } => {
            let sel = Selector::parse(selector).ok()?;
            scope.select(&sel).find_map(|el| {
                let v = el.value().attr(attr)?.trim();
                if v.is_empty() { None } else { Some(v.to_string()) }
            })
        }
    }
}

/// Like `first_field` but resolves the value as a link against `page_url`.
pub fn first_link(scope: ElementRef<'_>, strategies: &[FieldStrategy], page_url: &str) -> Option<String> {
    strategies
        .iter()
        .filter_map(|s| apply_field(scope, s))
        .find_map(|href| resolve(page_url, &href))
}

/// First element matching `selector` inside `scope`; `scope` itself is not considered.
pub fn first_within<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope.select(&sel).next()
}

/// Non-empty, non-boilerplate `<p>` texts inside `container`, in document order.
pub fn paragraphs(container: ElementRef<'_>, filter: &BoilerplateFilter) -> Vec<String> {
    let Ok(p_sel) = Selector::parse("p") else { return Vec::new() };
    container
        .select(&p_sel)
        .filter(|p| !filter.inside_excluded_container(*p, container))
        .filter_map(|p| {
            let text = p.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() || filter.is_boilerplate_text(text) { None } else { Some(text.to_string()) }
        })
        .collect()
}

/// Categories from the first strategy that yields any, deduplicated by name.
pub fn categories(scope: ElementRef<'_>, strategies: &[CategoryStrategy], page_url: &str) -> Vec<Category> {
    for strategy in strategies {
        let found = match *strategy {
            CategoryStrategy::Anchors { selector } => anchor_categories(scope, selector, page_url),
            CategoryStrategy::ClassTokens { prefix } => class_categories(scope, prefix, page_url),
        };
        if !found.is_empty() {
            return dedup_by_name(found);
        }
    }
    Vec::new()
}

fn anchor_categories(scope: ElementRef<'_>, selector: &str, page_url: &str) -> Vec<Category> {
    let Ok(sel) = Selector::parse(selector) else { return Vec::new() };
    scope
        .select(&sel)
        .filter_map(|a| {
            let name = collapse_whitespace(&a.text().collect::<String>());
            if name.is_empty() { return None; }
            let category_url = a.value().attr("href").and_then(|h| resolve(page_url, h)).unwrap_or_default();
            Some(Category { name, category_url })
        })
        .collect()
}

fn class_categories(scope: ElementRef<'_>, prefix: &str, page_url: &str) -> Vec<Category> {
    let base = origin(page_url).unwrap_or_default();
    // raw attribute keeps the author's token order
    scope
        .value()
        .attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(|class| class.strip_prefix(prefix))
        .filter(|slug| !slug.is_empty())
        .map(|slug| Category { name: title_case_slug(slug), category_url: format!("{}/category/{}/", base, slug) })
        .collect()
}

fn dedup_by_name(cats: Vec<Category>) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::with_capacity(cats.len());
    for c in cats {
        if !out.iter().any(|o| o.name == c.name) {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn root(doc: &Html) -> ElementRef<'_> {
        doc.root_element()
    }

    #[test]
    fn first_field_skips_empty_matches_and_falls_through() {
        let doc = Html::parse_fragment(r#"<div><h2><a href="/x">  </a></h2><h2 class="t">Real  title</h2></div>"#);
        let got = first_field(root(&doc), &[FieldStrategy::Text { selector: "h2 a" }, FieldStrategy::Text { selector: "h2.t" }]);
        assert_eq!(got.as_deref(), Some("Real title"));
    }

    #[test]
    fn attr_strategy_reads_attribute() {
        let doc = Html::parse_fragment(r#"<div><time datetime="2019-05-03T10:00:00+00:00"></time></div>"#);
        let got = first_field(root(&doc), &[FieldStrategy::Text { selector: "time" }, FieldStrategy::Attr { selector: "time", attr: "datetime" }]);
        assert_eq!(got.as_deref(), Some("2019-05-03T10:00:00+00:00"));
    }

    #[test]
    fn first_link_resolves_relative_href() {
        let doc = Html::parse_fragment(r#"<div><h2><a href="/2019/05/post/">T</a></h2></div>"#);
        let got = first_link(root(&doc), &[FieldStrategy::Attr { selector: "h2 a", attr: "href" }], "https://blog.example/page/2/");
        assert_eq!(got.as_deref(), Some("https://blog.example/2019/05/post/"));
    }

    #[test]
    fn anchor_categories_are_deduplicated() {
        let doc = Html::parse_fragment(
            r#"<div><a rel="category tag" href="/category/news/">News</a><a rel="category" href="/category/news/">News</a><a rel="category" href="/category/sport/">Sport</a></div>"#,
        );
        let cats = categories(root(&doc), &[CategoryStrategy::Anchors { selector: "a[rel~=category]" }], "https://blog.example/");
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0], Category { name: "News".into(), category_url: "https://blog.example/category/news/".into() });
        assert_eq!(cats[1].name, "Sport");
    }

    #[test]
    fn class_token_categories_are_decoded() {
        let doc = Html::parse_document(r#"<article class="post-12 post type-post category-amakuru-mashya category-politiki"></article>"#);
        let sel = Selector::parse("article").unwrap();
        let article = doc.select(&sel).next().unwrap();
        let cats = categories(article, &[CategoryStrategy::ClassTokens { prefix: "category-" }], "https://blog.example/page/3/");
        assert_eq!(cats, vec![
            Category { name: "Amakuru Mashya".into(), category_url: "https://blog.example/category/amakuru-mashya/".into() },
            Category { name: "Politiki".into(), category_url: "https://blog.example/category/politiki/".into() },
        ]);
    }

    #[test]
    fn later_category_strategy_used_when_first_is_empty() {
        let doc = Html::parse_document(r#"<article class="post"><a rel="category" href="/category/x/">X</a></article>"#);
        let sel = Selector::parse("article").unwrap();
        let article = doc.select(&sel).next().unwrap();
        let cats = categories(
            article,
            &[CategoryStrategy::ClassTokens { prefix: "category-" }, CategoryStrategy::Anchors { selector: "a[rel~=category]" }],
            "https://blog.example/",
        );
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "X");
    }
}
