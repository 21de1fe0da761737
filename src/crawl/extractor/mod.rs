mod boilerplate;
mod fields;
pub mod profile;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionGap;
use crate::model::{Category, NO_DATE, NO_TITLE};

pub use boilerplate::BoilerplateFilter;
pub use profile::{Profile, default_profiles};

/// One article summary found on a listing page.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingItem {
    pub title: String,
    pub link: Option<String>,
    pub published_date: String,
    pub paragraphs: Vec<String>,
    pub categories: Vec<Category>,
    pub read_more: Option<String>,
    pub gaps: Vec<ExtractionGap>,
}

impl ListingItem {
    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    /// Name of the profile that matched, None when no profile found a titled item.
    pub profile: Option<&'static str>,
    pub fetch_detail: bool,
    pub items: Vec<ListingItem>,
}

/// A detail page's article.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedArticle {
    pub profile: &'static str,
    pub title: String,
    pub published_date: String,
    pub paragraphs: Vec<String>,
    pub categories: Vec<Category>,
    pub gaps: Vec<ExtractionGap>,
}

/// Pure HTML -> fields extraction over an ordered list of profiles.
#[derive(Clone, Debug)]
pub struct Extractor {
    profiles: Vec<Profile>,
    filter: BoilerplateFilter,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(default_profiles(), BoilerplateFilter::default())
    }
}

impl Extractor {
    pub fn new(profiles: Vec<Profile>, filter: BoilerplateFilter) -> Self {
        Self { profiles, filter }
    }

    /// Items of the first profile whose containers yield at least one real title.
    pub fn extract_listing(&self, html: &str, page_url: &str) -> Listing {
        let doc = Html::parse_document(html);
        for profile in &self.profiles {
            let items = self.listing_items(&doc, profile, page_url);
            if items.iter().any(ListingItem::has_title) {
                return Listing { profile: Some(profile.name), fetch_detail: profile.fetch_detail, items };
            }
        }
        Listing { profile: None, fetch_detail: false, items: Vec::new() }
    }

    fn listing_items(&self, doc: &Html, profile: &Profile, page_url: &str) -> Vec<ListingItem> {
        let Ok(sel) = Selector::parse(profile.container) else { return Vec::new() };
        doc.select(&sel)
            .filter(|c| !nested_in_same_container(*c, &sel))
            .map(|container| {
                let mut gaps = Vec::new();
                let title = fields::first_field(container, &profile.title).unwrap_or_else(|| {
                    gaps.push(ExtractionGap::Title);
                    NO_TITLE.to_string()
                });
                let published_date = fields::first_field(container, &profile.date).unwrap_or_else(|| {
                    gaps.push(ExtractionGap::Date);
                    NO_DATE.to_string()
                });
                let paragraphs = match fields::first_within(container, profile.content) {
                    Some(content) => fields::paragraphs(content, &self.filter),
                    None => {
                        gaps.push(ExtractionGap::Content);
                        Vec::new()
                    }
                };
                ListingItem {
                    title,
                    link: fields::first_link(container, &profile.link, page_url),
                    published_date,
                    paragraphs,
                    categories: fields::categories(container, &profile.categories, page_url),
                    read_more: fields::first_link(container, &profile.read_more, page_url),
                    gaps,
                }
            })
            .collect()
    }

    /// The article of a detail page, from the first profile that finds a title.
    pub fn extract_article(&self, html: &str, page_url: &str) -> Option<ExtractedArticle> {
        let doc = Html::parse_document(html);
        self.profiles.iter().find_map(|profile| self.article_with(&doc, profile, page_url))
    }

    fn article_with(&self, doc: &Html, profile: &Profile, page_url: &str) -> Option<ExtractedArticle> {
        let sel = Selector::parse(profile.container).ok()?;
        let container = doc.select(&sel).next()?;
        let title = fields::first_field(container, &profile.title)?;

        let mut gaps = Vec::new();
        let published_date = fields::first_field(container, &profile.date).unwrap_or_else(|| {
            gaps.push(ExtractionGap::Date);
            NO_DATE.to_string()
        });
        let content = fields::first_within(container, profile.full_content)
            .or_else(|| fields::first_within(container, profile.content));
        let paragraphs = match content {
            Some(c) => fields::paragraphs(c, &self.filter),
            None => {
                gaps.push(ExtractionGap::Content);
                Vec::new()
            }
        };
        Some(ExtractedArticle {
            profile: profile.name,
            title,
            published_date,
            paragraphs,
            categories: fields::categories(container, &profile.categories, page_url),
            gaps,
        })
    }

    /// Paragraphs of the full-content container on a read-more page, tried per
    /// profile in order; the first non-empty result wins.
    pub fn full_paragraphs(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let root = doc.root_element();
        self.profiles
            .iter()
            .map(|p| match fields::first_within(root, p.full_content) {
                Some(c) => fields::paragraphs(c, &self.filter),
                None => Vec::new(),
            })
            .find(|ps| !ps.is_empty())
            .unwrap_or_default()
    }

    /// Absolute URL of the next listing page, if the page links one.
    pub fn next_page(&self, html: &str, page_url: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        fields::first_link(doc.root_element(), profile::NEXT_PAGE, page_url)
    }
}

// Some themes nest `div.post` wrappers; only the outermost counts as an item.
fn nested_in_same_container(el: ElementRef<'_>, sel: &Selector) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| sel.matches(&a))
}
