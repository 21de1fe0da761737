use scraper::ElementRef;

const EXCLUDED_CLASSES: &[&str] = &["sharedaddy", "sd-sharing-enabled", "sd-like", "jp-relatedposts", "wpcnt"];

/// Drops sharing/like widgets from paragraph extraction, both by enclosing
/// container class and by text prefix. Prefix matching is exact and
/// case-sensitive: "Share this: more" is dropped, "I share this:" is kept.
#[derive(Clone, Debug)]
pub struct BoilerplateFilter {
    prefixes: Vec<String>,
    excluded_classes: Vec<String>,
}

impl Default for BoilerplateFilter {
    fn default() -> Self {
        Self::new(vec!["Share this:".into(), "Like this:".into(), "Like Loading".into()])
    }
}

impl BoilerplateFilter {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self {
            prefixes,
            excluded_classes: EXCLUDED_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_boilerplate_text(&self, text: &str) -> bool {
        let text = text.trim_start();
        self.prefixes.iter().any(|p| text.starts_with(p.as_str()))
    }

    /// True when an ancestor of `el`, up to but excluding `stop`, carries an
    /// excluded class.
    pub fn inside_excluded_container(&self, el: ElementRef<'_>, stop: ElementRef<'_>) -> bool {
        for node in el.ancestors() {
            if node.id() == stop.id() {
                return false;
            }
            if let Some(anc) = ElementRef::wrap(node) {
                if anc.value().classes().any(|c| self.excluded_classes.iter().any(|x| x == c)) {
                    return true;
                }
            }
        }
        false
    }
}
