use regex::Regex;
use std::sync::OnceLock;

pub fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                if !buf.is_empty() { buf.push(' '); }
                in_ws = true;
            }
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim().to_string()
}

// "amakuru-mashya" -> "Amakuru Mashya"
pub fn title_case_slug(slug: &str) -> String {
    slug.split(|c| c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, ascii-alphanumeric runs joined by '-', capped at `max` chars.
pub fn slugify(s: &str, max: usize) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));
    let lower = s.to_lowercase();
    let slug = re.replace_all(&lower, "-");
    let mut out: String = slug.trim_matches('-').chars().take(max).collect();
    while out.ends_with('-') { out.pop(); }
    if out.is_empty() { "untitled".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(collapse_whitespace("  Umwaka \n\t mushya  "), "Umwaka mushya");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn title_cases_category_slugs() {
        assert_eq!(title_case_slug("amakuru-mashya"), "Amakuru Mashya");
        assert_eq!(title_case_slug("politics"), "Politics");
        assert_eq!(title_case_slug("a--b_c"), "A B C");
    }

    #[test]
    fn slugify_keeps_ascii_and_caps_length() {
        assert_eq!(slugify("Ijambo ry'Umukuru: 2020!", 40), "ijambo-ry-umukuru-2020");
        assert_eq!(slugify("???", 40), "untitled");
        assert_eq!(slugify("abc def ghi", 5), "abc-d");
        assert_eq!(slugify("abcd efgh", 5), "abcd");
    }
}
