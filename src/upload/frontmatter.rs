use indexmap::IndexMap;

/// `key: value` pairs between a leading `---` line and the next `---` line.
/// Keys and values are trimmed and one pair of surrounding double quotes is
/// removed. Documents without the opening marker have no metadata.
pub fn parse(text: &str) -> IndexMap<String, String> {
    let mut meta = IndexMap::new();
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("---") {
        return meta;
    }
    for line in lines {
        let line = line.trim();
        if line == "---" {
            break;
        }
        let Some((key, value)) = line.split_once(':') else { continue };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    meta
}

fn unquote(v: &str) -> &str {
    v.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_quoted_and_bare_values() {
        let doc = "---\ntitle: \"Imana: igice\"\nauthor: Anonyme\n\ndate:   2025-04-05T12:00:00Z \n---\n# body\nkey: not meta\n";
        let meta = parse(doc);
        assert_eq!(meta.get("title").map(String::as_str), Some("Imana: igice"));
        assert_eq!(meta.get("author").map(String::as_str), Some("Anonyme"));
        assert_eq!(meta.get("date").map(String::as_str), Some("2025-04-05T12:00:00Z"));
        assert!(meta.get("key").is_none());
    }

    #[test]
    fn missing_opening_marker_means_no_metadata() {
        assert!(parse("# Title\n---\ntitle: x\n---\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn inner_quotes_survive() {
        let meta = parse("---\ntitle: \"\"Imana\" ni nziza\"\n---\n");
        assert_eq!(meta["title"], "\"Imana\" ni nziza");
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let meta = parse("---\njust text\nsource: local\n---\n");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta["source"], "local");
    }
}
