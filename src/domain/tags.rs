//! Tag handling shared by journal entries, reflections and transactions

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Tag attached to entries the user wants surfaced for later review
pub const CODEX_LINKED: &str = "codex-linked";

/// Regex for inline hashtags: #word, #word-with-dashes, #word_with_underscores
fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#([a-zA-Z0-9_-]+)").unwrap())
}

/// Extract inline `#tags` from free text, lowercased, in order of appearance
pub fn extract_inline_tags(text: &str) -> Vec<String> {
    tag_regex()
        .captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect()
}

/// Split a comma-separated tag field, trimming and dropping empties
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().trim_start_matches('#').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Union of inline and manual tags: lowercase, deduplicated, sorted
pub fn merge_tags(content: &str, manual: &str) -> Vec<String> {
    let set: BTreeSet<String> = extract_inline_tags(content)
        .into_iter()
        .chain(parse_tag_list(manual).into_iter().map(|t| t.to_lowercase()))
        .collect();
    set.into_iter().collect()
}

/// Tags worth showing to the user
pub fn visible_tags(tags: &[String]) -> impl Iterator<Item = &String> {
    tags.iter().filter(|t| t.as_str() != CODEX_LINKED)
}

/// Visible tags that `content` does not already supply inline. This is what
/// the manual tag field holds when an entry is edited.
pub fn manual_tags<'a>(tags: &'a [String], content: &str) -> Vec<&'a String> {
    let inline = extract_inline_tags(content);
    visible_tags(tags).filter(|t| !inline.contains(*t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_inline_tags() {
        let tags = extract_inline_tags("Cut the #Deck joists today. #work #deck-build");
        assert_eq!(tags, vec!["deck", "work", "deck-build"]);
    }

    #[test]
    fn test_extract_ignores_bare_hash() {
        assert!(extract_inline_tags("item # 4, see # ").is_empty());
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(
            parse_tag_list(" lumber, project-deck ,, #idea"),
            vec!["lumber", "project-deck", "idea"]
        );
        assert!(parse_tag_list("  ").is_empty());
    }

    #[test]
    fn test_merge_tags_dedups_and_sorts() {
        let tags = merge_tags("Thinking about #work and #Ideas", "work, family");
        assert_eq!(tags, vec!["family", "ideas", "work"]);
    }

    #[test]
    fn test_visible_tags_hides_link_marker() {
        let tags = vec!["work".to_string(), CODEX_LINKED.to_string()];
        let shown: Vec<&String> = visible_tags(&tags).collect();
        assert_eq!(shown, vec!["work"]);
    }

    #[test]
    fn test_manual_tags_leave_out_inline_ones() {
        let tags = vec![
            "codex-linked".to_string(),
            "deck".to_string(),
            "lumber".to_string(),
        ];
        assert_eq!(manual_tags(&tags, "Built the #Deck"), vec!["lumber"]);
        assert_eq!(manual_tags(&tags, "Built the shed"), vec!["deck", "lumber"]);
    }
}
