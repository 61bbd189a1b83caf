//! Query mini-language parsing.
//!
//! The raw query string may contain `#token` occurrences (each a required
//! tag) and a literal `*` (favorites only). Both token classes are
//! stripped, along with surrounding whitespace, to obtain the case-folded
//! plain-text query. Parsing never fails; malformed input degrades to "no
//! text filter".

use once_cell::sync::Lazy;
use regex_lite::Regex;

static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\S+)").unwrap());

/// The structured form of a raw query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Case-folded plain text with all special tokens removed.
    pub text: String,
    /// Required tags from `#token` occurrences, case-folded.
    pub tags: Vec<String>,
    /// True if the query contained a literal `*`.
    pub favorites_only: bool,
    /// The partial tag being typed when the query ends in an unterminated
    /// `#token` (empty string right after the `#`).
    pub typing_tag: Option<String>,
}

/// Parse a raw query string. Pure function, no I/O.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let tags = TAG_TOKEN
        .captures_iter(raw)
        .map(|cap| cap[1].to_lowercase())
        .collect();

    let favorites_only = raw.contains('*');

    let text = TAG_TOKEN
        .replace_all(raw, "")
        .replace('*', "")
        .trim()
        .to_lowercase();

    // The query ends mid-token when its last character is not whitespace
    // and the trailing token starts with '#'.
    let typing_tag = if raw.ends_with(|c: char| !c.is_whitespace()) {
        raw.split_whitespace()
            .last()
            .and_then(|token| token.strip_prefix('#'))
            .map(str::to_lowercase)
    } else {
        None
    };

    ParsedQuery {
        text,
        tags,
        favorites_only,
        typing_tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_only() {
        let parsed = parse_query("wget");
        assert_eq!(parsed.text, "wget");
        assert!(parsed.tags.is_empty());
        assert!(!parsed.favorites_only);
        assert!(parsed.typing_tag.is_none());
    }

    #[test]
    fn test_case_folding() {
        let parsed = parse_query("  WGet  ");
        assert_eq!(parsed.text, "wget");
    }

    #[test]
    fn test_single_tag() {
        let parsed = parse_query("#CLI wget");
        assert_eq!(parsed.tags, vec!["cli"]);
        assert_eq!(parsed.text, "wget");
        assert!(parsed.typing_tag.is_none());
    }

    #[test]
    fn test_multiple_tags() {
        let parsed = parse_query("#cli tool #Network");
        assert_eq!(parsed.tags, vec!["cli", "network"]);
        assert_eq!(parsed.text, "tool");
    }

    #[test]
    fn test_favorites_star() {
        let parsed = parse_query("wget *");
        assert!(parsed.favorites_only);
        assert_eq!(parsed.text, "wget");
    }

    #[test]
    fn test_combined_syntax() {
        let parsed = parse_query("#cli * transfer");
        assert!(parsed.favorites_only);
        assert_eq!(parsed.tags, vec!["cli"]);
        assert_eq!(parsed.text, "transfer");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(parse_query(""), ParsedQuery::default());
        let parsed = parse_query("   ");
        assert_eq!(parsed.text, "");
        assert!(parsed.typing_tag.is_none());
    }

    #[test]
    fn test_trailing_partial_tag_flags_typing() {
        let parsed = parse_query("wget #cl");
        assert_eq!(parsed.typing_tag.as_deref(), Some("cl"));
        // The partial token still counts as a required tag.
        assert_eq!(parsed.tags, vec!["cl"]);
        assert_eq!(parsed.text, "wget");
    }

    #[test]
    fn test_bare_trailing_hash_is_typing_empty() {
        let parsed = parse_query("wget #");
        assert_eq!(parsed.typing_tag.as_deref(), Some(""));
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_terminated_tag_is_not_typing() {
        let parsed = parse_query("wget #cli ");
        assert!(parsed.typing_tag.is_none());
        assert_eq!(parsed.tags, vec!["cli"]);
    }

    #[test]
    fn test_only_special_tokens_leaves_empty_text() {
        let parsed = parse_query("#cli *");
        assert_eq!(parsed.text, "");
        assert_eq!(parsed.tags, vec!["cli"]);
        assert!(parsed.favorites_only);
    }
}
