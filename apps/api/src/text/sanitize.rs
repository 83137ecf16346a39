//! Plain-text sanitizer. Strips markdown noise from pasted or extracted text
//! and decides whether what is left is worth treating as resume content.

use regex::Regex;
use std::sync::LazyLock;

static RE_CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[\w-]*").unwrap());

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ *(?:#{1,6} +)+").unwrap());

static RE_LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ *[>*•-] +").unwrap());

static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]*)`").unwrap());

static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").unwrap());

static RE_UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__([^_\n]+?)__").unwrap());

static RE_MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Minimum sanitized length, in characters, for text to count as meaningful.
const MIN_MEANINGFUL_CHARS: usize = 90;
const MIN_MEANINGFUL_WORDS: usize = 10;
const MIN_MEANINGFUL_LETTERS: usize = 40;
/// Texts where more than this share of characters are digits are rejected.
const MAX_DIGIT_RATIO: f64 = 0.5;

/// Strips markdown and control noise, leaving plain text with `- ` bullets.
///
/// Never fails; applying it twice gives the same result as applying it once.
pub fn sanitize_plain_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    let text = RE_CODE_FENCE.replace_all(&text, "");
    // Inline unwraps first so they cannot expose new line-start markup.
    let text = RE_INLINE_CODE.replace_all(&text, "$1");
    let text = RE_BOLD.replace_all(&text, "$1");
    let text = RE_UNDERLINE.replace_all(&text, "$1");
    let text = RE_HEADING.replace_all(&text, "");
    let text = RE_LINE_MARKER.replace_all(&text, "- ");
    let text = RE_MULTIPLE_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Same as [`sanitize_plain_text`] for inputs that may be absent.
pub fn sanitize_optional(text: Option<&str>) -> String {
    text.map(sanitize_plain_text).unwrap_or_default()
}

/// Cheap gate run before spending an LLM call on a paste.
///
/// Rejects text that is too short, has too few words or letters, or is mostly
/// digits (phone numbers, IDs). Each threshold is checked independently.
pub fn is_meaningful_text(raw: &str) -> bool {
    let text = sanitize_plain_text(raw);

    let total_chars = text.chars().count();
    if total_chars < MIN_MEANINGFUL_CHARS {
        return false;
    }

    if text.split_whitespace().count() < MIN_MEANINGFUL_WORDS {
        return false;
    }

    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if letters < MIN_MEANINGFUL_LETTERS {
        return false;
    }

    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    (digits as f64 / total_chars as f64) <= MAX_DIGIT_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKDOWN_SAMPLE: &str = "# Jane Doe\r\n\r\n\r\n\r\n## Experience\n\t* **Led** the `api` rewrite\n> quoted line\n• dot bullet\n```rust\nlet x = 1;\n```\n__Bold__ end";

    const PROSE: &str = "Experienced backend engineer who has spent the last eight years designing \
        reliable payment systems, mentoring junior developers, and leading migrations to Rust.";

    #[test]
    fn test_crlf_and_tabs() {
        assert_eq!(sanitize_plain_text("a\r\nb\tc"), "a\nb c");
    }

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!(sanitize_plain_text("x\n\n\n\ny"), "x\n\ny");
    }

    #[test]
    fn test_strips_markdown_constructs() {
        let out = sanitize_plain_text(MARKDOWN_SAMPLE);
        assert!(out.starts_with("Jane Doe\n\nExperience\n"));
        assert!(out.contains("- Led the api rewrite"));
        assert!(out.contains("- quoted line"));
        assert!(out.contains("- dot bullet"));
        assert!(out.contains("let x = 1;"));
        assert!(out.ends_with("Bold end"));
        assert!(!out.contains("```"));
        assert!(!out.contains('#'));
        assert!(!out.contains("**"));
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize_plain_text(MARKDOWN_SAMPLE);
        assert_eq!(sanitize_plain_text(&once), once);

        let nested = "> > * nested marker\n### **Heading**";
        let once = sanitize_plain_text(nested);
        assert_eq!(sanitize_plain_text(&once), once);
    }

    #[test]
    fn test_idempotent_when_unwrapping_exposes_markup() {
        for input in ["**> quoted**", "**# Heading**", "`* item`", "__- dash__", "# # Twice"] {
            let once = sanitize_plain_text(input);
            assert_eq!(sanitize_plain_text(&once), once, "input {input:?}");
        }
        assert_eq!(sanitize_plain_text("**> quoted**"), "- quoted");
        assert_eq!(sanitize_plain_text("**# Heading**"), "Heading");
        assert_eq!(sanitize_plain_text("# # Twice"), "Twice");
    }

    #[test]
    fn test_missing_input_is_empty() {
        assert_eq!(sanitize_optional(None), "");
        assert_eq!(sanitize_optional(Some("  hi  ")), "hi");
    }

    #[test]
    fn test_meaningful_rejects_short() {
        assert!(!is_meaningful_text("Hello"));
        assert!(!is_meaningful_text("One two three"));
    }

    #[test]
    fn test_meaningful_accepts_prose() {
        assert!(PROSE.len() >= 90);
        assert!(is_meaningful_text(PROSE));
    }

    #[test]
    fn test_meaningful_rejects_digits() {
        let digits = "1234567890".repeat(9);
        assert!(!is_meaningful_text(&digits));
    }

    #[test]
    fn test_meaningful_rejects_few_words() {
        let long_word = "a".repeat(120);
        assert!(!is_meaningful_text(&long_word));
    }

    #[test]
    fn test_meaningful_rejects_few_letters() {
        // Passes the length, word and digit gates; mostly punctuation.
        let text = "ab -- ab -- ab -- ab -- ab -- ab -- ab -- ab -- ab -- ab -- ab -- ab ?? ?? ?? ?? ?? ?? ?? ??";
        assert!(text.chars().count() >= 90);
        assert!(text.split_whitespace().count() >= 10);
        assert_eq!(text.chars().filter(|c| c.is_alphabetic()).count(), 24);
        assert!(!is_meaningful_text(text));
        assert!(is_meaningful_text(&text.replace("ab", "abcd")));
    }

    #[test]
    fn test_meaningful_rejects_phone_list() {
        let text = format!("call me at {} ok", "5551234567 ".repeat(12));
        assert!(!is_meaningful_text(&text));
    }
}
