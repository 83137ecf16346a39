//! Job metadata extraction. Infers a title and company from the first lines
//! of a pasted job posting, with the posting URL as a last resort.
//!
//! Each field is resolved by an ordered list of named rules; the first rule
//! that yields a non-empty value wins.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::jobs::link::company_from_link;
use crate::models::job::{JobMetadata, DEFAULT_JOB_TITLE};
use crate::text::sanitize::sanitize_plain_text;

/// Only the top of a posting is scanned.
const HEADER_LINE_COUNT: usize = 12;
const MAX_VALUE_CHARS: usize = 160;
const TITLE_LINE_MIN_CHARS: usize = 4;
const TITLE_LINE_MAX_CHARS: usize = 90;
const TITLE_LINE_MAX_WORDS: usize = 12;

/// Section headings that look like titles but never are.
const TITLE_STOPLIST: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "about the role",
    "job description",
    "what you'll do",
];

static RE_TITLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:job\s+title|title|position|role)\s*:\s*(.+)$").unwrap()
});

static RE_COMPANY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:company|employer|organization)\s*:\s*(.+)$").unwrap()
});

static RE_TITLE_AT_COMPANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+at\s+(.+)$").unwrap());

static RE_COMPANY_DASH_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+[-|]\s+(.+)$").unwrap());

static RE_AT_CAPITALIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bat\s+(\p{Lu}[\w&.'-]*(?:\s+\p{Lu}[\w&.'-]*)*)").unwrap()
});

static RE_DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,\-()/'"]"#).unwrap());

/// Inputs every rule sees.
struct HeaderContext<'a> {
    lines: Vec<&'a str>,
    job_link: Option<&'a str>,
}

type Rule = fn(&HeaderContext<'_>) -> Option<String>;

const TITLE_RULES: &[(&str, Rule)] = &[
    ("labelled", labelled_title),
    ("combined_line", combined_line_title),
    ("title_like_line", title_like_line),
];

const COMPANY_RULES: &[(&str, Rule)] = &[
    ("labelled", labelled_company),
    ("combined_line", combined_line_company),
    ("at_phrase", at_phrase_company),
    ("link_host", link_host_company),
];

/// Derives `{title, company}` from free-form posting text.
///
/// Deterministic and infallible: title falls back to "Job Opportunity",
/// company to `None`.
pub fn derive_job_metadata(job_text: &str, job_link: Option<&str>) -> JobMetadata {
    let sanitized = sanitize_plain_text(job_text);
    let ctx = HeaderContext {
        lines: sanitized
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(HEADER_LINE_COUNT)
            .collect(),
        job_link: job_link.map(str::trim).filter(|l| !l.is_empty()),
    };

    let title = first_match("title", TITLE_RULES, &ctx);
    let company = first_match("company", COMPANY_RULES, &ctx);

    JobMetadata {
        title: title.unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string()),
        company,
    }
}

fn first_match(field: &str, rules: &[(&str, Rule)], ctx: &HeaderContext<'_>) -> Option<String> {
    rules.iter().find_map(|(name, rule)| {
        let value = rule(ctx).map(|v| clean_value(&v)).filter(|v| !v.is_empty())?;
        debug!(field, rule = *name, value = %value, "Job metadata rule matched");
        Some(value)
    })
}

/// Drops characters outside a conservative set, collapses whitespace, and caps length.
fn clean_value(raw: &str) -> String {
    let stripped = RE_DISALLOWED_CHARS.replace_all(raw, "");
    collapse_whitespace(&stripped)
        .chars()
        .take(MAX_VALUE_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn labelled(re: &Regex, ctx: &HeaderContext<'_>) -> Option<String> {
    ctx.lines
        .iter()
        .find_map(|line| re.captures(line))
        .map(|caps| collapse_whitespace(&caps[1]))
}

fn labelled_title(ctx: &HeaderContext<'_>) -> Option<String> {
    labelled(&RE_TITLE_LABEL, ctx)
}

fn labelled_company(ctx: &HeaderContext<'_>) -> Option<String> {
    labelled(&RE_COMPANY_LABEL, ctx)
}

/// First header line of the form "Title at Company", "Company - Title", or
/// "Company | Title", as `(title, company)`.
fn combined_line(ctx: &HeaderContext<'_>) -> Option<(String, String)> {
    ctx.lines.iter().find_map(|line| {
        if !line.starts_with('-') {
            if let Some(caps) = RE_TITLE_AT_COMPANY.captures(line) {
                return Some((caps[1].trim().to_string(), caps[2].trim().to_string()));
            }
        }
        RE_COMPANY_DASH_TITLE
            .captures(line)
            .map(|caps| (caps[2].trim().to_string(), caps[1].trim().to_string()))
    })
}

fn combined_line_title(ctx: &HeaderContext<'_>) -> Option<String> {
    combined_line(ctx).map(|(title, _)| title)
}

fn combined_line_company(ctx: &HeaderContext<'_>) -> Option<String> {
    combined_line(ctx).map(|(_, company)| company)
}

fn title_like_line(ctx: &HeaderContext<'_>) -> Option<String> {
    ctx.lines
        .iter()
        .find(|line| looks_like_title(line))
        .map(|line| line.to_string())
}

fn looks_like_title(line: &str) -> bool {
    if line.starts_with(['-', '•', '*']) || line.ends_with(':') {
        return false;
    }

    let len = line.chars().count();
    if !(TITLE_LINE_MIN_CHARS..=TITLE_LINE_MAX_CHARS).contains(&len) {
        return false;
    }

    let lower = line.to_lowercase();
    if TITLE_STOPLIST.iter().any(|phrase| lower.contains(phrase)) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    words.len() <= TITLE_LINE_MAX_WORDS
        && words
            .iter()
            .any(|w| w.chars().next().is_some_and(char::is_uppercase))
}

fn at_phrase_company(ctx: &HeaderContext<'_>) -> Option<String> {
    ctx.lines
        .iter()
        .find_map(|line| RE_AT_CAPITALIZED.captures(line))
        .map(|caps| caps[1].to_string())
}

fn link_host_company(ctx: &HeaderContext<'_>) -> Option<String> {
    ctx.job_link.and_then(company_from_link)
}
