//! Structured resume parser.
//!
//! Turns whatever the user or the LLM handed us into a [`ResumeDocument`]:
//!
//! 1. JSON in the app's own save format (optionally wrapped in code fences)
//!    is deserialized directly.
//! 2. Markdown-ish text (`# name`, `## section`, `### item`, `*meta*`, `- bullet`)
//!    is scanned line by line.
//! 3. Anything that yields no sections is wrapped whole as one summary section.
//!
//! Parsing never fails; malformed input degrades to a coarser structure.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::resume::{
    Item, PersonalInfo, ResumeDocument, Section, SectionContent, SectionType, DEFAULT_NAME,
};
use crate::text::fences::strip_json_fences;

const FALLBACK_SECTION_TITLE: &str = "Resume Content";
const IMPLICIT_SUMMARY_TITLE: &str = "Professional Summary";
const PLACEHOLDER_ITEM_TITLE: &str = "Item";

/// Contact details are only looked for this close to the top.
const CONTACT_SCAN_LINES: usize = 15;
/// An unmarked name must appear within the first few lines.
const NAME_SCAN_LINES: usize = 5;
const UPPERCASE_HEADER_MIN_CHARS: usize = 4;
const UPPERCASE_HEADER_MAX_CHARS: usize = 39;
const DATE_LINE_MAX_CHARS: usize = 30;
const MIN_PHONE_DIGITS: usize = 9;

/// Heading synonyms, checked exactly first and then as substrings, in order.
const SECTION_KEYWORDS: &[(&str, SectionType)] = &[
    ("professional summary", SectionType::Summary),
    ("summary", SectionType::Summary),
    ("profile", SectionType::Summary),
    ("about me", SectionType::Summary),
    ("about", SectionType::Summary),
    ("professional experience", SectionType::Experience),
    ("work experience", SectionType::Experience),
    ("employment history", SectionType::Experience),
    ("experience", SectionType::Experience),
    ("academic background", SectionType::Education),
    ("education", SectionType::Education),
    ("technical skills", SectionType::Skills),
    ("core competencies", SectionType::Skills),
    ("skills", SectionType::Skills),
    ("projects", SectionType::Custom),
    ("languages", SectionType::Custom),
    ("certifications", SectionType::Custom),
];

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap());

static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{7,}\d").unwrap());

static RE_LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[\w-]+\.)?linkedin\.com/in/[\w-]+/?").unwrap()
});

static RE_DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{4}.*\d{4}|present|current").unwrap());

static RE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-=*_]{3,}$").unwrap());

/// Parses resume text or saved JSON into a document. Never fails.
pub fn parse_markdown_to_resume_data(input: &str) -> ResumeDocument {
    if let Some(doc) = parse_json_document(input) {
        debug!(sections = doc.sections.len(), "Parsed resume via JSON fast path");
        return doc;
    }

    let mut doc = LineParser::default().run(input);

    if doc.sections.is_empty() {
        debug!("No sections recognised; wrapping input as a single summary");
        doc.sections.push(Section {
            section_type: SectionType::Summary,
            title: Some(FALLBACK_SECTION_TITLE.to_string()),
            content: SectionContent::Text(input.trim().to_string()),
        });
    }

    if doc.personal_info.name.is_empty() {
        doc.personal_info.name = DEFAULT_NAME.to_string();
    }

    debug!(
        sections = doc.sections.len(),
        name = %doc.personal_info.name,
        "Parsed resume via line parser"
    );
    doc
}

/// JSON fast path. Requires a top-level object with `personalInfo` and a
/// `sections` array that also deserializes into the typed model; anything
/// less falls through to the line parser.
fn parse_json_document(input: &str) -> Option<ResumeDocument> {
    let body = strip_json_fences(input);
    if !(body.starts_with('{') && body.ends_with('}')) {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if value.get("personalInfo").is_none() || !value.get("sections").is_some_and(|s| s.is_array())
    {
        return None;
    }

    match serde_json::from_value::<ResumeDocument>(value) {
        Ok(mut doc) => {
            if doc.personal_info.name.trim().is_empty() {
                doc.personal_info.name = DEFAULT_NAME.to_string();
            }
            Some(doc)
        }
        Err(e) => {
            debug!(error = %e, "Resume JSON has the right keys but the wrong shape");
            None
        }
    }
}

/// Resolves a heading to a section type: exact keyword, then substring, then custom.
pub fn section_type_for_title(title: &str) -> SectionType {
    let key = title.trim().trim_end_matches(':').trim().to_lowercase();
    exact_keyword(&key)
        .or_else(|| {
            SECTION_KEYWORDS
                .iter()
                .find(|(keyword, _)| key.contains(keyword))
                .map(|(_, section_type)| *section_type)
        })
        .unwrap_or(SectionType::Custom)
}

fn exact_keyword(key: &str) -> Option<SectionType> {
    SECTION_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == key)
        .map(|(_, section_type)| *section_type)
}

/// Returns the heading text if `line` opens a new section.
fn section_header(line: &str) -> Option<&str> {
    if let Some(title) = line.strip_prefix("## ") {
        return Some(title.trim());
    }

    let stripped = line.trim_end_matches(':').trim();
    let len = stripped.chars().count();
    let is_uppercase_line = (UPPERCASE_HEADER_MIN_CHARS..=UPPERCASE_HEADER_MAX_CHARS)
        .contains(&len)
        && stripped.chars().any(char::is_alphabetic)
        && stripped
            .chars()
            .all(|c| c == ' ' || (c.is_alphabetic() && c.is_uppercase()));

    if is_uppercase_line || exact_keyword(&stripped.to_lowercase()).is_some() {
        Some(stripped)
    } else {
        None
    }
}

fn is_email_like(line: &str) -> bool {
    RE_EMAIL.is_match(line)
}

fn find_phone(line: &str) -> Option<String> {
    RE_PHONE
        .find_iter(line)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
        })
        .map(str::to_string)
}

fn looks_like_name(line: &str) -> bool {
    let len = line.chars().count();
    len > 2
        && len < 50
        && line.chars().next().is_some_and(char::is_uppercase)
        && !is_email_like(line)
        && find_phone(line).is_none()
        && exact_keyword(&line.trim_end_matches(':').trim().to_lowercase()).is_none()
}

fn bullet_text(line: &str) -> Option<&str> {
    line.strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| line.strip_prefix('*'))
        .map(str::trim)
}

/// `*Subtitle | Date*` or `*Subtitle*`, but not a `* bullet`.
fn item_meta(line: &str) -> Option<&str> {
    if line.len() < 3 || line.starts_with("* ") {
        return None;
    }
    line.strip_prefix('*')
        .and_then(|l| l.strip_suffix('*'))
        .map(|l| l.trim_matches('*').trim())
}

/// Cursor state for the line-oriented pass.
#[derive(Default)]
struct LineParser {
    info: PersonalInfo,
    sections: Vec<Section>,
    section: Option<Section>,
    item: Option<Item>,
    name_from_heading: bool,
    header_seen: bool,
}

impl LineParser {
    fn run(mut self, input: &str) -> ResumeDocument {
        for (index, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || RE_SEPARATOR.is_match(line) {
                continue;
            }
            self.line(index, line);
        }

        self.flush_section();
        for section in &mut self.sections {
            if let SectionContent::Text(text) = &mut section.content {
                *text = text.trim().to_string();
            }
        }

        ResumeDocument {
            personal_info: self.info,
            sections: self.sections,
        }
    }

    /// No section open or flushed yet, implicit summary included.
    fn in_preamble(&self) -> bool {
        self.section.is_none() && self.sections.is_empty()
    }

    fn line(&mut self, index: usize, line: &str) {
        if !self.header_seen && index < CONTACT_SCAN_LINES {
            self.capture_contact(line);
        }

        if let Some(heading) = line.strip_prefix("# ") {
            if self.name_from_heading {
                self.body(heading.trim());
            } else {
                self.info.name = heading.trim().to_string();
                self.name_from_heading = true;
            }
            return;
        }

        if self.info.name.is_empty()
            && self.in_preamble()
            && index < NAME_SCAN_LINES
            && looks_like_name(line)
        {
            self.info.name = line.to_string();
            return;
        }

        if let Some(title) = section_header(line) {
            self.open_section(title);
            return;
        }

        if let Some(title) = line.strip_prefix("### ") {
            if self.has_item_section() {
                self.flush_item();
                self.item = Some(Item::titled(title.trim()));
            } else {
                self.body(title.trim());
            }
            return;
        }

        if let Some(meta) = item_meta(line) {
            match self.item.as_mut() {
                Some(item) => {
                    match meta.split_once('|') {
                        Some((subtitle, date)) => {
                            set_if_present(&mut item.subtitle, subtitle);
                            set_if_present(&mut item.date, date);
                        }
                        None => set_if_present(&mut item.subtitle, meta),
                    }
                }
                None => self.body(meta),
            }
            return;
        }

        match bullet_text(line) {
            Some("") => {}
            Some(bullet) => self.bullet(bullet),
            None => self.body(line),
        }
    }

    fn capture_contact(&mut self, line: &str) {
        if self.info.email.is_none() {
            if let Some(m) = RE_EMAIL.find(line) {
                self.info.email = Some(m.as_str().to_string());
            }
        }
        if self.info.phone.is_none() {
            self.info.phone = find_phone(line);
        }
        if self.info.linkedin.is_none() {
            if let Some(m) = RE_LINKEDIN.find(line) {
                self.info.linkedin = Some(m.as_str().to_string());
            }
        }
    }

    fn has_item_section(&self) -> bool {
        self.section.as_ref().is_some_and(|s| !s.content.is_text())
    }

    fn open_section(&mut self, title: &str) {
        self.flush_section();
        self.header_seen = true;
        let section_type = section_type_for_title(title);
        debug!(title, section_type = section_type.as_str(), "Opened section");
        self.section = Some(Section::new(section_type, title));
    }

    fn flush_item(&mut self) {
        let Some(item) = self.item.take() else {
            return;
        };
        if let Some(items) = self.section.as_mut().and_then(|s| s.content.items_mut()) {
            items.push(item);
        }
    }

    fn flush_section(&mut self) {
        self.flush_item();
        if let Some(section) = self.section.take() {
            self.sections.push(section);
        }
    }

    /// Opens the implicit summary for text that follows a name but precedes
    /// any heading. Returns false when there is nowhere to put the text.
    fn ensure_section(&mut self) -> bool {
        if self.section.is_some() {
            return true;
        }
        if self.info.name.is_empty() {
            return false;
        }
        self.section = Some(Section::new(SectionType::Summary, IMPLICIT_SUMMARY_TITLE));
        true
    }

    fn bullet(&mut self, text: &str) {
        if let Some(item) = self.item.as_mut() {
            item.bullets.get_or_insert_with(Vec::new).push(text.to_string());
            return;
        }
        if !self.ensure_section() {
            return;
        }
        let Some(section) = self.section.as_mut() else {
            return;
        };
        match &mut section.content {
            SectionContent::Text(content) => push_line(content, text),
            SectionContent::Items(_) => {
                let mut item = Item::titled(PLACEHOLDER_ITEM_TITLE);
                item.bullets = Some(vec![text.to_string()]);
                self.item = Some(item);
            }
        }
    }

    fn body(&mut self, text: &str) {
        if !self.ensure_section() {
            return;
        }
        let Some(section) = self.section.as_mut() else {
            return;
        };
        match &mut section.content {
            SectionContent::Text(content) => push_line(content, text),
            SectionContent::Items(_) => match self.item.as_mut() {
                Some(item)
                    if item.date.is_none()
                        && text.chars().count() < DATE_LINE_MAX_CHARS
                        && RE_DATE_RANGE.is_match(text) =>
                {
                    item.date = Some(text.to_string());
                }
                Some(item) => {
                    let description = item.description.get_or_insert_with(String::new);
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(text);
                }
                None => self.item = Some(Item::titled(text)),
            },
        }
    }
}

fn push_line(content: &mut String, line: &str) {
    content.push_str(line);
    content.push('\n');
}

fn set_if_present(slot: &mut Option<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}
