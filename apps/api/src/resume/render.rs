//! Markdown rendering in the dialect the line parser reads back.
//!
//! The contact line goes above the `# name` heading: there the parser picks
//! up email and phone without turning the line into summary text.

use crate::models::resume::{Item, PersonalInfo, ResumeDocument, Section, SectionContent, SectionType};

pub fn render_markdown(doc: &ResumeDocument) -> String {
    let mut out = String::new();

    if let Some(contact) = contact_line(&doc.personal_info) {
        out.push_str(&contact);
        out.push('\n');
    }
    out.push_str(&format!("# {}\n", doc.personal_info.name));

    for section in &doc.sections {
        out.push('\n');
        render_section(&mut out, section);
    }

    out
}

fn contact_line(info: &PersonalInfo) -> Option<String> {
    let parts: Vec<&str> = [
        &info.title,
        &info.email,
        &info.phone,
        &info.location,
        &info.linkedin,
        &info.website,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .filter(|v| !v.trim().is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join(" | "))
}

fn default_title(section_type: SectionType) -> &'static str {
    match section_type {
        SectionType::Header => "Header",
        SectionType::Summary => "Summary",
        SectionType::Experience => "Experience",
        SectionType::Education => "Education",
        SectionType::Skills => "Skills",
        SectionType::Custom => "Additional Information",
    }
}

fn render_section(out: &mut String, section: &Section) {
    let title = section
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| default_title(section.section_type));
    out.push_str(&format!("## {title}\n"));

    match &section.content {
        SectionContent::Text(text) => {
            if !text.trim().is_empty() {
                out.push_str(text.trim());
                out.push('\n');
            }
        }
        SectionContent::Items(items) => {
            for item in items {
                render_item(out, item);
            }
        }
    }
}

fn render_item(out: &mut String, item: &Item) {
    out.push_str(&format!("### {}\n", item.title));

    match (item.subtitle.as_deref(), item.date.as_deref()) {
        (Some(subtitle), Some(date)) => out.push_str(&format!("*{subtitle} | {date}*\n")),
        (Some(subtitle), None) => out.push_str(&format!("*{subtitle}*\n")),
        (None, Some(date)) => out.push_str(&format!("*| {date}*\n")),
        (None, None) => {}
    }

    if let Some(description) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(description.trim());
        out.push('\n');
    }

    for bullet in item.bullets.iter().flatten() {
        out.push_str(&format!("- {bullet}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::parser::parse_markdown_to_resume_data;
    use serde_json::json;

    fn sample_doc() -> ResumeDocument {
        serde_json::from_value(json!({
            "personalInfo": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1 555 123 4567"
            },
            "sections": [
                {"type": "summary", "title": "Summary", "content": "Backend engineer.\nLoves Rust."},
                {"type": "experience", "title": "Experience", "content": [
                    {"title": "Engineer", "subtitle": "Acme", "date": "2020 - 2022",
                     "bullets": ["Cut p99 latency by 40%", "Led 3 migrations"]},
                    {"title": "Intern", "subtitle": "Initech"}
                ]},
                {"type": "skills", "title": "Skills", "content": "Rust, Go"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_render_layout() {
        let md = render_markdown(&sample_doc());
        assert!(md.starts_with("jane@example.com | +1 555 123 4567\n# Jane Doe\n"));
        assert!(md.contains("## Experience\n### Engineer\n*Acme | 2020 - 2022*\n- Cut p99 latency by 40%\n"));
        assert!(md.contains("### Intern\n*Initech*\n"));
        assert!(md.ends_with("## Skills\nRust, Go\n"));
    }

    #[test]
    fn test_render_then_parse_recovers_document() {
        let doc = sample_doc();
        let reparsed = parse_markdown_to_resume_data(&render_markdown(&doc));
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_untitled_section_uses_type_label() {
        let doc = ResumeDocument {
            personal_info: PersonalInfo {
                name: "A B".to_string(),
                ..Default::default()
            },
            sections: vec![Section {
                section_type: SectionType::Education,
                title: None,
                content: SectionContent::Items(vec![Item::titled("BSc")]),
            }],
        };
        assert!(render_markdown(&doc).contains("## Education\n### BSc\n"));
    }
}
