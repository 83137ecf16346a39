use serde::{Deserialize, Serialize};

/// Placeholder used when no name could be recovered from the input.
pub const DEFAULT_NAME: &str = "Resume";

/// Canonical in-memory resume. This is also the persisted JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl PersonalInfo {
    /// Mutable handle to an optional contact field by its JSON name.
    /// `name` is not included because it is never optional.
    pub fn optional_field_mut(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "title" => Some(&mut self.title),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "location" => Some(&mut self.location),
            "linkedin" => Some(&mut self.linkedin),
            "website" => Some(&mut self.website),
            _ => None,
        }
    }
}

/// Closed set of section kinds. Unknown tags from stored JSON read as `Custom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    #[default]
    #[serde(other)]
    Custom,
}

impl SectionType {
    /// Summary and skills hold prose; everything else holds a list of items.
    pub fn default_content(self) -> SectionContent {
        match self {
            SectionType::Summary | SectionType::Skills => SectionContent::Text(String::new()),
            _ => SectionContent::Items(Vec::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Header => "header",
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type", default)]
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: SectionContent,
}

impl Section {
    pub fn new(section_type: SectionType, title: impl Into<String>) -> Self {
        Self {
            section_type,
            title: Some(title.into()),
            content: section_type.default_content(),
        }
    }
}

/// Section body. On the wire this is either a bare string or an array of items,
/// so the variant is fixed by whichever shape the section was created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    Items(Vec<Item>),
}

impl SectionContent {
    pub fn is_text(&self) -> bool {
        matches!(self, SectionContent::Text(_))
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<Item>> {
        match self {
            SectionContent::Items(items) => Some(items),
            SectionContent::Text(_) => None,
        }
    }

    /// True when `other` has the same shape, i.e. may replace `self` in place.
    pub fn same_shape(&self, other: &SectionContent) -> bool {
        self.is_text() == other.is_text()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

impl Item {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}
