use serde::{Deserialize, Serialize};

/// Title used when nothing in the posting looks like a job title.
pub const DEFAULT_JOB_TITLE: &str = "Job Opportunity";

/// Title/company pair inferred from a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Whether a job URL points at a site that blocks automated fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionCheck {
    pub is_restricted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RestrictionCheck {
    pub fn allowed() -> Self {
        Self {
            is_restricted: false,
            message: None,
        }
    }

    pub fn restricted(message: impl Into<String>) -> Self {
        Self {
            is_restricted: true,
            message: Some(message.into()),
        }
    }
}
