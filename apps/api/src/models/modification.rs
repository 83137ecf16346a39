use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModAction {
    Add,
    Update,
    Delete,
    Move,
    Replace,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModTarget {
    PersonalInfo,
    Section,
    Item,
    Bullet,
    #[serde(other)]
    Unknown,
}

/// One positional edit against a resume document.
///
/// Indices are positions in the document as it stands after every earlier
/// modification in the same batch has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    pub action: ModAction,
    pub target: ModTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Payload for add/update/replace. Absent and `null` both read as `Null`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_section: Option<Section>,
}

#[cfg(test)]
impl Modification {
    pub fn new(action: ModAction, target: ModTarget) -> Self {
        Self {
            action,
            target,
            section_index: None,
            item_index: None,
            bullet_index: None,
            field: None,
            value: Value::Null,
            to_index: None,
            new_section: None,
        }
    }
}
