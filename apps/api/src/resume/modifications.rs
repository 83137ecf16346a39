//! Modification applier. Folds a batch of positional edits over a resume.
//!
//! Each modification is applied to a fresh copy of the document produced by
//! the previous one, so indices always refer to the state left by earlier
//! edits in the batch. A modification that does not fit the current document
//! is skipped and the rest of the batch still applies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::modification::{ModAction, ModTarget, Modification};
use crate::models::resume::{Item, PersonalInfo, ResumeDocument, Section, SectionContent, SectionType};

/// Why a single modification was skipped.
#[derive(Debug, Error, PartialEq)]
pub enum ModificationError {
    #[error("{action:?} is not supported for target {target:?}")]
    Unsupported { action: ModAction, target: ModTarget },

    #[error("{what} index {index:?} is out of bounds (length {len})")]
    OutOfBounds {
        what: &'static str,
        index: Option<usize>,
        len: usize,
    },

    #[error("missing required field '{0}'")]
    Missing(&'static str),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("section {0} holds text, not items")]
    TextSection(usize),

    #[error("content shape of section {0} cannot change")]
    ShapeChange(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedModification {
    /// Position of the modification in the submitted batch.
    pub index: usize,
    pub reason: String,
}

/// Result of applying a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub document: ResumeDocument,
    pub applied: usize,
    pub skipped: Vec<SkippedModification>,
}

/// Applies `modifications` in order, each against the result of the previous one.
pub fn apply_modifications(doc: &ResumeDocument, modifications: &[Modification]) -> ApplyOutcome {
    let initial = ApplyOutcome {
        document: doc.clone(),
        applied: 0,
        skipped: Vec::new(),
    };

    modifications
        .iter()
        .enumerate()
        .fold(initial, |mut outcome, (index, modification)| {
            let mut next = outcome.document.clone();
            match apply_modification(&mut next, modification) {
                Ok(()) => {
                    debug!(index, action = ?modification.action, target = ?modification.target, "Applied modification");
                    outcome.document = next;
                    outcome.applied += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping modification");
                    outcome.skipped.push(SkippedModification {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
            outcome
        })
}

/// Applies one modification in place. On error `doc` may be partially edited;
/// [`apply_modifications`] only ever passes a scratch copy.
pub fn apply_modification(
    doc: &mut ResumeDocument,
    m: &Modification,
) -> Result<(), ModificationError> {
    match m.target {
        ModTarget::PersonalInfo => apply_to_personal_info(&mut doc.personal_info, m),
        ModTarget::Section => apply_to_sections(&mut doc.sections, m),
        ModTarget::Item => apply_to_items(doc, m),
        ModTarget::Bullet => apply_to_bullets(doc, m),
        ModTarget::Unknown => Err(unsupported(m)),
    }
}

fn apply_to_personal_info(info: &mut PersonalInfo, m: &Modification) -> Result<(), ModificationError> {
    match m.action {
        // Adding a contact field is the same as setting it; the name always exists.
        ModAction::Add | ModAction::Update => {
            let field = m.field.as_deref().ok_or(ModificationError::Missing("field"))?;
            let value = value_string(m)?;
            if field == "name" {
                if m.action == ModAction::Add {
                    return Err(unsupported(m));
                }
                if value.trim().is_empty() {
                    return Err(ModificationError::InvalidValue("name cannot be empty".to_string()));
                }
                info.name = value;
            } else {
                *contact_field(info, field)? = Some(value);
            }
            Ok(())
        }
        ModAction::Delete => {
            let field = m.field.as_deref().ok_or(ModificationError::Missing("field"))?;
            *contact_field(info, field)? = None;
            Ok(())
        }
        ModAction::Replace => {
            let replacement: PersonalInfo = value_as(m)?;
            if replacement.name.trim().is_empty() {
                return Err(ModificationError::InvalidValue("name cannot be empty".to_string()));
            }
            *info = replacement;
            Ok(())
        }
        _ => Err(unsupported(m)),
    }
}

fn contact_field<'a>(
    info: &'a mut PersonalInfo,
    field: &str,
) -> Result<&'a mut Option<String>, ModificationError> {
    info.optional_field_mut(field)
        .ok_or_else(|| ModificationError::InvalidValue(format!("unknown personalInfo field '{field}'")))
}

fn apply_to_sections(sections: &mut Vec<Section>, m: &Modification) -> Result<(), ModificationError> {
    match m.action {
        ModAction::Add => {
            let section = section_payload(m)?;
            let at = insert_position("section", m.section_index, sections.len())?;
            sections.insert(at, section);
        }
        ModAction::Update => {
            let at = position("section", m.section_index, sections.len())?;
            update_section(&mut sections[at], at, m)?;
        }
        ModAction::Delete => {
            let at = position("section", m.section_index, sections.len())?;
            sections.remove(at);
        }
        ModAction::Move => move_within(sections, "section", m.section_index, m.to_index)?,
        ModAction::Replace => {
            let at = position("section", m.section_index, sections.len())?;
            let section = section_payload(m)?;
            if !sections[at].content.same_shape(&section.content) {
                return Err(ModificationError::ShapeChange(at));
            }
            sections[at] = section;
        }
        ModAction::Unknown => return Err(unsupported(m)),
    }
    Ok(())
}

fn update_section(section: &mut Section, at: usize, m: &Modification) -> Result<(), ModificationError> {
    match m.field.as_deref().ok_or(ModificationError::Missing("field"))? {
        "title" => section.title = value_as::<Option<String>>(m)?,
        "type" => section.section_type = value_as::<SectionType>(m)?,
        "content" => {
            let content: SectionContent = value_as(m)?;
            if !section.content.same_shape(&content) {
                return Err(ModificationError::ShapeChange(at));
            }
            section.content = content;
        }
        other => {
            return Err(ModificationError::InvalidValue(format!(
                "unknown section field '{other}'"
            )))
        }
    }
    Ok(())
}

fn apply_to_items(doc: &mut ResumeDocument, m: &Modification) -> Result<(), ModificationError> {
    let items = section_items(doc, m.section_index)?;

    match m.action {
        ModAction::Add => {
            let item: Item = value_as(m)?;
            let at = insert_position("item", m.item_index, items.len())?;
            items.insert(at, item);
        }
        ModAction::Update => {
            let at = position("item", m.item_index, items.len())?;
            update_item(&mut items[at], m)?;
        }
        ModAction::Delete => {
            let at = position("item", m.item_index, items.len())?;
            items.remove(at);
        }
        ModAction::Move => move_within(items, "item", m.item_index, m.to_index)?,
        ModAction::Replace => {
            let at = position("item", m.item_index, items.len())?;
            items[at] = value_as(m)?;
        }
        ModAction::Unknown => return Err(unsupported(m)),
    }
    Ok(())
}

fn update_item(item: &mut Item, m: &Modification) -> Result<(), ModificationError> {
    match m.field.as_deref().ok_or(ModificationError::Missing("field"))? {
        "title" => item.title = value_string(m)?,
        "subtitle" => item.subtitle = value_as(m)?,
        "date" => item.date = value_as(m)?,
        "description" => item.description = value_as(m)?,
        "bullets" => item.bullets = value_as(m)?,
        other => {
            return Err(ModificationError::InvalidValue(format!(
                "unknown item field '{other}'"
            )))
        }
    }
    Ok(())
}

fn apply_to_bullets(doc: &mut ResumeDocument, m: &Modification) -> Result<(), ModificationError> {
    let items = section_items(doc, m.section_index)?;
    let item_at = position("item", m.item_index, items.len())?;
    let bullets = items[item_at].bullets.get_or_insert_with(Vec::new);

    match m.action {
        ModAction::Add => {
            let text = value_string(m)?;
            let at = insert_position("bullet", m.bullet_index, bullets.len())?;
            bullets.insert(at, text);
        }
        ModAction::Update | ModAction::Replace => {
            let at = position("bullet", m.bullet_index, bullets.len())?;
            bullets[at] = value_string(m)?;
        }
        ModAction::Delete => {
            let at = position("bullet", m.bullet_index, bullets.len())?;
            bullets.remove(at);
        }
        ModAction::Move => move_within(bullets, "bullet", m.bullet_index, m.to_index)?,
        ModAction::Unknown => return Err(unsupported(m)),
    }
    Ok(())
}

/// Item list of the addressed section; text sections have none.
fn section_items(
    doc: &mut ResumeDocument,
    section_index: Option<usize>,
) -> Result<&mut Vec<Item>, ModificationError> {
    let at = position("section", section_index, doc.sections.len())?;
    doc.sections[at]
        .content
        .items_mut()
        .ok_or(ModificationError::TextSection(at))
}

fn position(what: &'static str, index: Option<usize>, len: usize) -> Result<usize, ModificationError> {
    match index {
        Some(i) if i < len => Ok(i),
        _ => Err(ModificationError::OutOfBounds { what, index, len }),
    }
}

/// Insertion point: the given index (up to and including `len`) or the end.
fn insert_position(
    what: &'static str,
    index: Option<usize>,
    len: usize,
) -> Result<usize, ModificationError> {
    match index {
        None => Ok(len),
        Some(i) if i <= len => Ok(i),
        Some(_) => Err(ModificationError::OutOfBounds { what, index, len }),
    }
}

/// Splice semantics: remove at `from`, then insert at `to` in the shortened list.
fn move_within<T>(
    list: &mut Vec<T>,
    what: &'static str,
    from: Option<usize>,
    to: Option<usize>,
) -> Result<(), ModificationError> {
    let from = position(what, from, list.len())?;
    let to = to.ok_or(ModificationError::Missing("toIndex"))?;
    let to = position(what, Some(to), list.len())?;
    let element = list.remove(from);
    list.insert(to, element);
    Ok(())
}

fn section_payload(m: &Modification) -> Result<Section, ModificationError> {
    match &m.new_section {
        Some(section) => Ok(section.clone()),
        None => value_as(m),
    }
}

fn value_as<T: DeserializeOwned>(m: &Modification) -> Result<T, ModificationError> {
    serde_json::from_value(m.value.clone())
        .map_err(|e| ModificationError::InvalidValue(e.to_string()))
}

fn value_string(m: &Modification) -> Result<String, ModificationError> {
    value_as::<String>(m)
}

fn unsupported(m: &Modification) -> ModificationError {
    ModificationError::Unsupported {
        action: m.action,
        target: m.target,
    }
}
