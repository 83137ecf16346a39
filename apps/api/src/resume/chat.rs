//! Decodes the chat assistant's reply into a message and a modification batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::modification::Modification;
use crate::text::fences::strip_json_fences;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub modifications: Vec<Modification>,
}

/// Accepts `{"message", "modifications"}`, a bare modification array, either
/// optionally fenced or surrounded by prose. Malformed entries are dropped;
/// text with no JSON at all becomes the message.
pub fn parse_chat_response(text: &str) -> ChatResponse {
    let body = strip_json_fences(text);

    let Some(value) = parse_json_value(body) else {
        return ChatResponse {
            message: text.trim().to_string(),
            modifications: Vec::new(),
        };
    };

    match value {
        Value::Object(map) => ChatResponse {
            message: map
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim()
                .to_string(),
            modifications: map
                .get("modifications")
                .and_then(|v| v.as_array())
                .map(|entries| decode_modifications(entries))
                .unwrap_or_default(),
        },
        Value::Array(entries) => ChatResponse {
            message: String::new(),
            modifications: decode_modifications(&entries),
        },
        _ => ChatResponse {
            message: text.trim().to_string(),
            modifications: Vec::new(),
        },
    }
}

/// Whole-body JSON, or failing that the outermost `{...}` span inside prose.
fn parse_json_value(body: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&body[start..=end]).ok()
}

/// Decodes each entry on its own, dropping the ones that do not fit.
pub fn decode_modifications(entries: &[Value]) -> Vec<Modification> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<Modification>(entry.clone())
                .map_err(|e| warn!(index, error = %e, "Dropping malformed modification"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::modification::{ModAction, ModTarget};

    const FENCED_REPLY: &str = r#"```json
{
  "message": "Tightened your summary and removed the old internship.",
  "modifications": [
    {"action": "update", "target": "section", "sectionIndex": 0, "field": "content", "value": "Staff engineer."},
    {"action": "delete", "target": "item", "sectionIndex": 1, "itemIndex": 2},
    {"target": "bullet"}
  ]
}
```"#;

    #[test]
    fn test_fenced_object_reply() {
        let reply = parse_chat_response(FENCED_REPLY);
        assert_eq!(
            reply.message,
            "Tightened your summary and removed the old internship."
        );
        assert_eq!(reply.modifications.len(), 2);
        assert_eq!(reply.modifications[1].action, ModAction::Delete);
        assert_eq!(reply.modifications[1].target, ModTarget::Item);
        assert_eq!(reply.modifications[1].item_index, Some(2));
    }

    #[test]
    fn test_bare_array_reply() {
        let reply =
            parse_chat_response(r#"[{"action": "delete", "target": "section", "sectionIndex": 0}]"#);
        assert!(reply.message.is_empty());
        assert_eq!(reply.modifications.len(), 1);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let reply = parse_chat_response(
            r#"Sure! Here you go: {"message": "Done", "modifications": []} Let me know."#,
        );
        assert_eq!(reply.message, "Done");
        assert!(reply.modifications.is_empty());
    }

    #[test]
    fn test_plain_prose_reply() {
        let reply = parse_chat_response("  Your resume already looks strong.  ");
        assert_eq!(reply.message, "Your resume already looks strong.");
        assert!(reply.modifications.is_empty());
    }
}
