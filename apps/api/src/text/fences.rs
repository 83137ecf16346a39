/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"personalInfo\": {}}\n```";
        assert_eq!(strip_json_fences(input), "{\"personalInfo\": {}}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[{\"action\": \"delete\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"action\": \"delete\"}]");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"sections\": []}";
        assert_eq!(strip_json_fences(input), "{\"sections\": []}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}  ";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
