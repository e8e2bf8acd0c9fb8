//! Helpers for parsing model responses.
//!
//! Chat models frequently wrap JSON in markdown code fences even when
//! told not to; strip them before handing the payload to serde.

use serde_json::Value;

/// Extract the JSON payload from a chat completion's content string,
/// stripping ```` ```json ```` / ```` ``` ```` fences when present.
pub fn extract_json_payload(content: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_code_fences(content))
}

fn strip_code_fences(content: &str) -> &str {
    if let Some(rest) = content.split_once("```json").map(|(_, rest)| rest) {
        if let Some((inner, _)) = rest.split_once("```") {
            return inner.trim();
        }
        return rest.trim();
    }
    if content.contains("```") {
        let parts: Vec<&str> = content.split("```").collect();
        if parts.len() > 2 {
            return parts[1].trim();
        }
    }
    content.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let value = extract_json_payload(r#"{"confidence_score": 0.9}"#).unwrap();
        assert_eq!(value["confidence_score"], 0.9);
    }

    #[test]
    fn strips_json_fence() {
        let content = "```json\n{\"rooms\": []}\n```";
        let value = extract_json_payload(content).unwrap();
        assert!(value["rooms"].as_array().unwrap().is_empty());
    }

    #[test]
    fn strips_anonymous_fence() {
        let content = "Here you go:\n```\n{\"rooms\": []}\n```\nDone.";
        let value = extract_json_payload(content).unwrap();
        assert!(value.get("rooms").is_some());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(extract_json_payload("not json at all").is_err());
        assert!(extract_json_payload("```json\n{broken\n```").is_err());
    }
}
