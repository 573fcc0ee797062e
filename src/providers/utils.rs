use serde_json::Value;

/// Joins every `text` content block of a messages response.
///
/// Non-text blocks (tool use, thinking) are skipped. The result is trimmed and
/// may be empty when the response carried no text at all.
pub fn joined_text(response: &Value) -> String {
    let Some(blocks) = response.get("content").and_then(Value::as_array) else {
        return String::new();
    };

    blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
