//! Recover the JSON payload from free-form model output.

use super::types::ParseError;
use serde_json::Value;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Locate the JSON block inside model output.
///
/// A ```` ```json ```` fence wins over a bare fence; text without fences is used as-is. An
/// unterminated fence runs to the end of the text.
pub fn extract_json_block(raw: &str) -> &str {
    let text = raw.trim();
    let block = if let Some((_, rest)) = text.split_once(JSON_FENCE) {
        up_to_fence(rest)
    } else if let Some((_, rest)) = text.split_once(FENCE) {
        up_to_fence(rest)
    } else {
        text
    };
    block.trim()
}

fn up_to_fence(text: &str) -> &str {
    text.split_once(FENCE).map_or(text, |(block, _)| block)
}

/// Decode the JSON payload embedded in model output.
pub fn parse_response(raw: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(extract_json_block(raw))?)
}
