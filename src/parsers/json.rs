use crate::error::Result;
use crate::utils;
use serde_json::Value;

/// Parse JSON content
///
/// The parsed value is returned as-is, without any wrapping.
pub fn parse_json(content: &[u8]) -> Result<Value> {
    let value = serde_json::from_slice(utils::strip_utf8_bom(content))?;
    Ok(value)
}
