use crate::error::Result;
use crate::text_processor;
use crate::utils;
use serde_json::{json, Value};

/// Parse plain text file
///
/// The raw text is kept verbatim; `lines` holds the trimmed, non-empty
/// lines in order.
pub fn parse_txt(content: &[u8]) -> Result<Value> {
    let text = utils::decode_utf8(content)?;
    let lines = text_processor::non_empty_lines(&text);

    Ok(json!({
        "content": text,
        "lines": lines,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;

    #[test]
    fn test_parse_txt_keeps_raw_text() {
        let value = parse_txt(b"  Merhaba  \n\n\tDunya\r\n").unwrap();
        assert_eq!(value["content"], "  Merhaba  \n\n\tDunya\r\n");
        assert_eq!(value["lines"], json!(["Merhaba", "Dunya"]));
    }

    #[test]
    fn test_parse_txt_empty() {
        let value = parse_txt(b"").unwrap();
        assert_eq!(value, json!({"content": "", "lines": []}));
    }

    #[test]
    fn test_parse_txt_rejects_invalid_utf8() {
        let err = parse_txt(b"caf\xE9").unwrap_err();
        assert!(matches!(err, DocumentError::EncodingError(_)));
    }
}
