//! Locating a JSON object inside free-form model output.
//!
//! Models often wrap the requested JSON in prose or code fences. The scanner
//! walks the text tracking brace depth (ignoring braces inside JSON strings)
//! and requires exactly one balanced top-level object. An unclosed brace
//! only fails the scan when no object was completed before it.

use serde_json::Value;
use thiserror::Error;

/// Why a JSON object could not be extracted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("JSON object starting at byte {0} is never closed")]
    Unbalanced(usize),

    #[error("found {0} top-level JSON objects, expected exactly one")]
    Ambiguous(usize),

    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Find the single balanced top-level `{...}` span in `text`.
pub fn find_json_object(text: &str) -> Result<&str, ExtractError> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if depth == 0 {
            // Outside any object, quotes and stray closing braces are prose.
            if c == '{' {
                start = i;
                depth = 1;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    spans.push((start, i + c.len_utf8()));
                }
            }
            _ => {}
        }
    }

    // A trailing open brace after a complete object is prose, not a second object.
    if depth > 0 && spans.is_empty() {
        return Err(ExtractError::Unbalanced(start));
    }

    match spans.as_slice() {
        [] => Err(ExtractError::NoJsonObject),
        [(from, to)] => Ok(&text[*from..*to]),
        many => Err(ExtractError::Ambiguous(many.len())),
    }
}

/// Extract and parse the single JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let raw = find_json_object(text)?;
    serde_json::from_str(raw).map_err(|e| ExtractError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let text = r#"{"trends": []}"#;
        assert_eq!(find_json_object(text).unwrap(), text);
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let text = r#"Sure! Here's what I found:
```json
{"trends": [{"platform": "TikTok", "trend_name": "Sped-up edits"}]}
```
Let me know if you need more."#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["trends"][0]["platform"], "TikTok");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"Result: {"trends": [{"trend_name": "The {remix} era", "trend_description": "uses \"}\" a lot"}]} done"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["trends"][0]["trend_name"], "The {remix} era");
        assert_eq!(value["trends"][0]["trend_description"], "uses \"}\" a lot");
    }

    #[test]
    fn test_nested_objects() {
        let text = r#"x {"a": {"b": {"c": 1}}} y"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["a"]["b"]["c"], 1);
    }

    #[test]
    fn test_no_object() {
        assert_eq!(
            find_json_object("I could not find any trends, sorry."),
            Err(ExtractError::NoJsonObject)
        );
        assert_eq!(find_json_object(""), Err(ExtractError::NoJsonObject));
    }

    #[test]
    fn test_stray_closing_brace_in_prose_is_ignored() {
        let text = r#"oops } here: {"trends": []}"#;
        assert_eq!(find_json_object(text).unwrap(), r#"{"trends": []}"#);
    }

    #[test]
    fn test_trailing_open_brace_after_object_is_ignored() {
        let text = "{\"trends\":[{\"platform\":\"Spotify\",\"trend_name\":\"X\"}]}\nValues are approximate :{";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["trends"][0]["trend_name"], "X");
    }

    #[test]
    fn test_unbalanced_object() {
        let text = r#"Here: {"trends": [{"platform": "TikTok"}"#;
        assert_eq!(find_json_object(text), Err(ExtractError::Unbalanced(6)));
    }

    #[test]
    fn test_multiple_objects_are_ambiguous() {
        let text = r#"{"trends": []} and also {"trends": [1]}"#;
        assert_eq!(find_json_object(text), Err(ExtractError::Ambiguous(2)));
    }

    #[test]
    fn test_balanced_but_invalid_json() {
        let text = "{trends: [1, 2,]}";
        assert!(matches!(
            extract_json_object(text),
            Err(ExtractError::Json(_))
        ));
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let text = "Tendências 🎵 {\"trends\": [{\"trend_name\": \"Forró\"}]} fim";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["trends"][0]["trend_name"], "Forró");
    }
}
