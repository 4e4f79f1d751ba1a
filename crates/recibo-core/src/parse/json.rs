//! Pulls the JSON payload out of a model reply.
//!
//! Replies are not guaranteed to be bare JSON: depending on the model and
//! prompt they arrive fenced in markdown or surrounded by conversational
//! text, and the parser has to cope with all of it.

/// Locate the JSON object inside `text`.
///
/// Candidates are tried in order of specificity: a ` ```json ` fence, any
/// plain ` ``` ` fence, then the outermost `{`..`}` span. Returns the trimmed
/// object source, or an error string when none match.
pub fn extract_json_object(text: &str) -> Result<String, String> {
    if let Some(fence) = text.find("```json") {
        let body = fence + "```json".len();
        if let Some(end) = text[body..].find("```") {
            return Ok(text[body..body + end].trim().to_string());
        }
    }

    if let Some(fence) = text.find("```") {
        let after_fence = fence + 3;
        // The opening fence line may carry a language tag; skip past it.
        let body = text[after_fence..]
            .find('\n')
            .map(|i| after_fence + i + 1)
            .unwrap_or(after_fence);
        if let Some(end) = text[body..].find("```") {
            return Ok(text[body..body + end].trim().to_string());
        }
    }

    if let Some(open) = text.find('{') {
        if let Some(close) = text.rfind('}') {
            return Ok(text[open..=close].to_string());
        }
    }

    Err("No JSON object found in response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_json_code_block() {
        let text = r#"Here is the result:
```json
{"RecipientOrgName": "Red Cross", "Amount": "125.50"}
```
Done."#;
        let result = extract_json_object(text).unwrap();
        assert!(result.starts_with('{'));
        assert!(result.contains("Red Cross"));
    }

    #[test]
    fn test_extract_from_plain_code_block() {
        let text = "```\n{\"Amount\": \"50\"}\n```";
        let result = extract_json_object(text).unwrap();
        assert_eq!(result, "{\"Amount\": \"50\"}");
    }

    #[test]
    fn test_extract_raw_object() {
        let text = r#"Sure! {"Date": "01.01.2024"} hope that helps"#;
        let result = extract_json_object(text).unwrap();
        assert_eq!(result, r#"{"Date": "01.01.2024"}"#);
    }

    #[test]
    fn test_no_json_is_an_error() {
        assert!(extract_json_object("I could not read the receipt.").is_err());
    }
}
