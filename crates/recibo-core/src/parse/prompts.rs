//! Prompts for the OpenAI receipt parser.

/// System prompt pinning the parser to a strict JSON-only contract.
pub const PARSE_SYSTEM_PROMPT: &str = "You are an expert receipt parsing assistant. \
You respond only with a valid JSON object containing exactly the requested fields, \
with no conversational text around it.";

/// Build the user prompt for one receipt's extracted text.
pub fn build_parse_prompt(text: &str) -> String {
    format!(
        r#"Extract the following fields from the receipt text below:
- "RecipientOrgName": The full name of the organization that received the donation/payment. If not found, use "UNKNOWN".
- "Amount": The total donation or payment amount. Provide only the numerical value, without currency symbols or commas. If multiple amounts are present, identify the final total. If not found, use "UNKNOWN".
- "Date": The date of the receipt or donation, formatted as MM.DD.YYYY (e.g. 01.15.2023). If not found, use "UNKNOWN".

Your response MUST be a valid JSON object containing ONLY the requested fields.

Here is the receipt text to parse:
---
{}
---

Example of expected JSON output:
{{
  "RecipientOrgName": "Some Charity Foundation",
  "Amount": "125.50",
  "Date": "03.22.2023"
}}"#,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_receipt_text() {
        let prompt = build_parse_prompt("DONATION RECEIPT\nRed Cross\n$125.50");
        assert!(prompt.contains("Red Cross"));
        assert!(prompt.contains("RecipientOrgName"));
        assert!(prompt.contains("MM.DD.YYYY"));
    }
}
