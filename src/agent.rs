// AI parameter value generation for unauthcheck
// Asks a Mistral chat-completions endpoint for plausible example values

use crate::models::{Parameter, ValueSet};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const COMPLETIONS_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const MODEL: &str = "mistral-small-latest";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Value used whenever generation fails or the reply cannot be parsed.
/// A failed generation must never abort the scan.
pub const FALLBACK_VALUE: &str = "test";

/// Two value sets for an endpoint, plus whether any fallback was substituted
/// so the report can note it.
pub struct GeneratedSets {
    pub set_1: ValueSet,
    pub set_2: ValueSet,
    pub used_fallback: bool,
}

pub struct ValueAgent {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ValueAgent {
    /// The API key is passed in explicitly; the agent never reads the
    /// environment itself.
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, COMPLETIONS_URL.to_string())
    }

    /// Same agent against a different completions endpoint. Tests point this
    /// at an unroutable address to exercise the fallback path.
    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint,
        }
    }

    /// Generate both value sets for an endpoint's parameters. Each parameter
    /// is queried independently; there is no caching or deduplication across
    /// endpoints.
    pub async fn generate_value_sets(&self, params: &[Parameter]) -> GeneratedSets {
        let mut set_1 = ValueSet::new();
        let mut set_2 = ValueSet::new();
        let mut used_fallback = false;

        for p in params {
            match self.suggest_values(p).await {
                Some((a, b)) => {
                    set_1.insert(p.name.clone(), a);
                    set_2.insert(p.name.clone(), b);
                }
                None => {
                    set_1.insert(p.name.clone(), FALLBACK_VALUE.to_string());
                    set_2.insert(p.name.clone(), FALLBACK_VALUE.to_string());
                    used_fallback = true;
                }
            }
        }

        GeneratedSets {
            set_1,
            set_2,
            used_fallback,
        }
    }

    /// Ask for two realistic values for one parameter. Any failure (request,
    /// timeout, unexpected response shape) yields None and the caller
    /// substitutes the fallback.
    async fn suggest_values(&self, param: &Parameter) -> Option<(String, String)> {
        let prompt = format!(
            "Generate two distinct realistic example values for an API parameter.\n\
             Name: {}\n\
             Type: {}\n\
             Description: {}\n\
             Return the two values on separate lines, nothing else.",
            param.name, param.schema_type, param.description
        );

        let payload = serde_json::json!({
            "model": MODEL,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.3,
            "max_tokens": 100
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(GENERATION_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;

        let json: Value = resp.json().await.ok()?;
        let content = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())?;

        parse_suggestions(content)
    }
}

/// Permissively parse two suggested values out of free text. Tolerates
/// numbering, bullets, quoting, and surrounding prose: when any line carries
/// a list marker, only marker-bearing lines count, so preamble prose like
/// "Here are two values:" cannot displace a real suggestion. A single usable
/// value is reused for both sets; no usable value at all yields None.
pub fn parse_suggestions(content: &str) -> Option<(String, String)> {
    let mut marked: Vec<String> = Vec::new();
    let mut plain: Vec<String> = Vec::new();

    for line in content.lines() {
        match strip_list_marker(line) {
            Some(rest) => {
                let cleaned = strip_quotes(rest);
                if !cleaned.is_empty() && !marked.contains(&cleaned) {
                    marked.push(cleaned);
                }
            }
            None => {
                let cleaned = strip_quotes(line.trim());
                if !cleaned.is_empty() && !plain.contains(&cleaned) {
                    plain.push(cleaned);
                }
            }
        }
    }

    let values = if marked.is_empty() { plain } else { marked };

    match values.len() {
        0 => None,
        1 => Some((values[0].clone(), values[0].clone())),
        _ => Some((values[0].clone(), values[1].clone())),
    }
}

// Strip a leading list marker ("1.", "2)", "-", "*") if the line has one
fn strip_list_marker(line: &str) -> Option<&str> {
    let s = line.trim();

    if let Some(rest) = s.strip_prefix(['-', '*', '•']) {
        return Some(rest.trim_start());
    }

    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return Some(stripped.trim_start());
        }
    }

    None
}

fn strip_quotes(s: &str) -> String {
    s.trim_matches(['"', '\'', '`']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_lines() {
        let parsed = parse_suggestions("alice@example.com\nbob@example.com");
        assert_eq!(
            parsed,
            Some(("alice@example.com".to_string(), "bob@example.com".to_string()))
        );
    }

    #[test]
    fn parse_numbered_list() {
        let parsed = parse_suggestions("1. user_42\n2. user_77");
        assert_eq!(parsed, Some(("user_42".to_string(), "user_77".to_string())));
    }

    #[test]
    fn parse_bulleted_and_quoted() {
        let parsed = parse_suggestions("- \"London\"\n- `Paris`");
        assert_eq!(parsed, Some(("London".to_string(), "Paris".to_string())));
    }

    #[test]
    fn parse_with_surrounding_prose() {
        // Marker-bearing lines win over the preamble and trailer prose
        let parsed = parse_suggestions("Here are two values:\n1) 12345\n2) 67890\nHope that helps!");
        assert_eq!(parsed, Some(("12345".to_string(), "67890".to_string())));
    }

    #[test]
    fn prose_preamble_does_not_displace_bulleted_values() {
        let parsed = parse_suggestions("Here are two values:\n- alice@example.com\n- bob@example.com");
        assert_eq!(
            parsed,
            Some(("alice@example.com".to_string(), "bob@example.com".to_string()))
        );
    }

    #[test]
    fn plain_lines_still_parse_without_markers() {
        let parsed = parse_suggestions("first-value\nsecond-value");
        assert_eq!(
            parsed,
            Some(("first-value".to_string(), "second-value".to_string()))
        );
    }

    #[test]
    fn parse_single_value_reused() {
        let parsed = parse_suggestions("just-one-value");
        assert_eq!(
            parsed,
            Some(("just-one-value".to_string(), "just-one-value".to_string()))
        );
    }

    #[test]
    fn parse_empty_reply() {
        assert_eq!(parse_suggestions(""), None);
        assert_eq!(parse_suggestions("   \n  \n"), None);
    }

    #[test]
    fn duplicate_lines_collapse_to_one() {
        let parsed = parse_suggestions("same\nsame");
        assert_eq!(parsed, Some(("same".to_string(), "same".to_string())));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_fallback_values() {
        use crate::models::{Parameter, ParameterLocation};

        // Port 1 refuses the connection, so every generation attempt fails
        let agent = ValueAgent::with_endpoint(
            "key".to_string(),
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
        );
        let params = vec![Parameter {
            name: "userId".to_string(),
            schema_type: "string".to_string(),
            description: "User identifier".to_string(),
            location: ParameterLocation::Query,
        }];

        let generated = agent.generate_value_sets(&params).await;
        assert!(generated.used_fallback);
        assert_eq!(generated.set_1.get("userId").map(String::as_str), Some(FALLBACK_VALUE));
        assert_eq!(generated.set_2.get("userId").map(String::as_str), Some(FALLBACK_VALUE));
    }
}
