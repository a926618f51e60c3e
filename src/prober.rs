// HTTP endpoint prober for unauthcheck
// Sends unauthenticated requests and records status + truncated body

use crate::error::Result;
use crate::models::{Endpoint, Parameter, ParameterLocation, ProbeOutcome, ValueSet};
use reqwest::header::HeaderName;
use reqwest::Client;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Response bodies are truncated to this many characters in the report
pub const BODY_LIMIT: usize = 2000;

pub struct Prober {
    client: Client,
}

impl Prober {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(PROBE_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Send one probe with the given value set. Deliberately no auth header:
    /// the question is whether the endpoint answers without one. Network and
    /// timeout errors become a NetworkFailure outcome, never an abort.
    pub async fn probe(&self, base_url: &str, endpoint: &Endpoint, values: &ValueSet) -> ProbeOutcome {
        let url = build_url(base_url, &endpoint.path, &endpoint.params, values);

        let mut req = self.client.request(endpoint.method.as_reqwest(), &url);

        let mut body = serde_json::Map::new();
        for p in &endpoint.params {
            let Some(value) = values.get(&p.name) else {
                continue;
            };
            match p.location {
                ParameterLocation::Path => {} // substituted in build_url
                ParameterLocation::Query => {
                    req = req.query(&[(&p.name, value)]);
                }
                ParameterLocation::Header => {
                    // Skip names that are not valid HTTP headers
                    if let Ok(name) = HeaderName::from_bytes(p.name.as_bytes()) {
                        req = req.header(name, value);
                    }
                }
                ParameterLocation::Body => {
                    body.insert(p.name.clone(), serde_json::Value::String(value.clone()));
                }
            }
        }
        if !body.is_empty() {
            req = req.json(&body);
        }

        match req.send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let text = resp.text().await.unwrap_or_default();
                ProbeOutcome::Success {
                    status,
                    body: clean_response_body(&text, BODY_LIMIT),
                }
            }
            Err(e) => ProbeOutcome::NetworkFailure {
                error: e.to_string(),
            },
        }
    }
}

/// Join base URL and path, substituting path-located values into their
/// `{name}` segments.
pub fn build_url(base_url: &str, path: &str, params: &[Parameter], values: &ValueSet) -> String {
    let base = base_url.trim_end_matches('/');
    let mut path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    for p in params {
        if p.location == ParameterLocation::Path {
            if let Some(value) = values.get(&p.name) {
                path = path.replace(&format!("{{{}}}", p.name), value);
            }
        }
    }

    format!("{}{}", base, path)
}

/// Pretty-print JSON bodies, then truncate for the CSV. Non-JSON text is
/// truncated as-is.
pub fn clean_response_body(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "<empty response>".to_string();
    }

    let rendered = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    };

    rendered.chars().take(limit).collect()
}
