// OpenAPI/Swagger spec loader for unauthcheck
// Uses serde_json to walk OpenAPI 2.0 and 3.x documents

use crate::error::{Result, ScanError};
use crate::models::{Endpoint, Method, Parameter, ParameterLocation};
use serde_json::Value;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// A parsed spec: the resolved base URL plus the ordered endpoint list.
#[derive(Debug)]
pub struct LoadedSpec {
    pub base_url: String,
    pub endpoints: Vec<Endpoint>,
}

/// Fetch and parse a spec from a URL. If the document itself carries no base
/// URL, fall back to the spec URL minus its last path segment.
pub async fn load_from_url(url: &str) -> Result<LoadedSpec> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let resp = client.get(url).send().await?.error_for_status()?;
    let final_url = resp.url().clone();
    let text = resp.text().await?;
    let spec: Value = serde_json::from_str(&text)?;

    let base_url = extract_base_url(&spec).unwrap_or_else(|| {
        let s = final_url.as_str();
        match s.rsplit_once('/') {
            Some((head, _)) => head.to_string(),
            None => s.to_string(),
        }
    });

    Ok(LoadedSpec {
        base_url,
        endpoints: extract_endpoints(&spec),
    })
}

/// Read and parse a spec from a local file. A file-based spec must declare its
/// own base URL; there is no request URL to fall back to.
pub fn load_from_file(path: &str) -> Result<LoadedSpec> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ScanError::Load(format!("failed to read {}: {}", path, e)))?;
    let spec: Value = serde_json::from_str(&data)?;
    let base_url = extract_base_url(&spec).ok_or(ScanError::MissingBaseUrl)?;

    Ok(LoadedSpec {
        base_url,
        endpoints: extract_endpoints(&spec),
    })
}

/// Extract the base URL from the spec.
/// OpenAPI 3.x: servers[0].url with server-variable defaults substituted.
/// OpenAPI 2.0: schemes[0] + host + basePath (scheme defaults to https).
pub fn extract_base_url(spec: &Value) -> Option<String> {
    if let Some(url) = spec
        .get("servers")
        .and_then(|s| s.as_array())
        .and_then(|arr| arr.first())
        .and_then(server_with_vars)
    {
        return Some(url.trim_end_matches('/').to_string());
    }

    let host = spec.get("host").and_then(|h| h.as_str())?;
    let base_path = spec
        .get("basePath")
        .and_then(|b| b.as_str())
        .unwrap_or("");
    let scheme = spec
        .get("schemes")
        .and_then(|s| s.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.as_str())
        .unwrap_or("https");

    Some(format!("{}://{}{}", scheme, host, base_path).trim_end_matches('/').to_string())
}

// If the server URL contains variables like {env}, replace with defaults when available
fn server_with_vars(server: &Value) -> Option<String> {
    let url = server.get("url")?.as_str()?;
    let mut result = url.to_string();
    if let Some(vars) = server.get("variables").and_then(|v| v.as_object()) {
        for (k, v) in vars {
            if let Some(def) = v.get("default").and_then(|d| d.as_str()) {
                result = result.replace(&format!("{{{}}}", k), def);
            }
        }
    }
    Some(result)
}

/// Walk all path keys and, within each, all HTTP-method keys, producing the
/// ordered endpoint list. Non-method keys ("parameters", "summary") are
/// skipped; path-level parameters are merged into every operation.
pub fn extract_endpoints(spec: &Value) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    let Some(paths) = spec.get("paths").and_then(|p| p.as_object()) else {
        return endpoints;
    };

    for (path, methods) in paths {
        let Some(methods_map) = methods.as_object() else {
            continue;
        };

        let path_level: Vec<Parameter> = methods_map
            .get("parameters")
            .map(|p| collect_parameters(spec, p))
            .unwrap_or_default();

        for (method_key, details) in methods_map {
            let Some(method) = Method::from_spec_key(method_key) else {
                continue;
            };
            if !details.is_object() {
                continue;
            }

            let mut params = details
                .get("parameters")
                .map(|p| collect_parameters(spec, p))
                .unwrap_or_default();

            for p in &path_level {
                if !params.iter().any(|q| q.name == p.name) {
                    params.push(p.clone());
                }
            }

            for p in request_body_parameters(spec, details) {
                if !params.iter().any(|q| q.name == p.name) {
                    params.push(p);
                }
            }

            endpoints.push(Endpoint {
                path: path.clone(),
                method,
                params,
            });
        }
    }

    endpoints
}

// Collect parameters from a "parameters" array, resolving local $refs
fn collect_parameters(root: &Value, parameters: &Value) -> Vec<Parameter> {
    let mut out = Vec::new();
    if let Some(arr) = parameters.as_array() {
        for p in arr {
            let resolved = match p.get("$ref").and_then(|r| r.as_str()) {
                Some(r) => match resolve_local_ref(root, r) {
                    Some(v) => v,
                    None => continue,
                },
                None => p,
            };
            if let Some(param) = parse_parameter(resolved) {
                out.push(param);
            }
        }
    }
    out
}

fn parse_parameter(p: &Value) -> Option<Parameter> {
    let name = p.get("name").and_then(|n| n.as_str())?;

    // OpenAPI 3.x nests the type under "schema"; 2.0 has it inline
    let schema_type = p
        .get("schema")
        .and_then(|s| s.get("type"))
        .or_else(|| p.get("type"))
        .and_then(|t| t.as_str())
        .unwrap_or("string");

    Some(Parameter {
        name: name.to_string(),
        schema_type: schema_type.to_string(),
        description: p
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("")
            .to_string(),
        location: ParameterLocation::from_spec(p.get("in").and_then(|i| i.as_str())),
    })
}

// OpenAPI 3.x requestBody: surface application/json schema properties as
// body-located parameters so POST/PUT endpoints get values too
fn request_body_parameters(root: &Value, details: &Value) -> Vec<Parameter> {
    let mut out = Vec::new();

    let Some(rb) = details.get("requestBody") else {
        return out;
    };
    let rb = deref(root, rb);

    let Some(schema) = rb
        .get("content")
        .and_then(|c| c.get("application/json"))
        .and_then(|m| m.get("schema"))
    else {
        return out;
    };
    let schema = deref(root, schema);

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (pname, prop) in props {
            let prop = deref(root, prop);
            out.push(Parameter {
                name: pname.clone(),
                schema_type: prop
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("string")
                    .to_string(),
                description: prop
                    .get("description")
                    .and_then(|d| d.as_str())
                    .unwrap_or("")
                    .to_string(),
                location: ParameterLocation::Body,
            });
        }
    }

    out
}

// Follow a local $ref if present, otherwise return the value unchanged
fn deref<'a>(root: &'a Value, value: &'a Value) -> &'a Value {
    value
        .get("$ref")
        .and_then(|r| r.as_str())
        .and_then(|r| resolve_local_ref(root, r))
        .unwrap_or(value)
}

// Resolve local JSON Pointer refs like "#/components/schemas/Foo"
fn resolve_local_ref<'a>(root: &'a Value, ref_str: &str) -> Option<&'a Value> {
    let pointer = ref_str.strip_prefix('#')?;
    if !pointer.starts_with('/') {
        return None;
    }
    let parts = pointer[1..]
        .split('/')
        .map(|s| s.replace("~1", "/").replace("~0", "~"));
    let mut cur = root;
    for p in parts {
        cur = cur.get(&p)?;
    }
    Some(cur)
}
