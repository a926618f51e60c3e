// Core data models for unauthcheck

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

impl Method {
    /// Parse an OpenAPI method key ("get", "post", ...). Non-method keys such
    /// as "parameters" or "summary" return None and are skipped by the loader.
    pub fn from_spec_key(key: &str) -> Option<Self> {
        match key.to_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "OPTIONS" => Some(Method::OPTIONS),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
            Method::PATCH => reqwest::Method::PATCH,
            Method::OPTIONS => reqwest::Method::OPTIONS,
            Method::HEAD => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
            Method::PATCH => write!(f, "PATCH"),
            Method::OPTIONS => write!(f, "OPTIONS"),
            Method::HEAD => write!(f, "HEAD"),
        }
    }
}

/// Parameter location in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParameterLocation {
    /// Parse the OpenAPI "in" field. Unknown or missing locations default to
    /// Query so the value is still sent somewhere rather than dropped.
    pub fn from_spec(loc: Option<&str>) -> Self {
        match loc {
            Some("path") => ParameterLocation::Path,
            Some("header") => ParameterLocation::Header,
            Some("body") | Some("formData") => ParameterLocation::Body,
            _ => ParameterLocation::Query,
        }
    }
}

/// A declared parameter on an endpoint
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub schema_type: String,
    pub description: String,
    pub location: ParameterLocation,
}

/// An API endpoint discovered in the spec
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    pub params: Vec<Parameter>,
}

/// One set of parameter values for a probe. BTreeMap keeps the JSON encoding
/// in the CSV sorted by key and therefore stable.
pub type ValueSet = BTreeMap<String, String>;

/// Outcome of a single probe request
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Success { status: u16, body: String },
    NetworkFailure { error: String },
}

impl ProbeOutcome {
    /// Status code for scoring and the CSV. Network failures use 0 as a
    /// sentinel, which the scorer maps to Inconclusive.
    pub fn status(&self) -> u16 {
        match self {
            ProbeOutcome::Success { status, .. } => *status,
            ProbeOutcome::NetworkFailure { .. } => 0,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            ProbeOutcome::Success { body, .. } => body,
            ProbeOutcome::NetworkFailure { .. } => "",
        }
    }
}

/// One CSV row. Field order here is the column order in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRecord {
    pub endpoint: String,
    pub method: String,
    pub params_count: usize,
    pub params_values: String,
    pub status_codes: String,
    pub response: String,
    pub confidence: u8,
    pub confidence_level: String,
    pub notes: String,
}
