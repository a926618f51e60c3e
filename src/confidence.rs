// Confidence scoring for unauthcheck
// Maps (status code, response body) to a 0-100 score and a level name

use std::fmt;

/// Qualitative confidence that an endpoint is reachable without auth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    Inconclusive,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "High"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::Low => write!(f, "Low"),
            ConfidenceLevel::Inconclusive => write!(f, "Inconclusive"),
        }
    }
}

// Markers that make a 2xx body look like an authorization error in disguise
const AUTH_ERROR_MARKERS: &[&str] = &[
    "unauthorized",
    "unauthorised",
    "forbidden",
    "access denied",
    "permission denied",
    "not allowed",
    "invalid token",
    "authentication required",
    "login required",
];

fn looks_like_auth_error(body: &str) -> bool {
    let lower = body.to_lowercase();
    AUTH_ERROR_MARKERS.iter().any(|m| lower.contains(m))
}

/// Score a probe response. Total over every (status, body) pair and
/// deterministic: the same input always yields the same output.
///
/// Status 0 is the sentinel for a probe that never got a response.
pub fn score_response(status: u16, body: &str) -> (u8, ConfidenceLevel) {
    match status {
        200 | 201 | 202 | 204 => {
            if looks_like_auth_error(body) {
                (60, ConfidenceLevel::Medium)
            } else {
                (90, ConfidenceLevel::High)
            }
        }
        401 | 403 => (5, ConfidenceLevel::Inconclusive),
        0 => (0, ConfidenceLevel::Inconclusive),
        404 => (25, ConfidenceLevel::Low),
        400..=499 => (30, ConfidenceLevel::Low),
        500..=599 => (35, ConfidenceLevel::Low),
        _ => (40, ConfidenceLevel::Low),
    }
}
