/// Unit tests for core unauthcheck models
use unauthcheck::confidence::{score_response, ConfidenceLevel};
use unauthcheck::models::{Endpoint, Method, Parameter, ParameterLocation};

#[test]
fn test_method_display() {
    assert_eq!(Method::GET.to_string(), "GET");
    assert_eq!(Method::POST.to_string(), "POST");
    assert_eq!(Method::PUT.to_string(), "PUT");
    assert_eq!(Method::DELETE.to_string(), "DELETE");
    assert_eq!(Method::PATCH.to_string(), "PATCH");
    assert_eq!(Method::OPTIONS.to_string(), "OPTIONS");
    assert_eq!(Method::HEAD.to_string(), "HEAD");
}

#[test]
fn test_method_from_spec_key() {
    assert_eq!(Method::from_spec_key("get"), Some(Method::GET));
    assert_eq!(Method::from_spec_key("POST"), Some(Method::POST));
    assert_eq!(Method::from_spec_key("Delete"), Some(Method::DELETE));

    // Non-method keys that appear alongside methods in a path item
    assert_eq!(Method::from_spec_key("parameters"), None);
    assert_eq!(Method::from_spec_key("summary"), None);
    assert_eq!(Method::from_spec_key("description"), None);
}

#[test]
fn test_method_as_reqwest() {
    assert_eq!(Method::GET.as_reqwest(), reqwest::Method::GET);
    assert_eq!(Method::PATCH.as_reqwest(), reqwest::Method::PATCH);
}

#[test]
fn test_parameter_location_from_spec() {
    assert_eq!(
        ParameterLocation::from_spec(Some("path")),
        ParameterLocation::Path
    );
    assert_eq!(
        ParameterLocation::from_spec(Some("query")),
        ParameterLocation::Query
    );
    assert_eq!(
        ParameterLocation::from_spec(Some("header")),
        ParameterLocation::Header
    );
    assert_eq!(
        ParameterLocation::from_spec(Some("body")),
        ParameterLocation::Body
    );
    assert_eq!(
        ParameterLocation::from_spec(Some("formData")),
        ParameterLocation::Body
    );

    // Unknown or missing locations default to query
    assert_eq!(
        ParameterLocation::from_spec(Some("cookie")),
        ParameterLocation::Query
    );
    assert_eq!(ParameterLocation::from_spec(None), ParameterLocation::Query);
}

#[test]
fn test_endpoint_construction() {
    let endpoint = Endpoint {
        path: "/users/{id}".to_string(),
        method: Method::GET,
        params: vec![Parameter {
            name: "id".to_string(),
            schema_type: "string".to_string(),
            description: "User identifier".to_string(),
            location: ParameterLocation::Path,
        }],
    };

    assert_eq!(endpoint.path, "/users/{id}");
    assert_eq!(endpoint.method, Method::GET);
    assert_eq!(endpoint.params.len(), 1);
    assert_eq!(endpoint.params[0].name, "id");
}

#[test]
fn test_confidence_level_display() {
    assert_eq!(ConfidenceLevel::High.to_string(), "High");
    assert_eq!(ConfidenceLevel::Medium.to_string(), "Medium");
    assert_eq!(ConfidenceLevel::Low.to_string(), "Low");
    assert_eq!(ConfidenceLevel::Inconclusive.to_string(), "Inconclusive");
}

#[test]
fn spec_worked_examples() {
    // 401 with an unauthorized message body
    let (score, level) = score_response(401, r#"{"message":"Unauthorized"}"#);
    assert!(score <= 19);
    assert_eq!(level, ConfidenceLevel::Inconclusive);

    // 200 with a data body and no error markers
    let (score, level) = score_response(200, r#"{"id":"123"}"#);
    assert!((80..=100).contains(&score));
    assert_eq!(level, ConfidenceLevel::High);
}
