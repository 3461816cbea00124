//! Invocation envelope wire format.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::http::GateResponse;

/// Runtimes send `null` for absent maps; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inbound event handed over by the function runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvocationRequest {
    pub raw_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub request_context: RequestContext,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl InvocationRequest {
    /// Convenience constructor, mostly for tests and local invocation.
    pub fn new(method: &str, raw_path: &str) -> Self {
        Self {
            raw_path: raw_path.to_string(),
            request_context: RequestContext {
                http: HttpContext {
                    method: method.to_string(),
                    ..HttpContext::default()
                },
            },
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn method(&self) -> &str {
        &self.request_context.http.method
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub http: HttpContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpContext {
    pub method: String,
    pub path: String,
    pub source_ip: String,
}

/// Outbound envelope returned to the function runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl From<GateResponse> for InvocationResponse {
    fn from(response: GateResponse) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (canonical_header_name(name.as_str()), value.to_string()))
            })
            .collect();

        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body_text(),
            is_base64_encoded: false,
        }
    }
}

/// `content-type` → `Content-Type`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_from_runtime_event() {
        let event = r#"{
            "version": "2.0",
            "routeKey": "$default",
            "rawPath": "/unknown",
            "rawQueryString": "",
            "headers": {"x-api-key": "abc123", "accept": "*/*"},
            "requestContext": {
                "http": {"method": "GET", "path": "/unknown", "sourceIp": "10.0.0.1"}
            },
            "isBase64Encoded": false
        }"#;

        let request: InvocationRequest = serde_json::from_str(event).unwrap();
        assert_eq!(request.raw_path, "/unknown");
        assert_eq!(request.method(), "GET");
        assert_eq!(request.headers.get("x-api-key").map(String::as_str), Some("abc123"));
        assert_eq!(request.request_context.http.source_ip, "10.0.0.1");
        assert!(request.body.is_none());
    }

    #[test]
    fn sparse_event_uses_defaults() {
        let request: InvocationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.raw_path, "");
        assert!(request.headers.is_empty());
        assert_eq!(request.method(), "");
    }

    #[test]
    fn null_headers_mean_no_headers() {
        let event = r#"{"rawPath": "/health", "headers": null, "requestContext": null}"#;
        let request: InvocationRequest = serde_json::from_str(event).unwrap();
        assert!(request.headers.is_empty());
        assert_eq!(request.method(), "");
    }

    #[test]
    fn response_serializes_runtime_field_names() {
        let response = InvocationResponse {
            status_code: 404,
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: r#"{"error":"Not found"}"#.to_string(),
            is_base64_encoded: false,
        };

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
        assert_eq!(json["body"], r#"{"error":"Not found"}"#);
    }

    #[test]
    fn header_names_are_canonicalized() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("allow"), "Allow");
    }
}
