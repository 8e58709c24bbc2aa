//! API response envelope
//!
//! Uniform envelope for every code path: status code, the two fixed
//! headers, JSON-encoded body.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded body.
    pub body: String,
}

impl ApiResponse {
    /// Response with `payload` serialized as the JSON body.
    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        let body =
            serde_json::to_string(payload).expect("response body serialization cannot fail");
        Self {
            status_code,
            headers: base_headers(),
            body,
        }
    }

    /// Error envelope: `{"error": <message>}`.
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }
}

/// The header set attached to every response, success or failure.
fn base_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

/// Acknowledgement body for the mutating operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationAck {
    pub item_id: String,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_carries_fixed_headers() {
        let resp = ApiResponse::json(200, &json!({"ok": true}));

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers["Content-Type"], "application/json");
        assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(resp.body, r#"{"ok":true}"#);
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ApiResponse::error(404, "Item not found");

        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.body, r#"{"error":"Item not found"}"#);
        assert_eq!(resp.headers.len(), 2);
    }

    #[test]
    fn test_mutation_ack_field_order() {
        let ack = MutationAck {
            item_id: "abc".to_string(),
            message: "Item created successfully",
        };

        let body = serde_json::to_string(&ack).unwrap();
        assert_eq!(
            body,
            r#"{"itemId":"abc","message":"Item created successfully"}"#
        );
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let resp = ApiResponse::error(400, "bad");
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["statusCode"], 400);
        assert!(value["headers"].is_object());
        assert!(value["body"].is_string());
    }
}
