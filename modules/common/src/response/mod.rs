// Response envelope
//
// Every endpoint answers with the same envelope:
//   success: { "ok": true,  "data": ..., "meta"?: ... }
//   failure: { "ok": false, "error": { "code", "message", "details"?, "requestId"? } }

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSuccess<T> {
    pub ok: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            ok: true,
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: ErrorDetail,
}

/// Machine-readable error payload carried by `ErrorBody`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g. "OUT_OF_STOCK")
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                request_id: None,
            },
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.error.request_id = Some(request_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiSuccess::new(json!({ "id": "item_1" }))).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"]["id"], "item_1");
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorBody::new("OUT_OF_STOCK", "Not enough stock available")
            .with_details(json!({ "available": 1 }))
            .with_request_id("req_1");
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "OUT_OF_STOCK");
        assert_eq!(json["error"]["details"]["available"], 1);
        assert_eq!(json["error"]["requestId"], "req_1");
    }

    #[test]
    fn test_error_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ErrorBody::new("INTERNAL_ERROR", "Internal error")).unwrap();
        assert!(json["error"].get("details").is_none());
        assert!(json["error"].get("requestId").is_none());
    }
}
