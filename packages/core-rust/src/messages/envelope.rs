//! Base request/response envelope shared by every command use case.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::Outcome;

/// Common request fields. `requestId` is caller-supplied and echoed back.
///
/// A missing `requestId` field decodes to the empty string rather than a
/// decode error; the validation handler is the layer that rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRequest {
    #[serde(default)]
    pub request_id: String,
}

impl BaseRequest {
    /// Creates a request carrying the given id.
    #[must_use]
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
        }
    }
}

/// Common response fields. `message` doubles as the error descriptor's
/// diagnostic echo and is omitted from the wire when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse {
    #[serde(default)]
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub status_code: Outcome,
}

impl BaseResponse {
    /// Success envelope echoing the caller's request id.
    #[must_use]
    pub fn success(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            message: None,
            status_code: Outcome::Success,
        }
    }

    /// Error envelope carrying the offending original content as `message`.
    #[must_use]
    pub fn error(message: Value, status_code: Outcome) -> Self {
        Self {
            request_id: String::new(),
            message: Some(message),
            status_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_uses_camel_case_field_name() {
        let json = serde_json::to_value(BaseRequest::new("abc")).unwrap();
        assert_eq!(json, json!({"requestId": "abc"}));
    }

    #[test]
    fn missing_request_id_decodes_to_empty() {
        let request: BaseRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.request_id, "");
    }

    #[test]
    fn non_object_request_is_a_decode_error() {
        assert!(serde_json::from_value::<BaseRequest>(json!("nope")).is_err());
        assert!(serde_json::from_value::<BaseRequest>(json!(7)).is_err());
    }

    #[test]
    fn success_response_omits_message() {
        let json = serde_json::to_value(BaseResponse::success("abc")).unwrap();
        assert_eq!(json, json!({"requestId": "abc", "statusCode": 0}));
    }

    #[test]
    fn error_response_echoes_offending_content() {
        let response = BaseResponse::error(json!({"requestId": ""}), Outcome::ValidationFailure);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({"requestId": "", "message": {"requestId": ""}, "statusCode": 4})
        );
    }

    #[test]
    fn response_roundtrip() {
        let response = BaseResponse::error(json!("raw text"), Outcome::UseCaseUnmarshalFailure);
        let bytes = serde_json::to_vec(&response).unwrap();
        let decoded: BaseResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, response);
    }
}
