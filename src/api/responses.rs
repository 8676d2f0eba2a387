//! API response structures

use serde::Serialize;

/// Envelope wrapping every API response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<T>,
    pub status: u8,
    pub status_msg: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `message`
    pub fn ok(message: T) -> Self {
        Self {
            message: Some(message),
            status: 0,
            status_msg: "ok".to_string(),
        }
    }

    /// Error response with no payload
    pub fn error(status_msg: &str) -> Self {
        Self {
            message: None,
            status: 1,
            status_msg: status_msg.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_no_message() {
        let json = serde_json::to_value(ApiResponse::<()>::error("invalid-request")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": 1, "statusMsg": "invalid-request" }));
    }

    #[test]
    fn ok_envelope_wraps_payload() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": [1, 2], "status": 0, "statusMsg": "ok" })
        );
    }
}
