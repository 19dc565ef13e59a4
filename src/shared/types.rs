use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope every endpoint answers with, success or failure alike.
///
/// Absent fields are omitted from the JSON rather than serialized as null.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_absent_fields() {
        let json = serde_json::to_string(&ApiResponse::success(Some(1), None)).unwrap();
        assert_eq!(json, r#"{"success":true,"data":1}"#);
    }

    #[test]
    fn error_envelope_carries_message_and_errors() {
        let json = serde_json::to_string(&ApiResponse::<()>::error(
            Some("nope".to_string()),
            Some(vec!["nope".to_string()]),
        ))
        .unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"message":"nope","errors":["nope"]}"#
        );
    }
}
