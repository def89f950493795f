use serde::{Deserialize, Serialize};
use crate::common::error::{ArangoError, ErrorCode};

/// Status fields the server inlines into every JSON response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStruct {
    #[serde(default)]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_num: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResponseStruct {
    /// Builds the typed error for a response that carried `code`.
    pub fn as_arango_error_with_code(&self, code: u16) -> ArangoError {
        let error_num = self.error_num.unwrap_or(code as u32);
        let message = match &self.error_message {
            Some(message) if !message.is_empty() => message.clone(),
            _ => match ErrorCode::from_u32(error_num) {
                Some(known) => known.to_string(),
                None => format!("unexpected status code {}", code),
            },
        };

        ArangoError::Arango {
            code,
            error_num,
            message,
        }
    }
}

/// Envelope with the payload inlined next to the status fields
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(flatten)]
    pub response: ResponseStruct,
    #[serde(flatten)]
    pub payload: T,
}

/// Envelope for endpoints that wrap their payload in `result`
#[derive(Debug, Clone, Deserialize)]
pub struct ResultResponse<T> {
    #[serde(flatten)]
    pub response: ResponseStruct,
    pub result: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_from_structured_body() {
        let body: ResponseStruct = serde_json::from_value(json!({
            "error": true,
            "code": 409,
            "errorNum": 1207,
            "errorMessage": "duplicate name"
        }))
        .unwrap();

        let err = body.as_arango_error_with_code(409);
        assert!(err.is_conflict());
        assert_eq!(err.error_code(), Some(ErrorCode::ArangoDuplicateName));
        assert!(err.to_string().contains("duplicate name"));
    }

    #[test]
    fn test_error_without_body_falls_back_to_status() {
        let err = ResponseStruct::default().as_arango_error_with_code(404);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_result_envelope() {
        let decoded: ResultResponse<Vec<String>> = serde_json::from_value(json!({
            "error": false,
            "code": 200,
            "result": ["_system", "shop"]
        }))
        .unwrap();
        assert!(!decoded.response.error);
        assert_eq!(decoded.result, vec!["_system", "shop"]);
    }
}
