//! Response envelopes. Successes are wrapped in [`ApiResponse`]; failures are
//! RFC 7807 problem documents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// Problem Details (RFC 7807).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Path of the request that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Every rule a rejected payload broke, in field order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
            request_id: None,
            errors: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request(mut self, request_id: impl Into<String>, path: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self.instance = Some(path.into());
        self
    }

    /// 422 listing each broken rule; `detail` carries them joined.
    pub fn validation(errors: Vec<String>) -> Self {
        let mut problem = Self::new(422, "Validation Failed").with_detail(errors.join(", "));
        problem.errors = errors;
        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_omits_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::new(403, "Forbidden")).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 403);
        assert!(json.get("detail").is_none());
        assert!(json.get("request_id").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_validation_problem_lists_errors() {
        let problem = ErrorResponse::validation(vec!["Title is required".into(), "Bad slug".into()])
            .with_request("req-1", "/api/posts");
        let json = serde_json::to_value(problem).unwrap();
        assert_eq!(json["status"], 422);
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["detail"], "Title is required, Bad slug");
        assert_eq!(json["instance"], "/api/posts");
    }

    #[test]
    fn test_message_only_response() {
        let json = serde_json::to_value(ApiResponse::message("Logged out")).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Logged out");
    }
}
