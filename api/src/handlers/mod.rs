pub mod auth;
pub mod health;
pub mod index;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard API error response
///
/// The body carries a single `message` field; rejection responses stay
/// byte-identical regardless of the underlying cause.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_body_has_only_message() {
        let response = ErrorResponse::unauthorized();
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(json, serde_json::json!({ "message": "Invalid email or password" }));
    }

    #[test]
    fn test_unauthorized_body_is_uniform() {
        // Unknown email and wrong password share this single constructor,
        // so the two rejections are indistinguishable on the wire.
        let a = serde_json::to_string(&ErrorResponse::unauthorized()).expect("serialize");
        let b = serde_json::to_string(&ErrorResponse::unauthorized()).expect("serialize");
        assert_eq!(a, b);
    }

    #[test]
    fn test_internal_error_body() {
        let response = ErrorResponse::internal();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.message, "Internal server error");
    }
}
